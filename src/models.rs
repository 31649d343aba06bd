use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One grid cell. Serializes as a JSON string or `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Cell {
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Empty => None,
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Cell::Empty, Cell::Text)
    }
}

impl From<Cell> for Option<String> {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Text(s) => Some(s),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

/// Rows of equally wide cell sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(columns: usize) -> Self {
        Grid {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a grid from rows that must all have the same width.
    /// `default_columns` only applies when `rows` is empty.
    pub fn from_rows(rows: Vec<Vec<Cell>>, default_columns: usize) -> Result<Self> {
        let columns = rows.first().map_or(default_columns, Vec::len);
        if columns == 0 {
            return Err(Error::MalformedGrid("rows have no cells".to_owned()));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(Error::MalformedGrid(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                columns
            )));
        }
        Ok(Grid { columns, rows })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn add_row(&mut self) {
        self.rows.push(vec![Cell::Empty; self.columns]);
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: Cell) -> Result<()> {
        let slot = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(Error::CellOutOfBounds { row, column })?;
        *slot = value;
        Ok(())
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.rows).map_err(|e| Error::Upload(e.to_string()))
    }

    pub fn from_json(bytes: &[u8], default_columns: usize) -> Result<Self> {
        let rows: Vec<Vec<Cell>> =
            serde_json::from_slice(bytes).map_err(|e| Error::MalformedGrid(e.to_string()))?;
        Self::from_rows(rows, default_columns)
    }
}
