use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::remote::{DEFAULT_API_BASE, DEFAULT_FILE_NAME};

pub const DEFAULT_COLUMNS: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    pub api_base: String,
    pub file_name: String,
    pub database_path: PathBuf,
    pub columns: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let address = lookup("GISTGRID_ADDRESS")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse()
            .context("GISTGRID_ADDRESS is not an IP address")?;
        let port = lookup("GISTGRID_PORT")
            .unwrap_or_else(|| "8080".to_owned())
            .parse()
            .context("GISTGRID_PORT is not a port number")?;
        let columns = match lookup("GISTGRID_COLUMNS") {
            Some(raw) => raw
                .parse()
                .context("GISTGRID_COLUMNS is not a number")?,
            None => DEFAULT_COLUMNS,
        };
        if columns == 0 {
            return Err(anyhow!("GISTGRID_COLUMNS must be at least 1"));
        }

        Ok(Config {
            address,
            port,
            api_base: lookup("GISTGRID_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
            file_name: lookup("GISTGRID_FILE_NAME")
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned()),
            database_path: lookup("GISTGRID_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("gistgrid.db")),
            columns,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}
