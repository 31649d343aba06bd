use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::armor;
use crate::crypto::{decrypt, encrypt};
use crate::database::{PreferenceStore, GIST_ID_KEY};
use crate::error::{Error, Result};
use crate::models::{Cell, Grid};
use crate::remote::RemoteStore;

/// What the user typed into the three input fields, whitespace trimmed.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub passphrase: String,
    pub token: String,
    pub gist_id: String,
}

impl Credentials {
    pub fn new(passphrase: &str, token: &str, gist_id: &str) -> Self {
        Credentials {
            passphrase: passphrase.trim().to_owned(),
            token: token.trim().to_owned(),
            gist_id: gist_id.trim().to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Upload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Passphrase was empty, nothing happened.
    Skipped,
    Completed,
}

/// Drives a busy indicator around network round trips.
pub trait ProgressObserver: Send + Sync {
    fn started(&self, operation: Operation);
    fn finished(&self, operation: Operation, succeeded: bool);
}

pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn started(&self, operation: Operation) {
        debug!("{:?} started", operation);
    }

    fn finished(&self, operation: Operation, succeeded: bool) {
        debug!("{:?} finished (succeeded: {})", operation, succeeded);
    }
}

/// Holds the in-flight flag for one operation; clears it on drop.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    observer: &'a dyn ProgressObserver,
    operation: Operation,
    succeeded: bool,
}

impl<'a> InFlight<'a> {
    fn begin(
        flag: &'a AtomicBool,
        observer: &'a dyn ProgressObserver,
        operation: Operation,
    ) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        observer.started(operation);
        Ok(InFlight {
            flag,
            observer,
            operation,
            succeeded: false,
        })
    }

    fn succeed(mut self) {
        self.succeeded = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.observer.finished(self.operation, self.succeeded);
    }
}

pub struct Session<R, P> {
    remote: R,
    preferences: P,
    observer: Box<dyn ProgressObserver>,
    grid: Mutex<Grid>,
    gist_id: Mutex<String>,
    in_flight: AtomicBool,
    columns: usize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R: RemoteStore, P: PreferenceStore> Session<R, P> {
    pub fn new(remote: R, preferences: P, columns: usize) -> Self {
        Session {
            remote,
            preferences,
            observer: Box::new(TracingProgress),
            grid: Mutex::new(Grid::new(columns)),
            gist_id: Mutex::new(String::new()),
            in_flight: AtomicBool::new(false),
            columns,
        }
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn snapshot(&self) -> Grid {
        lock(&self.grid).clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn gist_id(&self) -> String {
        lock(&self.gist_id).clone()
    }

    fn remember_gist_id(&self, gist_id: &str) {
        if !gist_id.is_empty() {
            *lock(&self.gist_id) = gist_id.to_owned();
        }
    }

    /// Restores the gist id saved by a previous run.
    pub async fn load_gist_id(&self) -> Result<String> {
        let saved = self.preferences.load(GIST_ID_KEY).await?.unwrap_or_default();
        *lock(&self.gist_id) = saved.clone();
        Ok(saved)
    }

    pub async fn save_gist_id(&self) -> Result<()> {
        let gist_id = self.gist_id();
        self.preferences.save(GIST_ID_KEY, &gist_id).await
    }

    /// Replaces the grid with the decrypted content of the remote blob.
    /// On failure the current grid is left as it was.
    pub async fn refresh(&self, credentials: &Credentials) -> Result<Outcome> {
        self.remember_gist_id(&credentials.gist_id);
        if credentials.passphrase.is_empty() {
            return Ok(Outcome::Skipped);
        }
        let guard = InFlight::begin(&self.in_flight, self.observer.as_ref(), Operation::Refresh)?;

        let content = self.remote.fetch(&credentials.gist_id).await?;
        let blob = armor::decode(&content)?;
        let plain = decrypt(&blob, &credentials.passphrase)?;
        let grid = Grid::from_json(&plain, self.columns)?;

        info!(
            "refreshed {} rows from gist {}",
            grid.len(),
            credentials.gist_id
        );
        *lock(&self.grid) = grid;
        guard.succeed();
        Ok(Outcome::Completed)
    }

    /// Encrypts the current grid and writes it to the remote blob.
    pub async fn upload(&self, credentials: &Credentials) -> Result<Outcome> {
        self.remember_gist_id(&credentials.gist_id);
        if credentials.passphrase.is_empty() {
            return Ok(Outcome::Skipped);
        }
        let guard = InFlight::begin(&self.in_flight, self.observer.as_ref(), Operation::Upload)?;

        let (plain, rows) = {
            let grid = lock(&self.grid);
            (grid.to_json()?, grid.len())
        };
        let blob = encrypt(&plain, &credentials.passphrase)?;
        let content = armor::encode(&blob);
        self.remote
            .patch(&credentials.gist_id, &content, &credentials.token)
            .await?;

        info!("uploaded {} rows to gist {}", rows, credentials.gist_id);
        guard.succeed();
        Ok(Outcome::Completed)
    }

    pub fn add_row(&self) {
        lock(&self.grid).add_row();
    }

    pub fn edit_cell(&self, row: usize, column: usize, value: Cell) -> Result<()> {
        lock(&self.grid).set_cell(row, column, value)
    }
}
