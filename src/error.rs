use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response from gist service: {0}")]
    RemoteFormat(String),

    #[error("{0:?} is not a gist id")]
    InvalidGistId(String),

    #[error("invalid base64 content: {0}")]
    Encoding(String),

    /// Wrong passphrase and damaged ciphertext look the same on purpose.
    #[error("could not decrypt data (wrong passphrase or corrupted content)")]
    Decryption,

    #[error("decrypted data is not a valid grid: {0}")]
    MalformedGrid(String),

    #[error("could not prepare upload: {0}")]
    Upload(String),

    #[error("another refresh or upload is still in progress")]
    Busy,

    #[error("cell ({row}, {column}) is outside the grid")]
    CellOutOfBounds { row: usize, column: usize },

    #[error("preference storage failed: {0}")]
    Preferences(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<tokio_rusqlite::rusqlite::Error> for Error {
    fn from(err: tokio_rusqlite::rusqlite::Error) -> Self {
        Error::Preferences(err.to_string())
    }
}

impl From<tokio_rusqlite::Error> for Error {
    fn from(err: tokio_rusqlite::Error) -> Self {
        Error::Preferences(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
