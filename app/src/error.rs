use std::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
    #[error(transparent)]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status code: {0}")]
    Status(u16),
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::error::Error),
    #[error("Response is not an image: {0}")]
    NotAnImage(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Sidecar rejected request: {0}")]
    Sidecar(u16),
    #[error("Storage rejected request: {0}")]
    Upstream(u16),
    #[error("Invalid object path: {0}")]
    InvalidPath(String),
    #[error("PUBLIC_OBJECT_SEARCH_PATHS is not set")]
    NotConfigured(),
    #[error("No webcam frames available")]
    NoFrames(),
}

#[derive(Debug, Error)]
pub enum FtpError {
    #[error("Upload failed: {0}")]
    Ftp(#[from] suppaftp::FtpError),
    #[error("Upload task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("FTP is not configured")]
    NotConfigured(),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Arguments are not used as specified")]
    ArgumentError(),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub enum ObserverError {
    User(Box<dyn error::Error + Send + Sync>),
    Internal(Box<dyn error::Error + Send + Sync>),
}

impl From<DBError> for ObserverError {
    fn from(err: DBError) -> Self {
        ObserverError::Internal(Box::from(err))
    }
}

impl From<PollError> for ObserverError {
    fn from(err: PollError) -> Self {
        ObserverError::Internal(Box::from(err))
    }
}

impl From<StorageError> for ObserverError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NoFrames() => ObserverError::User(Box::from(err)),
            _ => ObserverError::Internal(Box::from(err)),
        }
    }
}

impl From<FtpError> for ObserverError {
    fn from(err: FtpError) -> Self {
        ObserverError::Internal(Box::from(err))
    }
}

impl From<ApiError> for ObserverError {
    fn from(err: ApiError) -> Self {
        ObserverError::User(Box::from(err))
    }
}
