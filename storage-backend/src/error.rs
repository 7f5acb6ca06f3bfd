use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Value stored under {0} is not valid UTF-8")]
    InvalidEncoding(String),

    #[error("Unknown storage backend: {0}. Must be 'local' or 'memory'")]
    UnknownBackend(String),
}

pub type Result<T> = anyhow::Result<T>;
