use thiserror::Error;

pub type MergeResult<T> = Result<T, MergeError>;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("No layers for merged node: {0}")]
    EmptyLayers(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path too long: {0} bytes (max 4096)")]
    PathTooLong(usize),

    #[error("Name too long: {0} bytes (max 255)")]
    NameTooLong(usize),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
