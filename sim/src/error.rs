use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("snake #{index} in snapshot has no segments")]
    EmptySnake { index: usize },

    #[error("cell ({x}, {y}) in snapshot is out of range")]
    OutOfRange { x: i32, y: i32 },
}
