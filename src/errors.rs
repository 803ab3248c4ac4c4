//! Error types for the locking pool

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("items cannot be empty or nil")]
    EmptyPool,

    #[error("attempt to return unowned object")]
    UnownedObject,

    #[error("object was already returned to the pool")]
    AlreadyReturned,
}

pub type PoolResult<T> = Result<T, PoolError>;
