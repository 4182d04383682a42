use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown strategy mode: {0}")]
    UnknownStrategyMode(String),

    #[error("Unknown shock event: {0}")]
    UnknownShockEvent(String),

    #[error("Row has {got} values but table has {expected} columns")]
    ColumnCountMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
