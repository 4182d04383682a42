use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Executor error: {0}")]
    Executor(#[from] chainsight_executor::Error),

    #[error("Unknown analysis query: {0}")]
    UnknownQuery(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
