use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate query name: {0}")]
    DuplicateTask(String),

    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Query failures:\n{}", format_failures(.failures))]
    BatchFailure { failures: Vec<(String, String)> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, message)| format!("{}: {}", name, message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, Error>;
