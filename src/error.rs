use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("failed to read trade file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown plan tier: {0}")]
    UnknownPlan(String),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
