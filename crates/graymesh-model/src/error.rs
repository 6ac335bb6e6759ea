use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown instance status: {0}")]
    UnknownStatus(String),

    #[error("unknown match strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown empty-match policy: {0}")]
    UnknownPolicy(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
