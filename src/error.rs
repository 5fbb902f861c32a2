use thiserror::Error;

#[derive(Debug, Error)]
pub enum LcvError {
    #[error("shape error: {0}")]
    Shape(String),

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type Result<T> = std::result::Result<T, LcvError>;
