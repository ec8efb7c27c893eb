use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid distance measure: {0} (expected \"kld\" or \"emd\")")]
    InvalidMeasure(String),

    #[error("View space is empty")]
    EmptyViewSpace,

    #[error("Insufficient views: requested top {requested}, only {available} available")]
    InsufficientViews { requested: usize, available: usize },

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
