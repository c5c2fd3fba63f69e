use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid load descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("Serde error: {0}")]
    SerdeError(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::SerdeError(err.to_string())
    }
}
