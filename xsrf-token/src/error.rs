use thiserror::Error;

#[derive(Error, Debug)]
pub enum XsrfError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Key decode error: {0}")]
    KeyDecode(#[from] base64::DecodeError),

    #[error("Invalid token length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid salt length: expected {expected}, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    #[error("Invalid token character: {0:?}")]
    InvalidCharacter(char),

    #[error("Token does not match session or time window")]
    Mismatch,
}

pub type Result<T> = std::result::Result<T, XsrfError>;
