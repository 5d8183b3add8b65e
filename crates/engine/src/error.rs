use std::fmt;

#[derive(Debug)]
pub enum DictionaryError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Dictionary validation error (empty needle, duplicate entry, etc.).
    Validation(String),
    /// TOML serialization error.
    Serialize(String),
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "dictionary parse error: {msg}"),
            Self::Validation(msg) => write!(f, "dictionary validation error: {msg}"),
            Self::Serialize(msg) => write!(f, "dictionary serialization error: {msg}"),
        }
    }
}

impl std::error::Error for DictionaryError {}
