use std::fmt;

#[derive(Debug)]
pub enum ListError {
    InvalidConfig(String),
    Network(reqwest::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    Source(String),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
            ListError::Network(e) => write!(f, "Network error: {}", e),
            ListError::Json(e) => write!(f, "JSON parsing error: {}", e),
            ListError::Io(e) => write!(f, "IO error: {}", e),
            ListError::Source(e) => write!(f, "Record source error: {}", e),
        }
    }
}

impl std::error::Error for ListError {}

impl From<reqwest::Error> for ListError {
    fn from(err: reqwest::Error) -> Self {
        ListError::Network(err)
    }
}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        ListError::Json(err)
    }
}

impl From<std::io::Error> for ListError {
    fn from(err: std::io::Error) -> Self {
        ListError::Io(err)
    }
}
