use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream returned status {status} for {url}")]
    Upstream { status: u16, url: String },
    #[error("Timeout error: {0}")]
    Timeout(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Media not found: {0}")]
    NotFound(String),
    #[error("Invalid date format: {0}")]
    Format(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ToolError {
    /// Whether a retry has any chance of succeeding. Client-side mistakes
    /// (bad input, unknown id, most 4xx responses) never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            ToolError::Network(_) | ToolError::Timeout(_) => true,
            ToolError::Upstream { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(ToolError::Network("connection reset".into()).is_retryable());
        assert!(ToolError::Timeout("fetch".into()).is_retryable());
        assert!(ToolError::Upstream { status: 503, url: "u".into() }.is_retryable());
        assert!(ToolError::Upstream { status: 429, url: "u".into() }.is_retryable());
    }

    #[test]
    fn test_non_retryable_kinds() {
        assert!(!ToolError::Upstream { status: 404, url: "u".into() }.is_retryable());
        assert!(!ToolError::Upstream { status: 401, url: "u".into() }.is_retryable());
        assert!(!ToolError::NotFound("id".into()).is_retryable());
        assert!(!ToolError::Format("%Q".into()).is_retryable());
        assert!(!ToolError::Storage("disk full".into()).is_retryable());
    }
}
