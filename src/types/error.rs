use thiserror::Error;

/// salescope error types
#[derive(Error, Debug)]
pub enum SalesError {
    /// Raw input is not a sequence of row-like objects
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// City selected while state is "all"
    #[error("filter state error: {0}")]
    FilterState(String),

    /// Failed to parse CSV/JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for salescope
pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SalesError::Parse("unterminated quote".into());
        assert_eq!(err.to_string(), "parse error: unterminated quote");
    }

    #[test]
    fn test_filter_state_display() {
        let err = SalesError::FilterState("city 'Taos' requires a state".into());
        assert!(err.to_string().starts_with("filter state error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SalesError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
