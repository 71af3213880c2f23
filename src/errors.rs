// errors.rs
use std::fmt;

/// Errors raised by the resolution-and-extraction pipeline and its
/// remote collaborators. Transient variants are retried with backoff;
/// data-shape variants fail their stage immediately.
#[derive(Debug)]
pub enum PipelineError {
    Network(String),
    Timeout(String),
    HttpStatus(u16),
    HtmlParse(String),
    JsonParse(String),
    UnexpectedShape(String),
    Xlsx(String),
}

impl PipelineError {
    /// Whether another attempt could plausibly succeed.
    /// Schema mismatches and parse failures never retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Network(_) | PipelineError::Timeout(_) => true,
            PipelineError::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Network(msg) => write!(f, "Network error: {msg}"),
            PipelineError::Timeout(msg) => write!(f, "Timed out: {msg}"),
            PipelineError::HttpStatus(status) => write!(f, "HTTP status {status}"),
            PipelineError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            PipelineError::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            PipelineError::UnexpectedShape(msg) => write!(f, "Unexpected data shape: {msg}"),
            PipelineError::Xlsx(msg) => write!(f, "Spreadsheet error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PipelineError::Timeout(e.to_string())
        } else {
            PipelineError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_retry_and_data_errors_do_not() {
        assert!(PipelineError::Network("reset".into()).is_retryable());
        assert!(PipelineError::Timeout("45s".into()).is_retryable());
        assert!(PipelineError::HttpStatus(503).is_retryable());
        assert!(PipelineError::HttpStatus(429).is_retryable());

        assert!(!PipelineError::HttpStatus(404).is_retryable());
        assert!(!PipelineError::JsonParse("eof".into()).is_retryable());
        assert!(!PipelineError::UnexpectedShape("PID_NUM missing".into()).is_retryable());
    }
}
