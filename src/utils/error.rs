use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Registry responded with HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("No record found for {code}")]
    NotFound { code: String },

    #[error("Could not map record {code}: field '{field}' {reason}")]
    Mapping {
        code: String,
        field: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    NotFound,
    Mapping,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LeiError {
    pub(crate) fn mapping(
        code: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LeiError::Mapping {
            code: code.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LeiError::Transport(_) | LeiError::HttpStatus { .. } => ErrorCategory::Transport,
            LeiError::NotFound { .. } => ErrorCategory::NotFound,
            LeiError::Mapping { .. } | LeiError::Serialization(_) => ErrorCategory::Mapping,
            LeiError::CsvError(_) | LeiError::IoError(_) => ErrorCategory::Io,
            LeiError::ConfigError { .. }
            | LeiError::ConfigValidationError { .. }
            | LeiError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Mapping => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Transport failures may succeed on a later attempt; nothing else will.
    pub fn is_retryable(&self) -> bool {
        match self {
            LeiError::Transport(e) => e.is_timeout() || e.is_connect(),
            LeiError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LeiError::Transport(_) => "Could not reach the LEI registry".to_string(),
            LeiError::HttpStatus { status, .. } => {
                format!("The LEI registry rejected the request (HTTP {})", status)
            }
            LeiError::NotFound { code } => format!("No LEI record exists for {}", code),
            LeiError::Mapping { code, field, .. } => {
                format!("The record for {} has an unexpected '{}' value", code, field)
            }
            LeiError::Serialization(_) => "The registry response was not valid JSON".to_string(),
            LeiError::CsvError(_) | LeiError::IoError(_) => "Could not write output".to_string(),
            _ => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => "Check network access to the registry and try again later",
            ErrorCategory::NotFound => "Verify the identifier; it may be lapsed or never issued",
            ErrorCategory::Mapping => "The registry schema may have changed; report the record code",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Io => "Check the output destination is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, LeiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_severity() {
        let not_found = LeiError::NotFound {
            code: "529900T8BM49AURSDO55".to_string(),
        };
        assert_eq!(not_found.category(), ErrorCategory::NotFound);
        assert_eq!(not_found.severity(), ErrorSeverity::Low);

        let http = LeiError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        assert_eq!(http.category(), ErrorCategory::Transport);
        assert!(http.is_retryable());

        let mapping = LeiError::mapping("X", "entity.status", "unknown value 'ZOMBIE'");
        assert_eq!(mapping.category(), ErrorCategory::Mapping);
        assert!(!mapping.is_retryable());
        assert!(mapping.to_string().contains("entity.status"));
    }

    #[test]
    fn test_bad_request_is_not_retryable() {
        let http = LeiError::HttpStatus {
            status: 400,
            body: "bad filter".to_string(),
        };
        assert!(!http.is_retryable());
        assert!(http.user_friendly_message().contains("400"));
    }
}
