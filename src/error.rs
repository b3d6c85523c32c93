//! Error handling for Sonora
//!
//! Every error carries a stable code and, where it helps, recovery suggestions.

use thiserror::Error;

/// Result type alias for Sonora operations
pub type Result<T> = std::result::Result<T, SonoraError>;

/// Main error type for Sonora operations
#[derive(Error, Debug)]
pub enum SonoraError {
    // Parameter Errors
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // Audio Errors
    #[error("Invalid audio: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Quiz Errors
    #[error("No active question to answer")]
    NoActiveQuestion,

    // Configuration Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SonoraError {
    /// Shorthand for an [`SonoraError::InvalidParameter`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SonoraError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SonoraError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SonoraError::InvalidAudio { .. } => "INVALID_AUDIO",
            SonoraError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SonoraError::NoActiveQuestion => "NO_ACTIVE_QUESTION",
            SonoraError::Config { .. } => "CONFIG_ERROR",
            SonoraError::Io(_) => "IO_ERROR",
            SonoraError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can recover by changing its input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SonoraError::InvalidParameter { .. }
                | SonoraError::UnsupportedFormat { .. }
                | SonoraError::NoActiveQuestion
                | SonoraError::Config { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SonoraError::InvalidParameter { .. } => vec![
                "Frequency and duration must be positive and finite",
                "Amplitude must lie in (0, 1]",
                "Sample counts and sample rates must be non-zero",
            ],
            SonoraError::UnsupportedFormat { .. } => vec![
                "Use a bit depth of 16 (PCM) or 32 (float)",
                "Only mono and stereo WAV files can be read",
            ],
            SonoraError::NoActiveQuestion => {
                vec!["Generate a question before submitting an answer"]
            }
            SonoraError::Config { .. } => vec![
                "Check the configuration file is valid JSON",
                "Run 'sonora-cli print-config' to see the defaults",
            ],
            _ => vec![],
        }
    }
}

/// Map a hound failure into an [`SonoraError::InvalidAudio`]
pub(crate) fn wav_error(context: &str, err: hound::Error) -> SonoraError {
    match err {
        hound::Error::IoError(io) => SonoraError::Io(io),
        other => SonoraError::InvalidAudio {
            reason: format!("{}: {}", context, other),
            source: Some(Box::new(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SonoraError::invalid("frequency", "must be positive");
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(SonoraError::NoActiveQuestion.error_code(), "NO_ACTIVE_QUESTION");
    }

    #[test]
    fn test_display_names_parameter() {
        let err = SonoraError::invalid("duration", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `duration`: must be positive, got -1"
        );
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = SonoraError::UnsupportedFormat {
            format: "24-bit".to_string(),
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_wav_io_error_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = wav_error("write", hound::Error::IoError(io));
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
