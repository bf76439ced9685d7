use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Only generated {generated} of {requested} unique barcodes after {attempts} attempts")]
    GenerationShortfall {
        generated: usize,
        requested: usize,
        attempts: usize,
    },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Composite error: {message}")]
    CompositeError { message: String },

    #[error("Encode error: {message}")]
    EncodeError { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Generation,
    Rendering,
    Export,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BarcodeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    pub fn composite(message: impl Into<String>) -> Self {
        Self::CompositeError {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::EncodeError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::ConfigError { .. } => ErrorCategory::Input,
            Self::GenerationShortfall { .. } => ErrorCategory::Generation,
            Self::RenderError { .. } | Self::CompositeError { .. } | Self::EncodeError { .. } => {
                ErrorCategory::Rendering
            }
            Self::ZipError(_) | Self::SerializationError(_) => ErrorCategory::Export,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 只是警告，部分結果仍然有效
            Self::GenerationShortfall { .. } => ErrorSeverity::Low,
            Self::RenderError { .. } => ErrorSeverity::Medium,
            Self::ValidationError { .. }
            | Self::ConfigError { .. }
            | Self::CompositeError { .. }
            | Self::EncodeError { .. }
            | Self::ZipError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的訊息 (短暫顯示的提示)
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::GenerationShortfall {
                generated,
                attempts,
                ..
            } => format!(
                "Warning: only generated {} unique barcodes (after {} attempts)",
                generated, attempts
            ),
            Self::RenderError { .. } => {
                "Failed to render the barcode image, please try again".to_string()
            }
            Self::CompositeError { .. } | Self::EncodeError { .. } => {
                "Failed to create the barcode image, please try again".to_string()
            }
            Self::ZipError(_) => "Failed to bundle the barcodes, please try again".to_string(),
            Self::IoError(e) => format!("Failed to write output: {}", e),
            Self::SerializationError(_) => "Failed to format the output".to_string(),
            Self::ConfigError { message } => format!("Invalid configuration: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Use a prefix of 0-8 digits and a count between 1 and 50"
            }
            Self::GenerationShortfall { .. } => "Run again or use a shorter prefix",
            Self::RenderError { .. } => "Check that the code is a valid 13-digit EAN",
            Self::CompositeError { .. } => {
                "Set [composite].caption_font to a TTF/OTF file or remove the product name"
            }
            Self::EncodeError { .. } => "Check the image size settings in [composite]",
            Self::ZipError(_) | Self::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            Self::SerializationError(_) => "Try --format text",
            Self::ConfigError { .. } => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, BarcodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_is_a_low_severity_warning() {
        let err = BarcodeError::GenerationShortfall {
            generated: 3,
            requested: 5,
            attempts: 500,
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Generation);
        assert!(err.user_friendly_message().contains("500"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = BarcodeError::validation("Count may not exceed 50");
        assert_eq!(err.user_friendly_message(), "Count may not exceed 50");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: BarcodeError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
