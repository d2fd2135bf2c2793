use crate::domain::model::RejectReason;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Catalog request failed: {0}")]
    CatalogError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Catalog returned malformed data: {message}")]
    CatalogDataError { message: String },

    #[error("Cart request rejected: {0}")]
    Rejected(RejectReason),

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Storage,
    Validation,
    Config,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::CatalogError(_) => ErrorCategory::Catalog,
            CartError::IoError(_) => ErrorCategory::Storage,
            CartError::SerializationError(_) => ErrorCategory::Data,
            CartError::CatalogDataError { .. } => ErrorCategory::Data,
            CartError::Rejected(_) => ErrorCategory::Validation,
            CartError::ConfigValidationError { .. }
            | CartError::MissingConfigError { .. }
            | CartError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 驗證拒絕是使用者可修正的，不是系統故障
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Catalog | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// The machine-readable rejection, if this is a validation rejection.
    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            CartError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CartError::CatalogError(_) => {
                "Check that the catalog endpoint is reachable and retry the request".to_string()
            }
            CartError::IoError(_) => {
                "Check that the cart storage path exists and is writable".to_string()
            }
            CartError::SerializationError(_) => {
                "The stored cart document may be corrupted; inspect the JSON file".to_string()
            }
            CartError::CatalogDataError { .. } => {
                "The catalog returned an unexpected payload; verify the endpoint version"
                    .to_string()
            }
            CartError::Rejected(reason) => reason.recovery_suggestion().to_string(),
            CartError::ConfigValidationError { field, .. }
            | CartError::MissingConfigError { field }
            | CartError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::CatalogError(_) => "The product catalog is unavailable".to_string(),
            CartError::IoError(_) => "Cart storage is unavailable".to_string(),
            CartError::SerializationError(_) | CartError::CatalogDataError { .. } => {
                "Cart data could not be processed".to_string()
            }
            CartError::Rejected(reason) => reason.to_string(),
            CartError::ConfigValidationError { .. }
            | CartError::MissingConfigError { .. }
            | CartError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
