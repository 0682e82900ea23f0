use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("No free username available for base '{base}' (suffixes 000-999 taken)")]
    UsernameSpaceExhausted { base: String },

    #[error("Invalid username '{username}': {reason}")]
    InvalidUsername { username: String, reason: String },

    #[error("Failed to enumerate accounts from '{source_path}': {reason}")]
    AccountDirectory { source_path: String, reason: String },

    #[error("Account creation failed for '{username}': {reason}")]
    AccountCreation { username: String, reason: String },

    #[error("Password assignment failed for '{username}': {reason}")]
    PasswordAssignment { username: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，用於日誌欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Derivation,
    Creation,
    Password,
    Configuration,
    System,
}

impl ProvisionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProvisionError::UsernameSpaceExhausted { .. }
            | ProvisionError::InvalidUsername { .. }
            | ProvisionError::AccountDirectory { .. } => ErrorCategory::Derivation,
            ProvisionError::AccountCreation { .. } => ErrorCategory::Creation,
            ProvisionError::PasswordAssignment { .. } => ErrorCategory::Password,
            ProvisionError::ConfigError { .. } | ProvisionError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            ProvisionError::IoError(_) => ErrorCategory::System,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
