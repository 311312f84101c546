use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Animal {id} disappeared before it could be visited")]
    AnimalNotFound { id: u64 },

    #[error("Animal '{name}' is in an unexpected state: {reason}")]
    AnimalStateError { name: String, reason: String },

    #[error("Dialogue catalog error in [{category}]: {message}")]
    CatalogError { category: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Data,
    Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SitterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SitterError::IoError(_) => ErrorCategory::Io,
            SitterError::TomlParseError(_)
            | SitterError::TomlSerializeError(_)
            | SitterError::SerializationError(_)
            | SitterError::CatalogError { .. } => ErrorCategory::Data,
            SitterError::ConfigError { .. }
            | SitterError::MissingConfigError { .. }
            | SitterError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SitterError::AnimalNotFound { .. } | SitterError::AnimalStateError { .. } => {
                ErrorCategory::Entity
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一動物失敗不影響其他動物
            SitterError::AnimalNotFound { .. } | SitterError::AnimalStateError { .. } => {
                ErrorSeverity::Low
            }
            SitterError::CatalogError { .. } => ErrorSeverity::Medium,
            SitterError::ConfigError { .. }
            | SitterError::MissingConfigError { .. }
            | SitterError::InvalidConfigValueError { .. }
            | SitterError::TomlParseError(_)
            | SitterError::TomlSerializeError(_)
            | SitterError::SerializationError(_) => ErrorSeverity::High,
            SitterError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the sitter configuration file for typos and invalid values",
            ErrorCategory::Io => "Make sure the file exists and is readable",
            ErrorCategory::Data => "Make sure the file is valid TOML with the expected tables",
            ErrorCategory::Entity => "The animal will be visited again on the next run",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SitterError::IoError(e) => format!("Could not access a file: {}", e),
            SitterError::TomlParseError(e) => format!("The file is not valid TOML: {}", e),
            SitterError::MissingConfigError { field } => {
                format!("The setting '{}' is required", field)
            }
            SitterError::InvalidConfigValueError { field, reason, .. } => {
                format!("The setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_errors_are_low_severity() {
        let err = SitterError::AnimalNotFound { id: 7 };
        assert_eq!(err.category(), ErrorCategory::Entity);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_config_error_message() {
        let err = SitterError::InvalidConfigValueError {
            field: "cost_per_action".to_string(),
            value: "-5".to_string(),
            reason: "must not be negative".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "The setting 'cost_per_action' is invalid: must not be negative"
        );
    }
}
