use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("BibTeX parse error at byte {position}: {message}")]
    BibParseError { position: usize, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    FileSystem,
    DataFormat,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn processing(message: impl Into<String>) -> Self {
        SyncError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SyncError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ApiError(_) | SyncError::HttpStatusError { .. } => ErrorCategory::Network,
            SyncError::IoError(_) => ErrorCategory::FileSystem,
            SyncError::SerializationError(_)
            | SyncError::YamlError(_)
            | SyncError::BibParseError { .. } => ErrorCategory::DataFormat,
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            SyncError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆引用格式錯誤只會退回原始文字
            SyncError::BibParseError { .. } => ErrorSeverity::Low,
            SyncError::ApiError(_) | SyncError::HttpStatusError { .. } => ErrorSeverity::Medium,
            SyncError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SyncError::ApiError(_) => {
                "Check your network connection and that the remote service is reachable".to_string()
            }
            SyncError::HttpStatusError { status, .. } if *status == 404 => {
                "Verify the configured identifier exists on the remote service".to_string()
            }
            SyncError::HttpStatusError { .. } => {
                "The remote service rejected the request; try again later".to_string()
            }
            SyncError::IoError(_) => {
                "Check that the data files exist and are readable and writable".to_string()
            }
            SyncError::SerializationError(_) | SyncError::YamlError(_) => {
                "Check the file or response for malformed JSON/YAML".to_string()
            }
            SyncError::ConfigError { .. } | SyncError::ConfigValidationError { .. } => {
                "Review pubsync.toml and the socials file".to_string()
            }
            SyncError::MissingConfigError { field } => {
                format!("Add '{}' to your configuration", field)
            }
            SyncError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            SyncError::ProcessingError { .. } => {
                "Inspect the input data files for unexpected structure".to_string()
            }
            SyncError::BibParseError { .. } => {
                "The raw citation text is kept unchanged".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not fetch publications: {}", self),
            ErrorCategory::FileSystem => format!("File access failed: {}", self),
            ErrorCategory::DataFormat => format!("Unreadable data: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }

    /// 依嚴重程度決定行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
