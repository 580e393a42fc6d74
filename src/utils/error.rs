use thiserror::Error;

#[derive(Error, Debug)]
pub enum TryoutError {
    #[error("Subscription discovery failed: {message}")]
    DiscoveryFailed { message: String },

    #[error("Cancellation of subscription {id} failed: {message}")]
    CancellationFailed { id: String, message: String },

    #[error("Subscription discovery is already in progress")]
    DiscoveryInProgress,

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Already logged in as {email}")]
    AlreadyLoggedIn { email: String },

    #[error("Subscription provider error: {message}")]
    ProviderError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Session,
    Provider,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TryoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TryoutError::DiscoveryInProgress
            | TryoutError::NotLoggedIn
            | TryoutError::AlreadyLoggedIn { .. } => ErrorCategory::Session,
            TryoutError::DiscoveryFailed { .. }
            | TryoutError::CancellationFailed { .. }
            | TryoutError::ProviderError { .. } => ErrorCategory::Provider,
            TryoutError::ConfigError { .. }
            | TryoutError::ConfigValidationError { .. }
            | TryoutError::InvalidConfigValueError { .. }
            | TryoutError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TryoutError::ValidationError { .. } => ErrorCategory::Input,
            TryoutError::IoError(_) | TryoutError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Session | ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 針對錯誤給出下一步建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TryoutError::DiscoveryFailed { .. } => "Log in again to retry discovery",
            TryoutError::CancellationFailed { .. } => {
                "The subscription was kept; try cancelling it again"
            }
            TryoutError::DiscoveryInProgress => "Wait for the current discovery to finish",
            TryoutError::NotLoggedIn => "Log in with `login <email>` first",
            TryoutError::AlreadyLoggedIn { .. } => "Use `logout` before logging in again",
            TryoutError::ProviderError { .. } => "Check the provider settings",
            TryoutError::ConfigError { .. }
            | TryoutError::ConfigValidationError { .. }
            | TryoutError::InvalidConfigValueError { .. }
            | TryoutError::MissingConfigError { .. } => {
                "Check the configuration file and command line flags"
            }
            TryoutError::ValidationError { .. } => "Correct the input and submit again",
            TryoutError::IoError(_) => "Check file paths and permissions",
            TryoutError::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TryoutError::DiscoveryFailed { .. } => {
                "We could not discover your subscriptions.".to_string()
            }
            TryoutError::CancellationFailed { .. } => {
                "We could not cancel this subscription.".to_string()
            }
            TryoutError::DiscoveryInProgress => "Discovering subscriptions...".to_string(),
            TryoutError::NotLoggedIn => "Please log in first.".to_string(),
            TryoutError::AlreadyLoggedIn { email } => format!("You are logged in as {}.", email),
            TryoutError::ValidationError { message } => message.clone(),
            TryoutError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TryoutError>;
