use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Notifier error: {0}")]
    Notify(#[from] NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid source {name}: {message}")]
    InvalidSource { name: String, message: String },

    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    #[error("Unknown tracker type: {0}")]
    UnknownTracker(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Raised by a tracker when the page no longer has the shape it expects.
///
/// "Nothing in stock" is never an error; trackers return `Ok(false)` for that.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Missing attribute {attribute} on {selector}")]
    MissingAttribute { selector: String, attribute: String },

    #[error("Unexpected JSON shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

impl ClassifyError {
    pub fn missing(selector: impl Into<String>) -> Self {
        ClassifyError::ElementNotFound {
            selector: selector.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notifier rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Notifier not configured: {0}")]
    NotConfigured(String),

    #[error("Email error: {0}")]
    Email(String),
}

impl From<lettre::error::Error> for NotifyError {
    fn from(err: lettre::error::Error) -> Self {
        NotifyError::Email(err.to_string())
    }
}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(err: lettre::address::AddressError) -> Self {
        NotifyError::Email(format!("invalid address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        NotifyError::Email(err.to_string())
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
