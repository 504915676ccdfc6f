//! Error types for release note generation.

use thiserror::Error;

/// Main error type for release note operations.
#[derive(Error, Debug)]
pub enum ReleaseNoteError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown time zone: {0}")]
    TimeZone(String),

    // Release window errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(
        "Latest tag '{tag}' is not on target branch '{branch}': cannot build a release note for it"
    )]
    BranchMismatch { tag: String, branch: String },

    #[error(
        "Unable to locate a previous release tag after scanning {scans} page(s) of tags: the release cannot be bounded"
    )]
    TagPairNotFound { scans: usize },

    // Network/API errors
    #[error("Network request failed: {0}")]
    Transport(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Parsing errors - automatic conversions via #[from]
    #[error("Datetime parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Regular expression error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ReleaseNoteError
pub type Result<T> = std::result::Result<T, ReleaseNoteError>;

impl ReleaseNoteError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a branch mismatch error
    pub fn branch_mismatch(
        tag: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self::BranchMismatch {
            tag: tag.into(),
            branch: branch.into(),
        }
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for ReleaseNoteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => Self::AuthenticationError(err.to_string()),
            Some(429) => Self::RateLimitExceeded,
            _ => Self::Transport(err.to_string()),
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for ReleaseNoteError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidConfig(format!("Invalid header value: {}", err))
    }
}
