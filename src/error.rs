//! Unified error types for pricedesk.
//!
//! Nothing in the dashboard is fatal: API failures and rejected input are
//! reported as toasts and leave local state untouched. These types carry
//! enough context for the toast text and the log line.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pricedesk operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PriceDeskError {
    /// Errors talking to the pricing API
    #[error("API request failed: {context}")]
    Api {
        context: String,
        #[source]
        source: ApiErrorKind,
    },

    /// Rejected user input (inline edits, filter text)
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific API error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Not authorized")]
    Unauthorized,

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Numeric input rejected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InputError {
    #[error("empty value")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("negative price {0} is not allowed")]
    Negative(f64),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for pricedesk operations
pub type Result<T> = std::result::Result<T, PriceDeskError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl PriceDeskError {
    /// Create an API error with context
    pub fn api(context: impl Into<String>, source: ApiErrorKind) -> Self {
        Self::Api {
            context: context.into(),
            source,
        }
    }

    /// Create an API error for a transport failure
    pub fn network(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::api(context, ApiErrorKind::Network(message.into()))
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Short text suitable for a toast.
    ///
    /// Uses the innermost cause for API errors since the context is mostly
    /// the endpoint, which the user does not need to see.
    #[must_use]
    pub fn toast_text(&self) -> String {
        match self {
            Self::Api { source, .. } => source.to_string(),
            Self::Input(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for PriceDeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PriceDeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::api(
            "JSON deserialization",
            ApiErrorKind::InvalidResponse(err.to_string()),
        )
    }
}

impl From<reqwest::Error> for PriceDeskError {
    fn from(err: reqwest::Error) -> Self {
        let context = err
            .url()
            .map_or_else(|| "request".to_string(), |u| u.path().to_string());
        if err.is_decode() {
            Self::api(context, ApiErrorKind::InvalidResponse(err.to_string()))
        } else {
            Self::network(context, err.to_string())
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward, so a failure deep in the client reads
/// `"updating product 7: PATCH /productos/7/precio"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<PriceDeskError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: PriceDeskError, new_ctx: &str) -> PriceDeskError {
    match err {
        PriceDeskError::Api {
            context: existing,
            source,
        } => PriceDeskError::Api {
            context: chain_context(new_ctx, &existing),
            source,
        },
        PriceDeskError::Io {
            path,
            message,
            source,
        } => PriceDeskError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        PriceDeskError::Config(msg) => PriceDeskError::Config(chain_context(new_ctx, &msg)),
        PriceDeskError::Validation(msg) => {
            PriceDeskError::Validation(chain_context(new_ctx, &msg))
        }
        input @ PriceDeskError::Input(_) => input,
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
