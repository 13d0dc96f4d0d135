use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use super::auth::AuthenticationError;
use super::output::Output;
use crate::redaction::RedactionError;

/// Maximum number of characters of a raw body kept in an error.
pub(in crate::client) const BODY_MAX_LENGTH: usize = 1024;

/// Errors that can occur when using the ApiClient.
///
/// This enum covers all possible error conditions from network issues to data validation failures.
/// All variants implement `std::error::Error` and provide detailed context for debugging.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// HTTP protocol error from the http crate.
    HttpError(http::Error),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// JSON serialization/deserialization error.
    JsonValueError(serde_json::Error),

    /// Query parameter serialization error.
    QuerySerializationError(serde_urlencoded::ser::Error),

    /// Read-only declaration or request body redaction failure.
    RedactionError(RedactionError),

    /// Credentials that cannot be turned into an `Authorization` header.
    AuthenticationError(AuthenticationError),

    /// Invalid base path configuration.
    #[display("Invalid base path: {error}")]
    #[from(skip)]
    InvalidBasePath {
        /// Description of why the base path is invalid.
        error: String,
    },

    /// JSON response deserialization failure.
    ///
    /// Occurs when the response body cannot be parsed as the expected JSON structure.
    #[display("Failed to deserialize JSON at '{path}': {error}\n{body}")]
    #[from(skip)]
    JsonError {
        /// The JSON path where the error occurred.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// Response output type is incompatible with JSON deserialization.
    #[display("Unsupported output for {name} as JSON:\n{output:?}")]
    #[from(skip)]
    UnsupportedJsonOutput {
        /// The actual response output received.
        output: Output,
        /// Name of the requested type.
        name: &'static str,
    },

    /// Response output type is incompatible with text extraction.
    #[display("Unsupported output for text:\n{output:?}")]
    #[from(skip)]
    UnsupportedTextOutput {
        /// The actual response output received.
        output: Output,
    },

    /// Response output type is incompatible with byte extraction.
    #[display("Unsupported output for bytes:\n{output:?}")]
    #[from(skip)]
    UnsupportedBytesOutput {
        /// The actual response output received.
        output: Output,
    },

    /// Path template contains unresolved parameters.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that couldn't be resolved.
        path: String,
        /// List of missing parameter names.
        missings: Vec<String>,
    },

    /// Parameter value cannot be converted to the required format.
    #[display("Unsupported parameter value: {message}. Got: {value}")]
    #[from(skip)]
    UnsupportedParameterValue {
        /// Specific error message describing the conversion failure.
        message: String,
        /// The value that failed to convert.
        value: serde_json::Value,
    },

    /// Operation not found in an operation table.
    #[display("Unknown operation: {id}")]
    #[from(skip)]
    UnknownOperation {
        /// The operation id that was looked up.
        id: String,
    },

    /// Data serialization failed.
    #[display("Serialization error: {message}")]
    #[from(skip)]
    SerializationError {
        /// Description of the serialization failure.
        message: String,
    },

    /// Server returned an unexpected HTTP status code.
    ///
    /// Carries the platform error body, parsed when it is JSON.
    #[display("Unexpected status code {status_code}: {error}")]
    #[from(skip)]
    UnexpectedStatusCode {
        /// The unexpected HTTP status code received.
        status_code: u16,
        /// The response body.
        error: ApiErrorBody,
    },
}

impl ApiClientError {
    /// The HTTP status code, for [`UnexpectedStatusCode`](Self::UnexpectedStatusCode).
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatusCode { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Error document returned by the platform on failed requests.
///
/// ```json
/// {
///   "error": "inventory/Not Found",
///   "message": "Finding device data from database failed : No managedObject for id '42'!",
///   "info": "https://cumulocity.com/guides/reference/rest-implementation"
/// }
/// ```
///
/// Bodies that are not such a document keep only their raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Error type, e.g. `inventory/Not Found`.
    #[serde(default)]
    pub error: Option<String>,
    /// Human readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Link to the documentation.
    #[serde(default)]
    pub info: Option<String>,
    /// The response body as received (truncated).
    #[serde(skip)]
    pub raw: String,
}

impl ApiErrorBody {
    /// Parses a response body, falling back to the raw text.
    pub fn parse(body: &str) -> Self {
        let raw = if body.len() > BODY_MAX_LENGTH {
            let end = (0..=BODY_MAX_LENGTH)
                .rev()
                .find(|index| body.is_char_boundary(*index))
                .unwrap_or(0);
            format!("{}... (truncated)", body.get(..end).unwrap_or_default())
        } else {
            body.to_string()
        };

        match serde_json::from_str::<Self>(body) {
            Ok(parsed) if parsed.error.is_some() || parsed.message.is_some() => {
                Self { raw, ..parsed }
            }
            _ => Self {
                raw,
                ..Self::default()
            },
        }
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => write!(f, "{error}: {message}"),
            (Some(text), None) | (None, Some(text)) => write!(f, "{text}"),
            (None, None) => write!(f, "{}", self.raw),
        }
    }
}
