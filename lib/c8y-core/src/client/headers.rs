use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ApiClientError;
use super::param::{InvalidParam, ParamSlot, ParamValue};

/// Header selecting how the platform processes an inbound request.
pub const PROCESSING_MODE_HEADER: &str = "X-Cumulocity-Processing-Mode";

/// Processing mode of a data modifying request.
///
/// # Example
///
/// ```rust
/// use c8y_core::ProcessingMode;
///
/// assert_eq!(ProcessingMode::Transient.as_str(), "TRANSIENT");
/// assert_eq!("quiescent".parse::<ProcessingMode>(), Ok(ProcessingMode::Quiescent));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessingMode {
    /// Stored in the database, then forwarded to real-time processing.
    #[default]
    Persistent,
    /// Forwarded to real-time processing only, not stored.
    Transient,
    /// Stored like `Persistent`, but without triggering real-time notifications.
    Quiescent,
    /// Forwarded to real-time processing only, without notifications.
    Cep,
}

impl ProcessingMode {
    /// The header value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Persistent => "PERSISTENT",
            Self::Transient => "TRANSIENT",
            Self::Quiescent => "QUIESCENT",
            Self::Cep => "CEP",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown processing mode name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("unknown processing mode: {name}")]
pub struct UnknownProcessingMode {
    /// The rejected name.
    pub name: String,
}

impl FromStr for ProcessingMode {
    type Err = UnknownProcessingMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "PERSISTENT" => Ok(Self::Persistent),
            "TRANSIENT" => Ok(Self::Transient),
            "QUIESCENT" => Ok(Self::Quiescent),
            "CEP" => Ok(Self::Cep),
            _ => Err(UnknownProcessingMode {
                name: value.to_string(),
            }),
        }
    }
}

/// Custom headers of an API call, kept in insertion order.
///
/// Names are case-insensitive and stored lowercase, as `http::HeaderName`
/// does. Values go through the same serialization as path and query parameters:
/// arrays are comma separated, `None` is left out.
///
/// # Example
///
/// ```rust
/// use c8y_core::{CallHeaders, ProcessingMode};
///
/// let headers = CallHeaders::new()
///     .add_header("X-Request-ID", "abc-123-def")
///     .with_processing_mode(ProcessingMode::Transient);
/// assert_eq!(headers.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallHeaders {
    headers: IndexMap<String, ParamSlot>,
}

impl CallHeaders {
    /// Creates an empty set of headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing any previous value with the same name,
    /// whatever its case.
    pub fn add_header<T: Serialize>(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue<T>>,
    ) -> Self {
        let name = name.into().to_ascii_lowercase();
        let param = value.into();
        let slot = param.resolve(&name);
        let _ = self.headers.insert(name, slot);
        self
    }

    /// Sets the `X-Cumulocity-Processing-Mode` header.
    pub fn with_processing_mode(self, mode: ProcessingMode) -> Self {
        self.add_header(PROCESSING_MODE_HEADER, mode.as_str())
    }

    /// Merges another set of headers into this one; its values win on conflicts.
    pub fn merge(mut self, other: Self) -> Self {
        self.headers.extend(other.headers);
        self
    }

    /// Checks if there is no header.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns the number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Checks if a header is set, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }

    /// Converts headers to name/value pairs for reqwest.
    ///
    /// Fails on the first value that could not be serialized.
    pub(in crate::client) fn to_http_headers(
        &self,
    ) -> Result<Vec<(String, String)>, ApiClientError> {
        let mut result = Vec::with_capacity(self.headers.len());
        for (name, slot) in &self.headers {
            let resolved = slot.as_ref().map_err(InvalidParam::to_error)?;
            if resolved.is_absent() {
                continue;
            }
            let value = resolved.to_string_value()?;
            result.push((name.clone(), value));
        }
        Ok(result)
    }
}
