use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use super::ApiClientError;

/// How multi-valued parameters are written.
///
/// The platform expects comma separated lists (`?ids=1,2,3`), hence
/// [`ParamStyle::Simple`] is the default.
///
/// # Examples
///
/// ```rust
/// use c8y_core::{CallQuery, ParamStyle, ParamValue};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let query = CallQuery::new()
///     .add_param("severity", vec!["MAJOR", "CRITICAL"])
///     .add_param("fragmentType", ParamValue::with_style(vec!["a", "b"], ParamStyle::Form));
///
/// assert_eq!(
///     query.to_query_string()?,
///     "severity=MAJOR%2CCRITICAL&fragmentType=a&fragmentType=b"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// Comma separated: `value1,value2`.
    #[default]
    Simple,
    /// Repeated: `param=value1&param=value2` (query only).
    Form,
    /// Space separated: `value1 value2`.
    SpaceDelimited,
    /// Pipe separated: `value1|value2`.
    PipeDelimited,
}

impl ParamStyle {
    fn delimiter(self) -> &'static str {
        match self {
            Self::Simple | Self::Form => ",",
            Self::SpaceDelimited => " ",
            Self::PipeDelimited => "|",
        }
    }
}

/// A parameter value with its serialization style.
#[derive(Debug, Clone)]
pub struct ParamValue<T>
where
    T: Serialize,
{
    /// The parameter value.
    pub value: T,
    /// The serialization style.
    pub style: ParamStyle,
}

impl<T> ParamValue<T>
where
    T: Serialize,
{
    /// Creates a parameter with the default style.
    pub fn new(value: T) -> Self {
        Self {
            value,
            style: ParamStyle::default(),
        }
    }

    /// Creates a parameter with the given style.
    pub fn with_style(value: T, style: ParamStyle) -> Self {
        Self { value, style }
    }

    /// Serializes the value.
    ///
    /// A failure is kept in the slot and reported when the request is built.
    pub(super) fn resolve(&self, name: &str) -> ParamSlot {
        serde_json::to_value(&self.value)
            .map(|value| ResolvedParamValue {
                value,
                style: self.style,
            })
            .map_err(|error| InvalidParam {
                name: name.to_string(),
                message: error.to_string(),
            })
    }
}

impl<T> From<T> for ParamValue<T>
where
    T: Serialize,
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// A parameter as stored by paths, queries and headers.
pub(super) type ParamSlot = Result<ResolvedParamValue, InvalidParam>;

/// `true` for a parameter serialized as `null`.
pub(super) fn is_absent(slot: &ParamSlot) -> bool {
    matches!(slot, Ok(resolved) if resolved.is_absent())
}

/// A parameter whose value could not be serialized.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct InvalidParam {
    name: String,
    message: String,
}

impl InvalidParam {
    pub(super) fn to_error(&self) -> ApiClientError {
        ApiClientError::SerializationError {
            message: format!("parameter '{}': {}", self.name, self.message),
        }
    }
}

/// A serialized parameter value, ready to be written in a path, query or header.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ResolvedParamValue {
    pub(super) value: Value,
    pub(super) style: ParamStyle,
}

impl ResolvedParamValue {
    /// `true` for `null` (e.g. an optional parameter set to `None`).
    pub(super) fn is_absent(&self) -> bool {
        self.value.is_null()
    }

    fn scalar_to_string(value: &Value) -> Result<String, ApiClientError> {
        match value {
            Value::String(string) => Ok(string.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            Value::Null => Ok(String::new()),
            Value::Array(_) | Value::Object(_) => Err(ApiClientError::UnsupportedParameterValue {
                message: "nested complex values not supported in parameters".to_string(),
                value: value.clone(),
            }),
        }
    }

    fn array_to_strings(items: &[Value]) -> Result<Vec<String>, ApiClientError> {
        items.iter().map(Self::scalar_to_string).collect()
    }

    /// Single string form, arrays joined with the style delimiter.
    pub(super) fn to_string_value(&self) -> Result<String, ApiClientError> {
        match &self.value {
            Value::Array(items) => {
                Ok(Self::array_to_strings(items)?.join(self.style.delimiter()))
            }
            Value::Object(_) => Err(ApiClientError::UnsupportedParameterValue {
                message: "object values not supported in parameters".to_string(),
                value: self.value.clone(),
            }),
            scalar => Self::scalar_to_string(scalar),
        }
    }

    /// Query form: one entry per value for [`ParamStyle::Form`] arrays, a
    /// single joined entry otherwise.
    pub(super) fn to_query_values(&self) -> Result<Vec<String>, ApiClientError> {
        match (&self.value, self.style) {
            (Value::Array(items), ParamStyle::Form) => Self::array_to_strings(items),
            _ => self.to_string_value().map(|value| vec![value]),
        }
    }
}
