use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use super::ApiClientError;
use super::param::{ParamSlot, ParamValue};

/// Regular expression for matching path parameters in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn encode_path_param_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// A path template with named parameters, e.g. `/alarm/alarms/{id}`.
///
/// # Examples
///
/// ```rust
/// use c8y_core::CallPath;
///
/// let path = CallPath::from("/event/events/{id}/binaries").add_param("id", 4711);
/// assert_eq!(path.template(), "/event/events/{id}/binaries");
/// ```
#[derive(Debug, Clone, Default, derive_more::Display)]
#[display("{path}")]
pub struct CallPath {
    pub(super) path: String,
    args: IndexMap<String, ParamSlot>,
}

impl CallPath {
    /// Adds a path parameter.
    ///
    /// Values that cannot be serialized fail the call when the path is resolved.
    pub fn add_param<T: Serialize>(
        mut self,
        name: impl Into<String>,
        param: impl Into<ParamValue<T>>,
    ) -> Self {
        let name = name.into();
        let param = param.into();
        let slot = param.resolve(&name);
        let _ = self.args.insert(name, slot);
        self
    }

    /// The path template, placeholders included.
    pub fn template(&self) -> &str {
        &self.path
    }
}

impl From<&str> for CallPath {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for CallPath {
    fn from(path: String) -> Self {
        Self {
            path,
            args: IndexMap::new(),
        }
    }
}

/// A path with every placeholder substituted.
#[derive(Debug)]
pub(super) struct PathResolved {
    pub(super) path: String,
}

impl TryFrom<CallPath> for PathResolved {
    type Error = ApiClientError;

    fn try_from(value: CallPath) -> Result<Self, Self::Error> {
        let CallPath { mut path, args } = value;

        let mut names: HashSet<String> = RE
            .captures_iter(&path)
            .filter_map(|caps| caps.name("name"))
            .map(|found| found.as_str().to_string())
            .collect();

        for (name, slot) in args {
            if !names.remove(&name) {
                warn!(?name, "argument name not found");
                continue;
            }

            let resolved = slot.map_err(|invalid| invalid.to_error())?;
            let path_value = resolved.to_string_value()?;
            let encoded_value = encode_path_param_value(&path_value);
            path = replace_path_param(&path, &name, &encoded_value);
        }

        if names.is_empty() {
            return Ok(Self { path });
        }

        let mut missings = names.into_iter().collect::<Vec<_>>();
        missings.sort();
        Err(ApiClientError::PathUnresolved { path, missings })
    }
}
