use std::fmt;

use http::Method;
use indexmap::IndexMap;

use super::ApiClientError;
use crate::redaction::{ArrayMode, RedactionError, RuleSet};

/// A platform REST operation and the fields its request body must not carry.
///
/// Declared as constants, so a table of operations lives in static memory:
///
/// ```rust
/// use c8y_core::Operation;
/// use http::Method;
///
/// const CREATE_EVENT: Operation = Operation {
///     id: "createEvent",
///     method: Method::POST,
///     path: "/event/events",
///     content_type: Some("application/vnd.com.nsn.cumulocity.event+json"),
///     accept: Some("application/vnd.com.nsn.cumulocity.event+json"),
///     read_only: &["id", "self", "creationTime", "lastUpdated", "source.name", "source.self"],
///     bulk: false,
/// };
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rules = CREATE_EVENT.rules()?;
/// assert_eq!(rules.len(), 6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Unique id, e.g. `createAlarm`.
    pub id: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template, e.g. `/alarm/alarms/{id}`.
    pub path: &'static str,
    /// Media type of the request body, if the operation has one.
    pub content_type: Option<&'static str>,
    /// Media type sent in the `Accept` header.
    pub accept: Option<&'static str>,
    /// Dotted paths of the fields assigned by the platform.
    pub read_only: &'static [&'static str],
    /// The request body is an array of resources, each one redacted.
    pub bulk: bool,
}

impl Operation {
    /// Parses the read-only declarations.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path or a path with an empty segment.
    pub fn rules(&self) -> Result<RuleSet, RedactionError> {
        RuleSet::parse(self.read_only)
    }

    /// How a top-level array body is redacted.
    pub fn array_mode(&self) -> ArrayMode {
        if self.bulk {
            ArrayMode::EachElement
        } else {
            ArrayMode::Skip
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.id, self.method, self.path)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    operation: &'static Operation,
    rules: RuleSet,
}

/// Operations keyed by id, with their parsed read-only rules.
#[derive(Debug, Clone, Default)]
pub struct OperationTable {
    entries: IndexMap<&'static str, Entry>,
}

impl OperationTable {
    /// Builds a table, parsing every read-only declaration once.
    ///
    /// A later operation with an already used id replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns the first invalid read-only declaration.
    pub fn new<I>(operations: I) -> Result<Self, RedactionError>
    where
        I: IntoIterator<Item = &'static Operation>,
    {
        let mut entries = IndexMap::new();
        for operation in operations {
            let rules = operation.rules()?;
            let _ = entries.insert(operation.id, Entry { operation, rules });
        }
        Ok(Self { entries })
    }

    /// Looks up an operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnknownOperation`] if there is no such id.
    pub fn get(&self, id: &str) -> Result<&'static Operation, ApiClientError> {
        self.entry(id).map(|entry| entry.operation)
    }

    /// The read-only rules of an operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnknownOperation`] if there is no such id.
    pub fn rules(&self, id: &str) -> Result<&RuleSet, ApiClientError> {
        self.entry(id).map(|entry| &entry.rules)
    }

    /// Iterates over the operations, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Operation, &RuleSet)> + '_ {
        self.entries
            .values()
            .map(|entry| (entry.operation, &entry.rules))
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &str) -> Result<&Entry, ApiClientError> {
        self.entries
            .get(id)
            .ok_or_else(|| ApiClientError::UnknownOperation { id: id.to_string() })
    }
}
