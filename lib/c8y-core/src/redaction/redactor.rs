use serde_json::Value;
use tracing::{debug, trace};

use super::{FieldPath, Payload, RedactionError, RuleSet};

/// How a top-level array payload is handled.
///
/// Field paths never descend into arrays. A bulk body (an array of resources)
/// only gets its elements redacted when the caller asks for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrayMode {
    /// Leave a top-level array untouched.
    #[default]
    Skip,
    /// Apply the rules to every element of a top-level array.
    EachElement,
}

/// Options for [`redact_with_options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RedactOptions {
    /// Handling of a top-level array payload.
    pub array_mode: ArrayMode,
    /// If true, a rule that names no existing field is an error.
    ///
    /// By default (`false`) such rules are silently skipped. Enable it in
    /// tests to catch typos in read-only declarations.
    pub strict: bool,
}

/// Returns `payload` without the fields named by `rules`.
///
/// For every rule, the parent chain is followed through objects; the terminal
/// key is removed from the object reached. A rule whose chain hits a missing
/// key or a non-object (array, scalar, null) is skipped. Untouched keys keep
/// their order.
///
/// # Examples
///
/// ```rust
/// use c8y_core::{Payload, RuleSet, redact};
/// use serde_json::json;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let payload = Payload::try_from(json!({
///     "id": "123",
///     "self": "http://x/123",
///     "text": "hi",
///     "severity": "MAJOR",
/// }))?;
/// let rules = RuleSet::parse(["id", "self"])?;
///
/// let redacted = redact(payload, &rules);
///
/// assert_eq!(
///     serde_json::to_string(&redacted)?,
///     r#"{"text":"hi","severity":"MAJOR"}"#
/// );
/// # Ok(())
/// # }
/// ```
pub fn redact(mut payload: Payload, rules: &RuleSet) -> Payload {
    redact_in_place(&mut payload, rules);
    payload
}

/// Removes the fields named by `rules` from `payload`, in place.
///
/// Same semantics as [`redact`].
pub fn redact_in_place(payload: &mut Payload, rules: &RuleSet) {
    for path in rules {
        match remove_field(payload, path) {
            Some(_) => trace!(%path, "read-only field removed"),
            None => debug!(%path, "read-only field absent, rule skipped"),
        }
    }
}

/// Like [`redact`], with array handling and strictness options.
///
/// # Errors
///
/// With [`RedactOptions::strict`], returns [`RedactionError::UnresolvedPath`]
/// for the first rule that does not resolve against the payload (or, in
/// [`ArrayMode::EachElement`], against one of its elements). Resolution is
/// checked before anything is removed, so overlapping rules do not trip it.
pub fn redact_with_options(
    mut payload: Payload,
    rules: &RuleSet,
    options: RedactOptions,
) -> Result<Payload, RedactionError> {
    let RedactOptions { array_mode, strict } = options;

    match (&mut payload, array_mode) {
        (Payload::Array(items), ArrayMode::EachElement) => {
            for item in items {
                redact_checked(item, rules, strict)?;
            }
        }
        (node, _) => redact_checked(node, rules, strict)?,
    }

    Ok(payload)
}

/// Redacts a [`serde_json::Value`] by going through a [`Payload`].
///
/// # Errors
///
/// Returns [`RedactionError::InvalidPayload`] if the value nests deeper than
/// [`MAX_DEPTH`](super::MAX_DEPTH).
pub fn redact_value(value: Value, rules: &RuleSet) -> Result<Value, RedactionError> {
    let payload = Payload::try_from(value)?;
    Ok(redact(payload, rules).into())
}

fn redact_checked(
    payload: &mut Payload,
    rules: &RuleSet,
    strict: bool,
) -> Result<(), RedactionError> {
    if strict && let Some(path) = rules.unresolved(payload).first() {
        return Err(RedactionError::UnresolvedPath {
            path: path.to_string(),
        });
    }
    redact_in_place(payload, rules);
    Ok(())
}

/// Removes the terminal key of `path`, returning the removed value.
fn remove_field(payload: &mut Payload, path: &FieldPath) -> Option<Payload> {
    let (parents, terminal) = path.split_terminal();

    let mut node = payload;
    for segment in parents {
        node = node.as_object_mut()?.get_mut(segment.as_str())?;
    }

    node.as_object_mut()?.shift_remove(terminal)
}
