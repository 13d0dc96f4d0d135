//! Read-only field redaction for outgoing request bodies.
//!
//! The platform assigns some fields itself (`id`, `self`, `creationTime`, ...)
//! and rejects or ignores them on write. A value read from the API and sent
//! back in a create or update request still carries them, so they are stripped
//! just before the body is serialized.
//!
//! The pieces:
//!
//! - [`Payload`] - the neutral JSON tree the redaction works on
//! - [`FieldPath`] - a chain of object keys, e.g. `c8y_IsBinary.length`
//! - [`RuleSet`] - the read-only paths of one operation
//! - [`redact`] / [`redact_in_place`] / [`redact_with_options`] - the redaction
//!
//! # Semantics
//!
//! For a rule `s1.s2...sn`, the keys `s1` to `s(n-1)` are followed through
//! nested objects, then `sn` is removed from the object reached. A missing key
//! or a non-object on the way makes the rule a no-op. Arrays are never
//! descended into. Every other field keeps its value and position.
//!
//! # Example
//!
//! ```rust
//! use c8y_core::{Payload, RuleSet, redact};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Event {
//!     id: Option<String>,
//!     #[serde(rename = "type")]
//!     kind: String,
//!     text: String,
//! }
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let event = Event {
//!     id: Some("4711".to_string()),
//!     kind: "c8y_LocationUpdate".to_string(),
//!     text: "Location updated".to_string(),
//! };
//!
//! let rules = RuleSet::parse(["id", "self", "creationTime"])?;
//! let body = redact(Payload::encode(&event)?, &rules);
//!
//! assert_eq!(
//!     serde_json::to_string(&body)?,
//!     r#"{"type":"c8y_LocationUpdate","text":"Location updated"}"#
//! );
//! # Ok(())
//! # }
//! ```

mod error;
pub use self::error::RedactionError;

mod payload;
pub use self::payload::{MAX_DEPTH, Payload};

mod path;
pub use self::path::FieldPath;

mod rules;
pub use self::rules::RuleSet;

mod redactor;
pub use self::redactor::{
    ArrayMode, RedactOptions, redact, redact_in_place, redact_value, redact_with_options,
};
