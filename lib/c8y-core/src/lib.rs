//! # c8y-core
//!
//! REST client core for the Cumulocity IoT platform.
//!
//! The platform assigns some fields itself (`id`, `self`, `creationTime`, ...)
//! and rejects them in create and update requests. This crate removes them from
//! request bodies just before they are sent, so a resource read from the API,
//! or a struct that models it in full, can be written back without cleaning.
//!
//! - [`redaction`] - the redaction itself: [`Payload`], [`FieldPath`], [`RuleSet`], [`redact`]
//! - [`ApiClient`] - an HTTP client whose calls apply the read-only rules of an [`Operation`]
//! - [`catalog`] - the read-only declarations of the platform operations
//!
//! ## Redacting a payload
//!
//! ```rust
//! use c8y_core::{Payload, RuleSet, redact};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let event = Payload::try_from(json!({
//!     "id": "4711",
//!     "source": {"id": "42", "name": "Device 42"},
//!     "type": "c8y_LocationUpdate",
//!     "text": "Location updated",
//! }))?;
//! let rules = RuleSet::parse(["id", "source.name"])?;
//!
//! let body = redact(event, &rules);
//!
//! assert_eq!(
//!     serde_json::to_string(&body)?,
//!     r#"{"source":{"id":"42"},"type":"c8y_LocationUpdate","text":"Location updated"}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Calling the platform
//!
//! ```rust,no_run
//! use c8y_core::{ApiClient, Authentication, catalog};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Alarm {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     id: Option<String>,
//!     #[serde(rename = "type")]
//!     kind: String,
//!     text: String,
//!     severity: String,
//!     status: String,
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     count: Option<u32>,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder()
//!     .with_base_url("https://t12345.cumulocity.com")?
//!     .with_authentication(Authentication::Bearer("token".into()))
//!     .build()?;
//!
//! let mut alarm: Alarm = client
//!     .operation(&catalog::GET_ALARM)?
//!     .with_path_param("id", 10)
//!     .await?
//!     .as_json()?;
//!
//! // `id`, `count`, `type`, ... are not sent
//! alarm.status = "ACKNOWLEDGED".to_string();
//! client
//!     .operation(&catalog::UPDATE_ALARM)?
//!     .with_path_param("id", 10)
//!     .json(&alarm)?
//!     .await?
//!     .as_empty()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: requests and responses at `debug`,
//! skipped rules at `debug`, removed fields at `trace`. Install a subscriber
//! (e.g. `tracing-subscriber`) to see them.

pub mod redaction;
pub use self::redaction::{
    ArrayMode, FieldPath, MAX_DEPTH, Payload, RedactOptions, RedactionError, RuleSet, redact,
    redact_in_place, redact_value, redact_with_options,
};

mod client;

pub use self::client::{
    ApiCall, ApiClient, ApiClientBuilder, ApiClientError, ApiErrorBody, Authentication,
    AuthenticationError, CallBody, CallHeaders, CallPath, CallQuery, CallResult,
    ExpectedStatusCodes, MultipartPart, Operation, OperationTable, Output, PROCESSING_MODE_HEADER,
    ParamStyle, ParamValue, ProcessingMode, SecureString, UnknownProcessingMode, catalog,
};
