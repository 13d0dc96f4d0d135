use http::{Method, Uri};

use super::{
    Authentication, CallBody, CallHeaders, CallPath, CallQuery, ExpectedStatusCodes,
    ProcessingMode,
};
use crate::redaction::{ArrayMode, RuleSet};

mod builder;
mod execution;

/// A single API call, built step by step and sent with `.await`.
///
/// Created by [`ApiClient::call`](super::ApiClient::call), the method shortcuts
/// ([`get`](super::ApiClient::get), [`post`](super::ApiClient::post), ...) or
/// [`ApiClient::operation`](super::ApiClient::operation). The latter pre-fills the
/// media types and the read-only rules applied by [`json`](Self::json).
///
/// # Example
///
/// ```rust,no_run
/// use c8y_core::{ApiClient, CallQuery, catalog};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder().with_host("t12345.cumulocity.com").build()?;
///
/// // `id`, `count` and `source.self` are dropped before sending
/// let fetched = json!({
///     "id": "10",
///     "count": 4,
///     "source": {"id": "42", "self": "https://t12345.cumulocity.com/inventory/managedObjects/42"},
///     "type": "c8y_UnavailabilityAlarm",
///     "text": "No data received",
///     "severity": "MAJOR",
///     "time": "2024-03-01T10:00:00.000Z",
/// });
/// let created = client
///     .operation(&catalog::CREATE_ALARM)?
///     .json(&fetched)?
///     .await?
///     .as_payload()?;
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
pub struct ApiCall {
    #[debug(skip)]
    pub(super) client: reqwest::Client,
    pub(super) base_uri: Uri,

    pub(super) method: Method,
    pub(super) path: CallPath,
    pub(super) query: CallQuery,
    pub(super) headers: Option<CallHeaders>,

    #[debug(ignore)]
    pub(super) body: Option<CallBody>,

    pub(super) authentication: Option<Authentication>,
    pub(super) processing_mode: Option<ProcessingMode>,
    pub(super) accept: Option<&'static str>,
    pub(super) content_type: Option<&'static str>,
    pub(super) read_only: Option<RuleSet>,
    pub(super) array_mode: ArrayMode,
    pub(super) expected_status_codes: ExpectedStatusCodes,
}
