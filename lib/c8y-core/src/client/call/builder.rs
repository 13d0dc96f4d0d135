use std::ops::RangeInclusive;

use headers::ContentType;
use http::StatusCode;
use serde::Serialize;

use super::ApiCall;
use crate::client::body::parse_content_type;
use crate::client::param::ParamValue;
use crate::client::{
    ApiClientError, Authentication, CallBody, CallHeaders, CallQuery, ExpectedStatusCodes,
    MultipartPart, ProcessingMode,
};
use crate::redaction::{ArrayMode, RuleSet};

impl ApiCall {
    // =============================================================================
    // Request Configuration Methods
    // =============================================================================

    /// Sets a path parameter.
    ///
    /// ```rust,no_run
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = c8y_core::ApiClient::builder().build()?;
    /// let result = client
    ///     .delete("/event/events/{id}")?
    ///     .with_path_param("id", 4711)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_path_param<T: Serialize>(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue<T>>,
    ) -> Self {
        self.path = self.path.add_param(name, value);
        self
    }

    /// Replaces the query parameters.
    pub fn with_query(mut self, query: CallQuery) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query parameter.
    pub fn with_query_param<T: Serialize>(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue<T>>,
    ) -> Self {
        self.query = self.query.add_param(name, value);
        self
    }

    /// Merges headers with the ones already set; the new values win.
    pub fn with_headers(mut self, headers: CallHeaders) -> Self {
        self.headers = match self.headers.take() {
            Some(existing) => Some(existing.merge(headers)),
            None => Some(headers),
        };
        self
    }

    /// Adds a single header.
    pub fn with_header<T: Serialize>(
        self,
        name: impl Into<String>,
        value: impl Into<ParamValue<T>>,
    ) -> Self {
        let headers = CallHeaders::new().add_header(name, value);
        self.with_headers(headers)
    }

    /// Overrides the client processing mode for this call.
    pub fn with_processing_mode(mut self, mode: ProcessingMode) -> Self {
        self.processing_mode = Some(mode);
        self
    }

    /// Sets the `Accept` media type.
    pub fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Overrides the client credentials for this call.
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Sends this call without credentials.
    pub fn with_authentication_none(mut self) -> Self {
        self.authentication = None;
        self
    }

    // =============================================================================
    // Read-only Rules
    // =============================================================================

    /// Adds read-only rules for [`json`](Self::json) bodies.
    ///
    /// Call it before `json`; rules added afterward do not apply to a body
    /// already serialized.
    pub fn with_read_only(mut self, rules: &RuleSet) -> Self {
        self.read_only = Some(match self.read_only.take() {
            Some(existing) => existing.union(rules),
            None => rules.clone(),
        });
        self
    }

    /// Chooses how a top-level array body is redacted.
    pub fn with_array_mode(mut self, array_mode: ArrayMode) -> Self {
        self.array_mode = array_mode;
        self
    }

    /// Drops the read-only rules, sending [`json`](Self::json) bodies as is.
    pub fn without_redaction(mut self) -> Self {
        self.read_only = None;
        self
    }

    // =============================================================================
    // Status Code Validation Methods
    // =============================================================================

    /// Replaces the accepted status codes.
    pub fn with_expected_status_codes(mut self, codes: ExpectedStatusCodes) -> Self {
        self.expected_status_codes = codes;
        self
    }

    /// Accepts only the given status code.
    pub fn with_expected_status_code(self, status: StatusCode) -> Self {
        self.with_expected_status_codes(ExpectedStatusCodes::only(status))
    }

    /// Also accepts the given status code.
    pub fn add_expected_status_code(mut self, status: StatusCode) -> Self {
        self.expected_status_codes = self.expected_status_codes.add_status(status);
        self
    }

    /// Accepts an inclusive range of status codes.
    pub fn with_expected_status_code_range(self, range: RangeInclusive<StatusCode>) -> Self {
        self.with_expected_status_codes(ExpectedStatusCodes::from_range_inclusive(range))
    }

    // =============================================================================
    // Request Body Methods
    // =============================================================================

    /// Sets a JSON body.
    ///
    /// With read-only rules (from the operation, or [`with_read_only`](Self::with_read_only)),
    /// the named fields are removed first. With an operation media type, it
    /// becomes the body content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T>(mut self, t: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let body = match &self.read_only {
            Some(rules) => CallBody::json_redacted(t, rules, self.array_mode)?,
            None => CallBody::json(t)?,
        };
        let body = match self.content_type {
            Some(media_type) => body.with_content_type(parse_content_type(media_type)?),
            None => body,
        };
        self.body = Some(body);
        Ok(self)
    }

    /// Sets an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error for values that are not flat structs or maps.
    pub fn form<T>(mut self, t: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        self.body = Some(CallBody::form(t)?);
        Ok(self)
    }

    /// Sets a raw body.
    pub fn raw(mut self, data: Vec<u8>, content_type: ContentType) -> Self {
        self.body = Some(CallBody::raw(data, content_type));
        self
    }

    /// Sets a `text/plain` body.
    pub fn text(mut self, text: &str) -> Self {
        self.body = Some(CallBody::text(text));
        self
    }

    /// Sets a `multipart/form-data` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated content type is invalid.
    pub fn multipart(mut self, parts: Vec<MultipartPart>) -> Result<Self, ApiClientError> {
        self.body = Some(CallBody::multipart(parts)?);
        Ok(self)
    }

    /// Sets a prepared body, sent as is.
    pub fn body(mut self, body: CallBody) -> Self {
        self.body = Some(body);
        self
    }
}
