use std::future::{Future, IntoFuture};
use std::pin::Pin;

use headers::HeaderMapExt;
use http::header::{ACCEPT, HeaderName, HeaderValue};
use http::{Method, Uri};
use reqwest::{Body, Request};
use tracing::debug;
use url::Url;

use super::ApiCall;
use crate::client::headers::PROCESSING_MODE_HEADER;
use crate::client::operation::Operation;
use crate::client::path::PathResolved;
use crate::client::{
    ApiClientError, ApiErrorBody, Authentication, CallBody, CallHeaders, CallPath, CallQuery,
    CallResult, ExpectedStatusCodes, ProcessingMode,
};
use crate::redaction::{ArrayMode, RuleSet};

impl ApiCall {
    pub(in crate::client) fn build(
        client: reqwest::Client,
        base_uri: Uri,
        method: Method,
        path: CallPath,
        authentication: Option<Authentication>,
        processing_mode: Option<ProcessingMode>,
    ) -> Self {
        Self {
            client,
            base_uri,
            method,
            path,
            query: CallQuery::default(),
            headers: None,
            body: None,
            authentication,
            processing_mode,
            accept: None,
            content_type: None,
            read_only: None,
            array_mode: ArrayMode::default(),
            expected_status_codes: ExpectedStatusCodes::default(),
        }
    }

    /// Applies the media types and read-only rules of an operation.
    pub(in crate::client) fn for_operation(
        mut self,
        operation: &Operation,
        rules: RuleSet,
    ) -> Self {
        self.accept = operation.accept;
        self.content_type = operation.content_type;
        self.array_mode = operation.array_mode();
        self.read_only = (!rules.is_empty()).then_some(rules);
        self
    }
}

impl ApiCall {
    async fn exchange(self) -> Result<CallResult, ApiClientError> {
        let Self {
            client,
            base_uri,
            method,
            path,
            query,
            headers,
            body,
            authentication,
            processing_mode,
            accept,
            content_type: _,
            read_only: _,
            array_mode: _,
            expected_status_codes,
        } = self;

        let url = Self::build_url(&base_uri, &path, &query)?;
        let request = Self::build_request(
            method,
            url,
            headers.as_ref(),
            body.as_ref(),
            authentication.as_ref(),
            processing_mode,
            accept,
        )?;

        debug!(?request, "sending...");
        let response = client.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        if !expected_status_codes.contains(status) {
            let body = response
                .text()
                .await
                .unwrap_or_else(|err| format!("<unable to read response body: {err}>"));
            return Err(ApiClientError::UnexpectedStatusCode {
                status_code: status.as_u16(),
                error: ApiErrorBody::parse(&body),
            });
        }

        CallResult::new(response).await
    }

    pub(super) fn build_url(
        base_uri: &Uri,
        path: &CallPath,
        query: &CallQuery,
    ) -> Result<Url, ApiClientError> {
        let path_resolved = PathResolved::try_from(path.clone())?;
        let base_uri = base_uri.to_string();
        let url = format!(
            "{}/{}",
            base_uri.trim_end_matches('/'),
            path_resolved.path.trim_start_matches('/')
        );
        let mut url = url.parse::<Url>()?;

        if !query.is_empty() {
            let query_string = query.to_query_string()?;
            url.set_query(Some(&query_string));
        }

        Ok(url)
    }

    pub(super) fn build_request(
        method: Method,
        url: Url,
        headers: Option<&CallHeaders>,
        body: Option<&CallBody>,
        authentication: Option<&Authentication>,
        processing_mode: Option<ProcessingMode>,
        accept: Option<&'static str>,
    ) -> Result<Request, ApiClientError> {
        let mut request = Request::new(method, url);
        let req_headers = request.headers_mut();

        if let Some(auth) = authentication {
            let (header_name, header_value) = auth.to_header()?;
            req_headers.insert(header_name, header_value);
        }

        if let Some(accept) = accept {
            req_headers.insert(ACCEPT, HeaderValue::from_str(accept)?);
        }

        if let Some(mode) = processing_mode {
            req_headers.insert(
                HeaderName::from_bytes(PROCESSING_MODE_HEADER.as_bytes())?,
                HeaderValue::from_static(mode.as_str()),
            );
        }

        // Custom headers override the ones above
        if let Some(headers) = headers {
            for (name, value) in headers.to_http_headers()? {
                req_headers.insert(
                    HeaderName::from_bytes(name.as_bytes())?,
                    HeaderValue::from_str(&value)?,
                );
            }
        }

        if let Some(body) = body {
            req_headers.typed_insert(body.content_type.clone());
            *request.body_mut() = Some(Body::from(body.data.clone()));
        }

        Ok(request)
    }
}

/// Sends the call on `.await`.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let client = c8y_core::ApiClient::builder().build()?;
/// let response = client.get("/inventory/managedObjects")?.await?;
/// # Ok(())
/// # }
/// ```
impl IntoFuture for ApiCall {
    type Output = Result<CallResult, ApiClientError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exchange())
    }
}

