use http::{Method, Uri};

mod builder;
pub use self::builder::ApiClientBuilder;

mod call;
pub use self::call::ApiCall;

mod param;
pub use self::param::{ParamStyle, ParamValue};

mod path;
pub use self::path::CallPath;

mod query;
pub use self::query::CallQuery;

mod headers;
pub use self::headers::{CallHeaders, PROCESSING_MODE_HEADER, ProcessingMode, UnknownProcessingMode};

mod body;
pub use self::body::{CallBody, MultipartPart};

mod output;
pub use self::output::Output;

mod result;
pub use self::result::CallResult;

mod status;
pub use self::status::ExpectedStatusCodes;

mod auth;
pub use self::auth::{Authentication, AuthenticationError, SecureString};

mod operation;
pub use self::operation::{Operation, OperationTable};

pub mod catalog;

mod error;
pub use self::error::{ApiClientError, ApiErrorBody};

#[cfg(test)]
mod integration_tests;

/// HTTP client for the platform REST API.
///
/// Cheap to clone: the underlying connection pool is shared.
///
/// # Example
///
/// ```rust,no_run
/// use c8y_core::{ApiClient, Authentication, CallQuery};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://t12345.cumulocity.com")?
///     .with_authentication(Authentication::Bearer("token".into()))
///     .build()?;
///
/// let alarms = client
///     .operation_by_id("listAlarms")?
///     .with_query(CallQuery::new().add_param("status", "ACTIVE").with_paging(50, 1))
///     .await?
///     .as_payload()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_uri: Uri,
    authentication: Option<Authentication>,
    processing_mode: Option<ProcessingMode>,
}

// Create
impl ApiClient {
    /// Creates a builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }
}

// Calls
impl ApiClient {
    /// Starts a call with the client's authentication and processing mode.
    ///
    /// # Errors
    ///
    /// Never fails here; path parameters are checked when the call is sent.
    pub fn call(
        &self,
        method: Method,
        path: impl Into<CallPath>,
    ) -> Result<ApiCall, ApiClientError> {
        Ok(ApiCall::build(
            self.client.clone(),
            self.base_uri.clone(),
            method,
            path.into(),
            self.authentication.clone(),
            self.processing_mode,
        ))
    }

    /// Starts a `GET` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn get(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::GET, path)
    }

    /// Starts a `POST` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn post(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::POST, path)
    }

    /// Starts a `PUT` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn put(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::PUT, path)
    }

    /// Starts a `DELETE` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn delete(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::DELETE, path)
    }

    /// Starts a call for an operation declaration.
    ///
    /// Method, path template, `Accept` and body media types come from the
    /// declaration; [`ApiCall::json`] bodies lose the read-only fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::RedactionError`] for an invalid read-only
    /// declaration.
    pub fn operation(&self, operation: &Operation) -> Result<ApiCall, ApiClientError> {
        let rules = operation.rules()?;
        let call = self.call(operation.method.clone(), operation.path)?;
        Ok(call.for_operation(operation, rules))
    }

    /// Starts a call for an operation of the [`catalog`], by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnknownOperation`] if the catalog has no such id.
    pub fn operation_by_id(&self, id: &str) -> Result<ApiCall, ApiClientError> {
        let table = catalog::operations();
        let operation = table.get(id)?;
        let rules = table.rules(id)?.clone();
        let call = self.call(operation.method.clone(), operation.path)?;
        Ok(call.for_operation(operation, rules))
    }
}
