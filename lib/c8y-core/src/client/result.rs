use std::any::type_name;

use headers::{ContentType, HeaderMapExt};
use http::StatusCode;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ApiClientError;
use super::output::{Output, OutputKind};
use crate::redaction::Payload;

/// Response of an API call.
///
/// The body is read eagerly; the `as_*` accessors choose how to interpret it.
///
/// # Example
///
/// ```rust,no_run
/// use c8y_core::ApiClient;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Alarm {
///     id: String,
///     severity: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder().with_host("t12345.cumulocity.com").build()?;
///
/// let result = client.get("/alarm/alarms/{id}")?.with_path_param("id", 10).await?;
/// let alarm = result.as_json::<Alarm>()?;
/// println!("{}: {}", alarm.id, alarm.severity);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CallResult {
    status: StatusCode,
    content_type: Option<ContentType>,
    output: Output,
}

impl CallResult {
    pub(in crate::client) async fn new(response: Response) -> Result<Self, ApiClientError> {
        let status = response.status();
        let content_type = response.headers().typed_get::<ContentType>();
        let output = Self::read_output(response, content_type.as_ref(), status).await?;
        debug!(%status, ?content_type, "response received");

        Ok(Self {
            status,
            content_type,
            output,
        })
    }

    async fn read_output(
        response: Response,
        content_type: Option<&ContentType>,
        status: StatusCode,
    ) -> Result<Output, ApiClientError> {
        if status == StatusCode::NO_CONTENT {
            return Ok(Output::Empty);
        }
        let Some(content_type) = content_type else {
            let bytes = response.bytes().await?;
            let output = if bytes.is_empty() {
                Output::Empty
            } else {
                Output::Bytes(bytes.to_vec())
            };
            return Ok(output);
        };

        let output = match OutputKind::of(content_type) {
            OutputKind::Json => Output::Json(response.text().await?),
            OutputKind::Text => Output::Text(response.text().await?),
            OutputKind::Bytes => Output::Bytes(response.bytes().await?.to_vec()),
        };
        Ok(output)
    }

    /// The response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response content type, if any.
    pub fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }

    /// The response body.
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Deserializes a JSON body.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::UnsupportedJsonOutput`] if the body is not JSON
    /// - [`ApiClientError::JsonError`] with the JSON path of the failure
    pub fn as_json<T>(&self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let Output::Json(json) = &self.output else {
            return Err(ApiClientError::UnsupportedJsonOutput {
                output: self.output.clone(),
                name: type_name::<T>(),
            });
        };

        let deserializer = &mut serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(deserializer).map_err(|err| ApiClientError::JsonError {
            path: err.path().to_string(),
            error: err.into_inner(),
            body: json.clone(),
        })
    }

    /// Deserializes a JSON body, or returns `None` for `204 No Content`
    /// and `404 Not Found`.
    ///
    /// A 404 only reaches this point if it was added to the expected status codes.
    ///
    /// # Errors
    ///
    /// Same as [`as_json`](Self::as_json).
    pub fn as_optional_json<T>(&self) -> Result<Option<T>, ApiClientError>
    where
        T: DeserializeOwned,
    {
        if self.status == StatusCode::NO_CONTENT || self.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.as_json().map(Some)
    }

    /// Reads a JSON body as a [`Payload`], keeping key order.
    ///
    /// Useful to send a fetched resource back, once redacted.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or nests too deep.
    pub fn as_payload(&self) -> Result<Payload, ApiClientError> {
        let value = self.as_json::<serde_json::Value>()?;
        let payload = Payload::try_from(value)?;
        Ok(payload)
    }

    /// Returns a text body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnsupportedTextOutput`] if the body is not text.
    pub fn as_text(&self) -> Result<&str, ApiClientError> {
        let Output::Text(text) = &self.output else {
            return Err(ApiClientError::UnsupportedTextOutput {
                output: self.output.clone(),
            });
        };
        Ok(text)
    }

    /// Returns a binary body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnsupportedBytesOutput`] if the body is JSON,
    /// text, or empty.
    pub fn as_bytes(&self) -> Result<&[u8], ApiClientError> {
        let Output::Bytes(bytes) = &self.output else {
            return Err(ApiClientError::UnsupportedBytesOutput {
                output: self.output.clone(),
            });
        };
        Ok(bytes.as_slice())
    }

    /// Accepts any body and discards it.
    ///
    /// # Errors
    ///
    /// Never fails; kept fallible to chain like the other accessors.
    pub fn as_empty(&self) -> Result<(), ApiClientError> {
        if !matches!(self.output, Output::Empty) {
            debug!(status = %self.status, "discarding response body");
        }
        Ok(())
    }
}

#[cfg(test)]
impl CallResult {
    pub(in crate::client) fn from_parts(
        status: StatusCode,
        content_type: Option<ContentType>,
        output: Output,
    ) -> Self {
        Self {
            status,
            content_type,
            output,
        }
    }
}
