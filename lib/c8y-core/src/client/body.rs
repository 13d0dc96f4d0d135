use headers::ContentType;
use serde::Serialize;

use super::ApiClientError;
use crate::redaction::{ArrayMode, Payload, RedactOptions, RuleSet, redact_with_options};

/// Request body with its content type.
///
/// # Examples
///
/// ```rust
/// use c8y_core::{ArrayMode, CallBody, RuleSet};
/// use serde_json::json;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let alarm = json!({
///     "id": "10",
///     "type": "c8y_UnavailabilityAlarm",
///     "severity": "MAJOR",
///     "count": 3,
/// });
/// let rules = RuleSet::parse(["id", "count"])?;
///
/// let body = CallBody::json_redacted(&alarm, &rules, ArrayMode::Skip)?;
/// assert_eq!(body.as_bytes(), br#"{"type":"c8y_UnavailabilityAlarm","severity":"MAJOR"}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(super) content_type: ContentType,
    #[debug(ignore)]
    pub(super) data: Vec<u8>,
}

impl CallBody {
    /// Serializes a value as an `application/json` body, without redaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized to JSON.
    pub fn json<T>(t: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(t)?;
        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// Serializes a value as JSON, after removing the read-only fields
    /// named by `rules`.
    ///
    /// With [`ArrayMode::EachElement`], a top-level array has every element
    /// redacted (bulk requests).
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::RedactionError`] if the value cannot be
    /// encoded as a JSON tree.
    pub fn json_redacted<T>(
        t: &T,
        rules: &RuleSet,
        array_mode: ArrayMode,
    ) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let payload = Payload::encode(t)?;
        let options = RedactOptions {
            array_mode,
            strict: false,
        };
        let payload = redact_with_options(payload, rules, options)?;
        let data = payload.to_json_vec()?;

        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// Serializes a value as an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error for values that are not flat structs or maps.
    pub fn form<T>(t: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_urlencoded::to_string(t)
            .map_err(|err| ApiClientError::SerializationError {
                message: format!("Failed to serialize form data: {err}"),
            })?
            .into_bytes();

        Ok(Self {
            content_type: ContentType::form_url_encoded(),
            data,
        })
    }

    /// Creates a body from raw bytes.
    pub fn raw(data: Vec<u8>, content_type: ContentType) -> Self {
        Self { content_type, data }
    }

    /// Creates a `text/plain` body.
    pub fn text(text: &str) -> Self {
        Self::raw(text.as_bytes().to_vec(), ContentType::text())
    }

    /// Creates a `multipart/form-data` body.
    ///
    /// Event binaries are uploaded this way, with a `file` part.
    ///
    /// # Errors
    ///
    /// Returns an error if a part content type is not a valid media type.
    pub fn multipart(parts: Vec<MultipartPart>) -> Result<Self, ApiClientError> {
        let boundary = format!("----formdata-c8y-{}", uuid::Uuid::new_v4());

        let mut data = Vec::new();
        for part in parts {
            data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            part.write_to(&mut data);
            data.extend_from_slice(b"\r\n");
        }
        data.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let content_type = parse_content_type(&format!("multipart/form-data; boundary={boundary}"))?;
        Ok(Self { content_type, data })
    }

    /// Replaces the content type, e.g. with a vendor media type such as
    /// `application/vnd.com.nsn.cumulocity.alarm+json`.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// The content type.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The serialized body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// One part of a multipart body.
#[derive(Clone, derive_more::Debug)]
pub struct MultipartPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    #[debug(ignore)]
    data: Vec<u8>,
}

impl MultipartPart {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: value.into().into_bytes(),
        }
    }

    /// A file field.
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: &ContentType,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.to_string()),
            data,
        }
    }

    fn write_to(self, out: &mut Vec<u8>) {
        let Self {
            name,
            filename,
            content_type,
            data,
        } = self;

        let name = escape_quoted(&name);
        let disposition = match filename {
            Some(filename) => {
                let filename = escape_quoted(&filename);
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
            }
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
        };
        out.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = content_type {
            out.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&data);
    }
}

/// Escapes a `Content-Disposition` parameter value like browsers encode form
/// data: `"`, CR and LF become `%22`, `%0D` and `%0A`.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Parses a media type, such as the vendor types of the operation catalog.
pub(in crate::client) fn parse_content_type(value: &str) -> Result<ContentType, ApiClientError> {
    let mime = value
        .parse::<mime::Mime>()
        .map_err(|err| ApiClientError::SerializationError {
            message: format!("Invalid content type '{value}': {err}"),
        })?;
    Ok(ContentType::from(mime))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_call_body_json_creates_valid_body() {
        let test_data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let body = CallBody::json(&test_data).expect("should create body");

        insta::assert_debug_snapshot!(body, @r#"
        CallBody {
            content_type: ContentType(
                "application/json",
            ),
            ..
        }
        "#);
        let parsed = serde_json::from_slice::<TestData>(&body.data).expect("should parse JSON");
        assert_eq!(parsed, test_data);
    }

    #[test]
    fn test_json_redacted_removes_nested_read_only_fields() {
        let event = json!({
            "id": "7",
            "source": {"id": "42", "name": "Device 42", "self": "https://t.example/inventory/managedObjects/42"},
            "type": "c8y_Position",
            "text": "moved",
        });
        let rules = RuleSet::parse(["id", "source.name", "source.self"]).expect("valid rules");

        let body = CallBody::json_redacted(&event, &rules, ArrayMode::Skip).expect("redact");

        assert_eq!(body.content_type, ContentType::json());
        insta::assert_snapshot!(
            String::from_utf8(body.data).expect("utf-8"),
            @r#"{"source":{"id":"42"},"type":"c8y_Position","text":"moved"}"#
        );
    }

    #[test]
    fn test_json_redacted_bulk_array() {
        let measurements = json!([
            {"id": "1", "type": "c8y_Temperature"},
            {"id": "2", "type": "c8y_Humidity"},
        ]);
        let rules = RuleSet::parse(["id"]).expect("valid rules");

        let skipped = CallBody::json_redacted(&measurements, &rules, ArrayMode::Skip)
            .expect("redact skip");
        let each = CallBody::json_redacted(&measurements, &rules, ArrayMode::EachElement)
            .expect("redact each");

        assert_eq!(
            skipped.as_bytes(),
            br#"[{"id":"1","type":"c8y_Temperature"},{"id":"2","type":"c8y_Humidity"}]"#
        );
        assert_eq!(
            each.as_bytes(),
            br#"[{"type":"c8y_Temperature"},{"type":"c8y_Humidity"}]"#
        );
    }

    #[test]
    fn test_json_redacted_rejects_non_string_keys() {
        let mut data = std::collections::BTreeMap::new();
        let _ = data.insert((1, 2), "pair");
        let rules = RuleSet::new();

        let result = CallBody::json_redacted(&data, &rules, ArrayMode::Skip);

        assert!(matches!(result, Err(ApiClientError::RedactionError(_))));
    }

    #[test]
    fn test_with_vendor_content_type() {
        let content_type =
            parse_content_type("application/vnd.com.nsn.cumulocity.alarm+json").expect("valid");

        let body = CallBody::json(&json!({"text": "hi"}))
            .expect("json")
            .with_content_type(content_type);

        assert_eq!(
            body.content_type().to_string(),
            "application/vnd.com.nsn.cumulocity.alarm+json"
        );
    }

    #[test]
    fn test_call_body_form_creates_valid_body() {
        let test_data = TestData {
            name: "test user".to_string(),
            value: 42,
        };

        let body = CallBody::form(&test_data).expect("should create form body");

        assert_eq!(body.content_type, ContentType::form_url_encoded());
        let form_data = String::from_utf8(body.data).expect("should be valid UTF-8");
        insta::assert_snapshot!(form_data, @"name=test+user&value=42");
    }

    #[test]
    fn test_call_body_raw_and_text() {
        let binary_data = vec![0xFF, 0xFE, 0xFD, 0xFC];

        let raw = CallBody::raw(binary_data.clone(), ContentType::octet_stream());
        let text = CallBody::text("Hello, World!");

        assert_eq!(raw.as_bytes(), binary_data);
        assert_eq!(text.content_type, ContentType::text());
        assert_eq!(text.as_bytes(), b"Hello, World!");
    }

    #[test]
    fn test_multipart_with_file_part() {
        let parts = vec![
            MultipartPart::text("object", r#"{"name":"log.txt","type":"text/plain"}"#),
            MultipartPart::file("file", "log.txt", &ContentType::text(), b"line 1".to_vec()),
        ];

        let body = CallBody::multipart(parts).expect("multipart");

        let content_type = body.content_type().to_string();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .expect("boundary");
        let text = String::from_utf8(body.data).expect("utf-8");
        assert!(text.starts_with(&format!("--{boundary}\r\n")));
        assert!(text.contains("Content-Disposition: form-data; name=\"object\"\r\n\r\n{"));
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"file\"; filename=\"log.txt\"\r\nContent-Type: text/plain\r\n\r\nline 1\r\n"
        ));
        assert!(text.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn test_multipart_escapes_disposition_parameters() {
        let parts = vec![MultipartPart::file(
            "file\r\nX-Injected: 1",
            "a.txt\"; name=\"evil",
            &ContentType::octet_stream(),
            b"data".to_vec(),
        )];

        let body = CallBody::multipart(parts).expect("multipart");

        let text = String::from_utf8(body.data).expect("utf-8");
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"file%0D%0AX-Injected: 1\"; filename=\"a.txt%22; name=%22evil\"\r\n"
        ));
        assert!(!text.contains("\r\nX-Injected"));
    }
}
