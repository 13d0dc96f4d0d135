use headers::ContentType;
use mime::Mime;

/// Response body, classified by content type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Output {
    /// No body (no content type, or `204 No Content`).
    Empty,
    /// JSON, including vendor types such as
    /// `application/vnd.com.nsn.cumulocity.alarm+json`.
    Json(String),
    /// `text/*`.
    Text(String),
    /// Anything else, e.g. `application/octet-stream` or an event binary.
    Bytes(Vec<u8>),
}

/// How a content type is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::client) enum OutputKind {
    Json,
    Text,
    Bytes,
}

impl OutputKind {
    pub(in crate::client) fn of(content_type: &ContentType) -> Self {
        let media = Mime::from(content_type.clone());
        if media.subtype() == mime::JSON || media.suffix() == Some(mime::JSON) {
            Self::Json
        } else if media.type_() == mime::TEXT {
            Self::Text
        } else {
            Self::Bytes
        }
    }
}
