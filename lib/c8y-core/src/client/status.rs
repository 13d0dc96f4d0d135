use std::ops::{Range, RangeInclusive};

use http::StatusCode;

/// Status codes accepted as a successful response.
///
/// Defaults to `200..300`. Anything else turns into
/// [`ApiClientError::UnexpectedStatusCode`](super::ApiClientError::UnexpectedStatusCode).
///
/// # Example
///
/// ```rust
/// use c8y_core::ExpectedStatusCodes;
/// use http::StatusCode;
///
/// // Treat 404 as a regular answer when probing for an external id
/// let codes = ExpectedStatusCodes::default().add_status(StatusCode::NOT_FOUND);
/// assert!(codes.contains(StatusCode::OK));
/// assert!(codes.contains(StatusCode::NOT_FOUND));
/// assert!(!codes.contains(StatusCode::CONFLICT));
/// ```
#[derive(Debug, Clone)]
pub struct ExpectedStatusCodes {
    ranges: Vec<StatusCodeRange>,
}

#[derive(Debug, Clone)]
enum StatusCodeRange {
    Single(u16),
    Inclusive(RangeInclusive<u16>),
    Exclusive(Range<u16>),
}

impl ExpectedStatusCodes {
    /// Accepts only the given status code.
    pub fn only(status: StatusCode) -> Self {
        Self {
            ranges: vec![StatusCodeRange::Single(status.as_u16())],
        }
    }

    /// Accepts an inclusive range of status codes.
    pub fn from_range_inclusive(range: RangeInclusive<StatusCode>) -> Self {
        let (start, end) = range.into_inner();
        Self {
            ranges: vec![StatusCodeRange::Inclusive(start.as_u16()..=end.as_u16())],
        }
    }

    /// Accepts an exclusive range of status codes.
    pub fn from_range(range: Range<StatusCode>) -> Self {
        Self {
            ranges: vec![StatusCodeRange::Exclusive(
                range.start.as_u16()..range.end.as_u16(),
            )],
        }
    }

    /// Also accepts the given status code.
    pub fn add_status(mut self, status: StatusCode) -> Self {
        self.ranges.push(StatusCodeRange::Single(status.as_u16()));
        self
    }

    /// Also accepts an inclusive range of status codes.
    pub fn add_range_inclusive(mut self, range: RangeInclusive<StatusCode>) -> Self {
        let (start, end) = range.into_inner();
        self.ranges
            .push(StatusCodeRange::Inclusive(start.as_u16()..=end.as_u16()));
        self
    }

    /// Checks if a status code is accepted.
    pub fn contains(&self, status: StatusCode) -> bool {
        let status = status.as_u16();
        self.ranges.iter().any(|range| match range {
            StatusCodeRange::Single(single) => *single == status,
            StatusCodeRange::Inclusive(range) => range.contains(&status),
            StatusCodeRange::Exclusive(range) => range.contains(&status),
        })
    }
}

impl Default for ExpectedStatusCodes {
    fn default() -> Self {
        Self {
            ranges: vec![StatusCodeRange::Exclusive(200..300)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_success_only() {
        let codes = ExpectedStatusCodes::default();

        assert!(codes.contains(StatusCode::OK));
        assert!(codes.contains(StatusCode::CREATED));
        assert!(codes.contains(StatusCode::NO_CONTENT));
        assert!(!codes.contains(StatusCode::MULTIPLE_CHOICES));
        assert!(!codes.contains(StatusCode::NOT_FOUND));
        assert!(!codes.contains(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[test]
    fn test_only() {
        let codes = ExpectedStatusCodes::only(StatusCode::CREATED);

        assert!(codes.contains(StatusCode::CREATED));
        assert!(!codes.contains(StatusCode::OK));
    }

    #[test]
    fn test_ranges() {
        let inclusive =
            ExpectedStatusCodes::from_range_inclusive(StatusCode::OK..=StatusCode::NO_CONTENT);
        assert!(inclusive.contains(StatusCode::NO_CONTENT));
        assert!(!inclusive.contains(StatusCode::RESET_CONTENT));

        let exclusive = ExpectedStatusCodes::from_range(StatusCode::OK..StatusCode::NO_CONTENT);
        assert!(exclusive.contains(StatusCode::ACCEPTED));
        assert!(!exclusive.contains(StatusCode::NO_CONTENT));
    }

    #[test]
    fn test_add_to_default() {
        let codes = ExpectedStatusCodes::default()
            .add_status(StatusCode::NOT_FOUND)
            .add_range_inclusive(StatusCode::MULTIPLE_CHOICES..=StatusCode::NOT_MODIFIED);

        assert!(codes.contains(StatusCode::OK));
        assert!(codes.contains(StatusCode::NOT_FOUND));
        assert!(codes.contains(StatusCode::NOT_MODIFIED));
        assert!(!codes.contains(StatusCode::CONFLICT));
    }
}
