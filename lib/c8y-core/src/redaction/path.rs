//! Field paths: chains of object keys naming a field inside a payload.

use std::fmt;
use std::str::FromStr;

use jsonptr::Pointer;

use super::RedactionError;

/// A non-empty chain of object keys, e.g. `c8y_IsBinary.length`.
///
/// Field paths never address array elements: a segment is always looked up as
/// an object key, even when it looks like a number.
///
/// # Examples
///
/// ```rust
/// use c8y_core::FieldPath;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dotted = FieldPath::parse("source.self")?;
/// let pointer = FieldPath::from_pointer("/source/self")?;
/// let segments = FieldPath::new(["source", "self"])?;
///
/// assert_eq!(dotted, pointer);
/// assert_eq!(dotted, segments);
/// assert_eq!(dotted.to_string(), "source.self");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Builds a path from its segments.
    ///
    /// Use this form when a key itself contains a `.`.
    ///
    /// # Errors
    ///
    /// Returns [`RedactionError::EmptyPath`] without segments, and
    /// [`RedactionError::EmptySegment`] if any segment is empty.
    pub fn new<I, S>(segments: I) -> Result<Self, RedactionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments.into_iter().map(Into::into).collect::<Vec<String>>();
        if segments.is_empty() {
            return Err(RedactionError::EmptyPath);
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(RedactionError::EmptySegment {
                path: segments.join("."),
                index,
            });
        }
        Ok(Self { segments })
    }

    /// Parses a dotted path such as `source.name`.
    ///
    /// # Errors
    ///
    /// Returns [`RedactionError::EmptyPath`] for an empty string and
    /// [`RedactionError::EmptySegment`] for paths like `a..b` or `.a`.
    pub fn parse(dotted: &str) -> Result<Self, RedactionError> {
        if dotted.is_empty() {
            return Err(RedactionError::EmptyPath);
        }
        Self::new(dotted.split('.'))
    }

    /// Converts a JSON Pointer (RFC 6901) such as `/source/name` into a field path.
    ///
    /// Escaped tokens (`~0`, `~1`) are decoded, so `/a~1b` names the key `a/b`.
    ///
    /// # Errors
    ///
    /// Returns [`RedactionError::InvalidPointer`] if the pointer is malformed,
    /// and [`RedactionError::EmptyPath`] for the root pointer.
    pub fn from_pointer(pointer: &str) -> Result<Self, RedactionError> {
        let ptr = Pointer::parse(pointer).map_err(|err| RedactionError::InvalidPointer {
            pointer: pointer.to_string(),
            message: err.to_string(),
        })?;

        Self::new(ptr.tokens().map(|token| token.decoded().into_owned()))
    }

    /// The key segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`: a field path has at least one segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Splits the path into the parent chain and the terminal key.
    pub fn split_terminal(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((terminal, parents)) => (parents, terminal),
            None => (&[], ""),
        }
    }

    /// Returns `true` if `self` is a strict prefix of `other`.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.len() < other.len() && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = RedactionError;

    fn from_str(dotted: &str) -> Result<Self, Self::Err> {
        Self::parse(dotted)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = RedactionError;

    fn try_from(dotted: &str) -> Result<Self, Self::Error> {
        Self::parse(dotted)
    }
}
