/// Errors raised while building rule sets or redacting a payload.
///
/// Rules that point at absent fields are *not* errors: redaction is lenient by
/// default and only reports them when [`RedactOptions::strict`](super::RedactOptions::strict)
/// is set.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum RedactionError {
    /// A field path was declared without any segment.
    #[display("Invalid field path: a path needs at least one segment")]
    EmptyPath,

    /// A field path contains an empty segment (e.g. `"source..name"`).
    #[display("Invalid field path '{path}': segment #{index} is empty")]
    EmptySegment {
        /// The offending path, as declared.
        path: String,
        /// Zero-based position of the empty segment.
        index: usize,
    },

    /// A JSON Pointer could not be turned into a field path.
    #[display("Invalid JSON Pointer '{pointer}': {message}")]
    InvalidPointer {
        /// The pointer, as declared.
        pointer: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// The payload cannot be represented as a payload tree.
    ///
    /// Raised at the encoding boundary: the value could not be encoded, or its
    /// nesting exceeds [`MAX_DEPTH`](super::MAX_DEPTH).
    #[display("Invalid payload: {message}")]
    InvalidPayload {
        /// Description of the problem.
        message: String,
    },

    /// In strict mode, a rule did not resolve to an existing field.
    #[display("Field path '{path}' does not resolve against the payload")]
    UnresolvedPath {
        /// The rule, in dotted notation.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<RedactionError>();
        assert_sync::<RedactionError>();
    }

    #[test]
    fn test_redaction_error_display() {
        let error = RedactionError::EmptySegment {
            path: "source..name".to_string(),
            index: 1,
        };
        assert_eq!(
            error.to_string(),
            "Invalid field path 'source..name': segment #1 is empty"
        );

        let error = RedactionError::UnresolvedPath {
            path: "c8y_IsBinary.length".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Field path 'c8y_IsBinary.length' does not resolve against the payload"
        );
    }
}
