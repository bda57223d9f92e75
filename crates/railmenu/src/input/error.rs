//! Error types for keyboard input.

/// Error parsing a persistent key descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// The descriptor has fewer than the five mandatory fields.
    #[error("key descriptor {descriptor:?} has {found} fields, expected at least 5")]
    TooFewFields {
        /// The rejected descriptor.
        descriptor: String,
        /// Number of comma-separated fields found.
        found: usize,
    },

    /// A numeric field is not a valid number.
    #[error("invalid {field} {value:?} in key descriptor")]
    InvalidNumber {
        /// Which field was invalid.
        field: &'static str,
        /// The field's text.
        value: String,
    },
}

/// Error acquiring the keyboard input hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    /// Another capture session holds the hook.
    #[error("keyboard input is already hooked by another capture session")]
    AlreadyHooked,
}

/// Result type for descriptor parsing.
pub type DescriptorResult<T> = Result<T, DescriptorError>;
