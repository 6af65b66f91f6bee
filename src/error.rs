// IMPORTANT: None of these errors escape the public classification operations.
// They exist so that probing and extraction can be reported at trace level at
// the site where they happen, and then converted to "unknown".

/// Failure to resolve a provider type or one of its members while probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No provider type is registered under the candidate identifier.
    TypeNotFound,
    /// The type resolved, but it does not expose the requested accessor.
    MethodNotFound,
    /// The type resolved, but it does not expose the requested constant.
    ConstantNotFound,
}

/// Failure of a bound accessor to produce a numeric code from a cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The cause is not an instance of the type the accessor was bound to.
    TypeMismatch,
    /// The provider error carries no code in its current state.
    CodeUnavailable,
    /// The provider code does not fit the signed 32 bit code space.
    CodeOutOfRange,
}
