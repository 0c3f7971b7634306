use thiserror::Error;

/// Errors surfaced by the sketch core, per the taxonomy a host is expected
/// to map onto its own error channel.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HllError {
    /// A parameter (or a packed descriptor/header encoding one) was out of
    /// range or malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A wire frame or in-memory state was internally inconsistent: unknown
    /// version, bad padding, a size that doesn't match its header, an
    /// oversize body, a non-ascending Explicit list, an in-memory Sparse
    /// claim, mismatched Dense lengths in a union, or mismatched parameters
    /// in a union.
    #[error("data error: {0}")]
    Data(String),
}
