use thiserror::Error;

/// Errors returned by frame decoding.
///
/// `decode` never surfaces these directly: `Truncated` and `InvalidShape`
/// become `Frame::Invalid`, `UnknownKind` becomes `Frame::Unknown`.
///
/// # Examples
/// ```
/// use dmdview_core::protocol::DecodeError;
///
/// let err = DecodeError::Truncated { needed: 4, actual: 3 };
/// assert!(err.to_string().contains("payload too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("invalid {field}: {value}")]
    InvalidShape { field: &'static str, value: i64 },
    #[error("unknown frame type: {tag:?}")]
    UnknownKind { tag: String },
}
