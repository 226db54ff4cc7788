//! Errors raised by the wire layer.

/// Errors that can arise when encoding or decoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Text was not valid JSON, or a frame failed to serialize.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("frame is not a JSON object")]
    NotAnObject,

    /// A price or quantity that has no fixed-point representation.
    #[error("{field} {value} cannot be sent as a fixed-point integer")]
    InvalidAmount { field: &'static str, value: f64 },
}
