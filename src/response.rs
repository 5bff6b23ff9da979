//! The JSON envelope shared by every API response.

use serde::Serialize;

/// A successful response body: `{ "success": true, "data": ..., "message": ... }`.
///
/// `data` is always present, even when it is `null` (e.g. fetching a savings
/// goal before one has been set). `message` is only included when there is
/// something worth telling the client.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request succeeded. Always `true` for this type.
    pub success: bool,
    /// The response payload.
    pub data: T,
    /// An optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap `data` in a success envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Wrap `data` in a success envelope with a message.
    pub fn with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_owned()),
        }
    }
}

/// A failure response body: `{ "success": false, "message": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    /// Whether the request succeeded. Always `false` for this type.
    pub success: bool,
    /// A human-readable description of what went wrong.
    pub message: String,
}

impl ApiFailure {
    /// Create a failure envelope with `message`.
    pub fn new(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}
