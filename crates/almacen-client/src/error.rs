//! Client error types.

use thiserror::Error;

/// Errors surfaced by the API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not complete the call (network, timeout).
    #[error("Error de transporte: {0}")]
    Transport(String),

    /// The server answered with a failure envelope.
    #[error("Error del servidor ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response did not match the expected shape.
    #[error("Respuesta inesperada: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
