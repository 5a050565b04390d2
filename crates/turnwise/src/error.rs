use thiserror::Error;
use turnwise_protocol::ProtocolError;

/// Errors that can take down a listener or a single connection.
///
/// Failures scoped to one request never surface here. Those are turned
/// into [`Response::Error`](turnwise_protocol::Response) frames by the
/// service and the connection keeps going.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
