//! Per-connection WebSocket loop.
//!
//! One task per peer: read a frame, decode, dispatch, reply. Frames
//! that fail to decode get a `bad_request` error frame back and the
//! connection stays open; transport failures end the task.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use turnwise_protocol::{ErrorKind, Request, Response};

use crate::error::ServerError;
use crate::service::GameService;

pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    service: Arc<GameService>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(ServerError::Handshake)?;
    tracing::debug!(%peer, "connection accepted");

    let (mut sink, mut stream) = ws.split();

    while let Some(frame) = stream.next().await {
        let data: Vec<u8> = match frame {
            Ok(Message::Binary(data)) => data.into(),
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Close(_)) => break,
            // Ping and pong are answered by tungstenite itself.
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(%peer, error = %e, "receive failed");
                break;
            }
        };

        let response = match Request::from_slice(&data) {
            Ok(request) => service.handle(request).await,
            Err(e) => {
                tracing::debug!(%peer, error = %e, "undecodable frame");
                Response::Error {
                    kind: ErrorKind::BadRequest,
                    message: e.to_string(),
                }
            }
        };

        let bytes = response.to_vec()?;
        if sink.send(Message::Binary(bytes.into())).await.is_err() {
            // Peer went away between the request and the reply.
            break;
        }
    }

    tracing::debug!(%peer, "connection closed");
    Ok(())
}
