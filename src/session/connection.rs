//! Engine session: one WebSocket connection, sequential calls.
//!
//! The session owns the stream and the correlation-id generator. Calls are
//! issued strictly sequentially: one write, then reads until the frame with
//! the matching id arrives. Frames for other ids and unsolicited engine
//! notifications are skipped, so out-of-order delivery is tolerated even
//! though this client never has more than one call in flight.
//!
//! No retry and no response timeout: an unresponsive engine stalls the run.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::{from_str, to_string};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::{Handle, IdGenerator, RequestId};
use crate::protocol::{EngineCommand, Request, Response, ServerMessage};

// ============================================================================
// Types
// ============================================================================

/// The stream type produced by [`EngineSession::connect`].
pub type WsTransport = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// EngineSession
// ============================================================================

/// A request/response session against the engine's JSON-RPC endpoint.
///
/// Generic over the message stream so tests can drive it with an in-memory
/// duplex WebSocket; production code uses [`EngineSession::connect`].
pub struct EngineSession<S = WsTransport> {
    /// The WebSocket stream, held for the lifetime of the run.
    stream: S,
    /// Session-scoped correlation-id source.
    ids: IdGenerator,
}

impl EngineSession<WsTransport> {
    /// Connects to the engine endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the WebSocket handshake fails.
    pub async fn connect(endpoint: &Url) -> Result<Self> {
        let (stream, _) = connect_async(endpoint.as_str())
            .await
            .map_err(|e| Error::connection(e.to_string()))?;

        debug!(endpoint = %endpoint, "Connected to engine");

        Ok(Self::from_stream(stream))
    }
}

impl<S> EngineSession<S>
where
    S: Stream<Item = StdResult<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
{
    /// Wraps an already-established message stream.
    #[must_use]
    pub fn from_stream(stream: S) -> Self {
        Self {
            stream,
            ids: IdGenerator::new(),
        }
    }

    /// Returns a fresh correlation id.
    ///
    /// Ids are monotonically increasing and scoped to the session.
    #[inline]
    pub fn next_id(&mut self) -> RequestId {
        self.ids.next_id()
    }

    /// Builds a request with a fresh id and calls it.
    pub async fn invoke(&mut self, handle: Handle, command: EngineCommand) -> Result<Response> {
        let request = Request::new(self.ids.next_id(), handle, command);
        self.call(request).await
    }

    /// Sends one request and returns the correlated response.
    ///
    /// Exactly one write; reads until the matching id arrives. A response
    /// carrying an engine error payload is returned normally for the caller
    /// to inspect.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] / [`Error::WebSocket`] if the stream
    ///   closes or errors before the matching response arrives
    /// - [`Error::Protocol`] if an incoming text frame is not decodable as
    ///   a response or notification
    pub async fn call(&mut self, request: Request) -> Result<Response> {
        let json = to_string(&request)?;

        trace!(id = %request.id, method = request.method(), "Sending request");
        self.stream.send(Message::Text(json.into())).await?;

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    match from_str::<ServerMessage>(text.as_str()) {
                        Ok(ServerMessage::Response(response)) if response.id == request.id => {
                            trace!(id = %response.id, "Response received");
                            return Ok(response);
                        }

                        Ok(ServerMessage::Response(response)) => {
                            warn!(
                                id = %response.id,
                                awaited = %request.id,
                                "Skipping response for another request"
                            );
                        }

                        Ok(ServerMessage::Notification(notification)) => {
                            trace!(method = %notification.method, "Skipping engine notification");
                        }

                        Err(e) => {
                            return Err(Error::protocol(format!(
                                "undecodable engine frame: {e}"
                            )));
                        }
                    }
                }

                Some(Ok(Message::Close(_))) => {
                    debug!("WebSocket closed by engine");
                    return Err(Error::ConnectionClosed);
                }

                // Ignore Binary, Ping, Pong, Frame
                Some(Ok(_)) => {}

                Some(Err(e)) => return Err(Error::WebSocket(e)),

                None => return Err(Error::ConnectionClosed),
            }
        }
    }

    /// Closes the session gracefully.
    pub async fn close(&mut self) -> Result<()> {
        self.stream.close().await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
