//! Transport task for one game connection, using tokio-tungstenite

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::infrastructure::messaging::{ConnectionStateCell, SignalDispatcher};
use crate::ports::outbound::{ConnectionSignal, ConnectionState};

/// Drive one WebSocket connection from handshake to close.
///
/// Emits `Opened` once the handshake completes, one `Message` per text frame,
/// and exactly one of `Closed`/`Errored` when the server or the network ends
/// the connection. A close requested through `close_rx` (or by dropping the
/// handle that owns its sender) ends the task without emitting anything.
pub(super) async fn run_connection(
    url: Url,
    state: ConnectionStateCell,
    signals: SignalDispatcher,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let connected = tokio::select! {
        result = connect_async(url.as_str()) => result,
        _ = &mut close_rx => {
            tracing::debug!(%url, "Connection closed before handshake completed");
            state.set(ConnectionState::Closed);
            return;
        }
    };

    let ws_stream = match connected {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            tracing::error!(%url, error = %e, "Failed to connect to game server");
            state.set(ConnectionState::Closed);
            signals.emit(ConnectionSignal::Errored(e.to_string()));
            return;
        }
    };

    tracing::info!(%url, "Connected to game server");
    state.set(ConnectionState::Open);
    signals.emit(ConnectionSignal::Opened);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    signals.emit(ConnectionSignal::Message(text));
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::warn!(bytes = data.len(), "Ignoring binary frame from server");
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "Server closed connection");
                    state.set(ConnectionState::Closed);
                    signals.emit(ConnectionSignal::Closed);
                    break;
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "WebSocket error");
                    state.set(ConnectionState::Closed);
                    signals.emit(ConnectionSignal::Errored(e.to_string()));
                    break;
                }
                None => {
                    tracing::info!("Connection stream ended");
                    state.set(ConnectionState::Closed);
                    signals.emit(ConnectionSignal::Closed);
                    break;
                }
            },

            Some(json) = outgoing.recv() => {
                if let Err(e) = write.send(Message::Text(json)).await {
                    tracing::error!(error = %e, "Failed to send message");
                    state.set(ConnectionState::Closed);
                    signals.emit(ConnectionSignal::Errored(e.to_string()));
                    break;
                }
            }

            _ = &mut close_rx => {
                tracing::info!("Disconnect requested");
                state.set(ConnectionState::Closing);
                if let Err(e) = write.close().await {
                    tracing::debug!(error = %e, "Close handshake did not complete");
                }
                state.set(ConnectionState::Closed);
                break;
            }
        }
    }
}
