//! WebSocket connector - opens one game connection per room code.
//!
//! `WebSocketConnector::open` validates the room code, spawns the transport
//! task on the runtime and hands back a `WebSocketConnection`:
//! - `send` queues a serialized message for the transport task
//! - `close` asks the task to finish the close handshake
//! - `state` reads the state the task publishes

use std::sync::Mutex;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use roshambo_shared::{ClientMessage, RoomCode};

use crate::config::ClientConfig;
use crate::infrastructure::messaging::{ConnectionStateCell, SignalDispatcher};
use crate::ports::outbound::{
    ConnectionError, ConnectionState, GameConnection, GameConnector, SignalCallback,
};

use super::client::run_connection;

/// Opens tokio-tungstenite connections to `<server_url>/<room_code>`.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    server_url: Url,
    runtime: Handle,
}

impl WebSocketConnector {
    pub fn new(config: &ClientConfig, runtime: Handle) -> Self {
        Self {
            server_url: config.server_url.clone(),
            runtime,
        }
    }

    /// Address of a room: the server URL with the room code appended as one path segment.
    pub fn room_url(&self, room_code: &RoomCode) -> Result<Url, ConnectionError> {
        let mut url = self.server_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| ConnectionError::InvalidServerUrl {
                        url: self.server_url.to_string(),
                    })?;
            segments.pop_if_empty().push(room_code.as_str());
        }
        Ok(url)
    }
}

impl GameConnector for WebSocketConnector {
    fn open(
        &self,
        room_code: &str,
        on_signal: SignalCallback,
    ) -> Result<Box<dyn GameConnection>, ConnectionError> {
        let room_code = RoomCode::parse(room_code)?;
        let url = self.room_url(&room_code)?;

        let state = ConnectionStateCell::new(ConnectionState::Connecting);
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (close_tx, close_rx) = oneshot::channel::<()>();

        tracing::info!(room_code = %room_code, %url, "Opening game connection");
        self.runtime.spawn(run_connection(
            url,
            state.clone(),
            SignalDispatcher::new(on_signal),
            outgoing_rx,
            close_rx,
        ));

        Ok(Box::new(WebSocketConnection {
            room_code,
            state,
            outgoing: outgoing_tx,
            close_tx: Mutex::new(Some(close_tx)),
        }))
    }
}

/// Handle to one game connection.
///
/// Dropping the handle closes the connection, same as calling `close`.
pub struct WebSocketConnection {
    room_code: RoomCode,
    state: ConnectionStateCell,
    outgoing: mpsc::UnboundedSender<String>,
    /// Close request (consumed on first close)
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl GameConnection for WebSocketConnection {
    fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    fn state(&self) -> ConnectionState {
        self.state.get()
    }

    fn send(&self, message: &ClientMessage) -> Result<(), ConnectionError> {
        if !self.state.is_open() {
            return Err(ConnectionError::NotOpen);
        }

        let json = serde_json::to_string(message)?;
        self.outgoing
            .send(json)
            .map_err(|_| ConnectionError::NotOpen)
    }

    fn close(&self) {
        let close_tx = match self.close_tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(tx) = close_tx {
            if self.state.get() != ConnectionState::Closed {
                self.state.set(ConnectionState::Closing);
            }
            // The task may already be gone if the server closed first
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
    use tokio_tungstenite::tungstenite::Message;

    use roshambo_shared::Move;

    use super::*;
    use crate::ports::outbound::ConnectionSignal;

    const WAIT: Duration = Duration::from_secs(5);

    fn connector_for(addr: std::net::SocketAddr) -> WebSocketConnector {
        let config = ClientConfig::new(&format!("ws://{addr}/ws")).expect("config");
        WebSocketConnector::new(&config, Handle::current())
    }

    fn signal_channel() -> (SignalCallback, UnboundedReceiver<ConnectionSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let callback: SignalCallback = Box::new(move |signal| {
            let _ = tx.send(signal);
        });
        (callback, rx)
    }

    async fn next_signal(rx: &mut UnboundedReceiver<ConnectionSignal>) -> ConnectionSignal {
        timeout(WAIT, rx.recv())
            .await
            .expect("signal in time")
            .expect("signal channel open")
    }

    #[test]
    fn room_url_appends_code_as_path_segment() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let config = ClientConfig::new("ws://localhost:8000/ws").expect("config");
        let connector = WebSocketConnector::new(&config, runtime.handle().clone());

        let code = RoomCode::parse("1234").expect("code");
        let url = connector.room_url(&code).expect("url");
        assert_eq!(url.as_str(), "ws://localhost:8000/ws/1234");

        let code = RoomCode::parse("a/b?").expect("code");
        let url = connector.room_url(&code).expect("url");
        assert_eq!(url.as_str(), "ws://localhost:8000/ws/a%2Fb%3F");
    }

    #[test]
    fn room_url_handles_trailing_slash() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let config = ClientConfig::new("wss://games.example.com/ws/").expect("config");
        let connector = WebSocketConnector::new(&config, runtime.handle().clone());

        let code = RoomCode::parse("ABCD").expect("code");
        let url = connector.room_url(&code).expect("url");
        assert_eq!(url.as_str(), "wss://games.example.com/ws/ABCD");
    }

    #[tokio::test]
    async fn invalid_room_code_never_starts_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let connector = connector_for(listener.local_addr().expect("addr"));

        for bad in ["", "123", "12345"] {
            let (callback, mut rx) = signal_channel();
            let result = connector.open(bad, callback);
            assert!(matches!(result, Err(ConnectionError::InvalidRoomCode(_))));
            // Callback was dropped with the failed attempt, nothing was delivered
            assert!(rx.recv().await.is_none());
        }

        let accepted = timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "no TCP connection should have been made");
    }

    #[tokio::test]
    async fn full_exchange_with_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (path_tx, path_rx) = oneshot::channel::<String>();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                let _ = path_tx.send(req.uri().path().to_string());
                Ok(resp)
            };
            let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
                .await
                .expect("handshake");

            ws.send(Message::Text(
                r#"{"action":"game_started","player_id":"0"}"#.to_string(),
            ))
            .await
            .expect("send game_started");

            let received = match ws.next().await {
                Some(Ok(Message::Text(text))) => text,
                other => panic!("expected move text frame, got {other:?}"),
            };

            ws.send(Message::Text(
                r#"{"action":"result","winner":0,"opponent_move":"s","scores":{"0":1,"1":0}}"#
                    .to_string(),
            ))
            .await
            .expect("send result");
            ws.close(None).await.expect("close");

            received
        });

        let connector = connector_for(addr);
        let (callback, mut rx) = signal_channel();
        let connection = connector.open("1234", callback).expect("open");
        assert_eq!(connection.room_code().as_str(), "1234");

        assert_eq!(next_signal(&mut rx).await, ConnectionSignal::Opened);
        assert!(connection.is_open());
        assert_eq!(path_rx.await.expect("path"), "/ws/1234");

        let started = next_signal(&mut rx).await;
        assert!(matches!(started, ConnectionSignal::Message(ref t) if t.contains("game_started")));

        connection
            .send(&ClientMessage::Move { choice: Move::Rock })
            .expect("send move");

        let result = next_signal(&mut rx).await;
        assert!(matches!(result, ConnectionSignal::Message(ref t) if t.contains("\"result\"")));

        assert_eq!(next_signal(&mut rx).await, ConnectionSignal::Closed);
        assert_eq!(connection.state(), ConnectionState::Closed);
        assert!(matches!(
            connection.send(&ClientMessage::Move { choice: Move::Paper }),
            Err(ConnectionError::NotOpen)
        ));

        let sent = server.await.expect("server task");
        let sent: serde_json::Value = serde_json::from_str(&sent).expect("json");
        assert_eq!(sent, serde_json::json!({"action": "move", "move": "rock"}));
    }

    #[tokio::test]
    async fn refused_connection_reports_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let connector = connector_for(addr);
        let (callback, mut rx) = signal_channel();
        let connection = connector.open("1234", callback).expect("open");

        assert!(matches!(
            next_signal(&mut rx).await,
            ConnectionSignal::Errored(_)
        ));
        assert_eq!(connection.state(), ConnectionState::Closed);
        // Only one terminal signal, then the task drops the callback
        assert!(timeout(WAIT, rx.recv()).await.expect("in time").is_none());
    }

    #[tokio::test]
    async fn send_before_open_is_not_transmitted() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let connector = connector_for(listener.local_addr().expect("addr"));
        let (callback, _rx) = signal_channel();

        let connection = connector.open("1234", callback).expect("open");
        assert_eq!(connection.state(), ConnectionState::Connecting);
        assert!(matches!(
            connection.send(&ClientMessage::Move { choice: Move::Rock }),
            Err(ConnectionError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn local_close_is_idempotent_and_silent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream)
                .await
                .expect("handshake");
            // Drain until the client's close arrives
            while let Some(Ok(frame)) = ws.next().await {
                if frame.is_close() {
                    break;
                }
            }
        });

        let connector = connector_for(addr);
        let (callback, mut rx) = signal_channel();
        let connection = connector.open("9999", callback).expect("open");
        assert_eq!(next_signal(&mut rx).await, ConnectionSignal::Opened);

        connection.close();
        connection.close();
        assert_ne!(connection.state(), ConnectionState::Open);

        // No closed/errored signal for a close we asked for
        assert!(timeout(WAIT, rx.recv()).await.expect("in time").is_none());
        assert_eq!(connection.state(), ConnectionState::Closed);

        timeout(WAIT, server)
            .await
            .expect("server finished")
            .expect("server task");
    }
}
