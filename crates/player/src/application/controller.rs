//! Session controller - drives a [`Session`] from user intents and
//! connection signals, and carries out the effects it returns.
//!
//! Everything arrives on one channel of [`SessionInput`], so user input and
//! transport signals are applied strictly one at a time. Signals are tagged
//! with the id of the connection that produced them; signals from a
//! connection that has since been replaced are dropped.

use tokio::sync::mpsc;

use roshambo_shared::{Move, RoomCode};

use crate::ports::outbound::{
    ConnectionError, ConnectionSignal, GameConnection, GameConnector, RenderPort, SignalCallback,
};

use super::session::{Session, SessionEffect, SessionEvent};

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    SubmitRoomCode(String),
    SelectMove(Move),
    Quit,
}

/// One item on the controller's input channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    User(UserIntent),
    Connection {
        connection_id: u64,
        signal: ConnectionSignal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

pub struct SessionController<C, R> {
    connector: C,
    renderer: R,
    inputs: mpsc::UnboundedSender<SessionInput>,
    session: Session,
    connection: Option<Box<dyn GameConnection>>,
    connection_id: u64,
}

impl<C: GameConnector, R: RenderPort> SessionController<C, R> {
    /// `inputs` is the sending half of the channel the caller feeds back into
    /// [`dispatch`](Self::dispatch).
    pub fn new(connector: C, renderer: R, inputs: mpsc::UnboundedSender<SessionInput>) -> Self {
        Self {
            connector,
            renderer,
            inputs,
            session: Session::new(),
            connection: None,
            connection_id: 0,
        }
    }

    /// Draw the initial view.
    pub fn start(&mut self) {
        self.renderer.render(self.session.view());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn connection_open(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| c.is_open())
    }

    pub fn dispatch(&mut self, input: SessionInput) -> ControlFlow {
        let event = match input {
            SessionInput::User(UserIntent::Quit) => {
                tracing::info!(phase = %self.session.phase(), "Quitting");
                self.release_connection();
                return ControlFlow::Quit;
            }
            SessionInput::User(UserIntent::SubmitRoomCode(code)) => {
                if self.session.phase().is_terminal() {
                    // Previous game is over; a new code starts a fresh session
                    tracing::debug!("Starting a new session");
                    self.release_connection();
                    self.session = Session::new();
                }
                SessionEvent::RoomCodeSubmitted(code)
            }
            SessionInput::User(UserIntent::SelectMove(choice)) => SessionEvent::MoveSelected {
                choice,
                connection_open: self.connection_open(),
            },
            SessionInput::Connection {
                connection_id,
                signal,
            } => {
                if connection_id != self.connection_id || self.connection.is_none() {
                    tracing::debug!(
                        connection_id,
                        current = self.connection_id,
                        "Dropping signal from stale connection"
                    );
                    return ControlFlow::Continue;
                }
                SessionEvent::Connection(signal)
            }
        };

        self.apply(event);
        ControlFlow::Continue
    }

    fn apply(&mut self, event: SessionEvent) {
        let mut pending = vec![event];
        while let Some(event) = pending.pop() {
            for effect in self.session.handle(event) {
                if let Some(followup) = self.execute(effect) {
                    pending.push(followup);
                }
            }
        }
    }

    /// Carry out one effect. A failed open comes back as an event for the session.
    fn execute(&mut self, effect: SessionEffect) -> Option<SessionEvent> {
        match effect {
            SessionEffect::Open(room_code) => self.open(room_code),
            SessionEffect::Send(message) => {
                let Some(connection) = self.connection.as_ref() else {
                    tracing::debug!(action = message.action(), "No connection to send on");
                    return None;
                };
                match connection.send(&message) {
                    Ok(()) => tracing::debug!(action = message.action(), "Sent message"),
                    Err(ConnectionError::NotOpen) => {
                        tracing::debug!(action = message.action(), "Connection not open, message dropped")
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to send message"),
                }
                None
            }
            SessionEffect::Close => {
                self.release_connection();
                None
            }
            SessionEffect::Render(instruction) => {
                self.renderer.render(&instruction);
                None
            }
        }
    }

    fn open(&mut self, room_code: RoomCode) -> Option<SessionEvent> {
        self.release_connection();
        self.connection_id += 1;
        let connection_id = self.connection_id;

        let inputs = self.inputs.clone();
        let callback: SignalCallback = Box::new(move |signal| {
            // Receiver gone means the controller is shutting down
            let _ = inputs.send(SessionInput::Connection {
                connection_id,
                signal,
            });
        });

        match self.connector.open(room_code.as_str(), callback) {
            Ok(connection) => {
                self.connection = Some(connection);
                None
            }
            Err(e) => {
                tracing::warn!(room_code = %room_code, error = %e, "Failed to open connection");
                Some(SessionEvent::Connection(ConnectionSignal::Errored(
                    e.to_string(),
                )))
            }
        }
    }

    fn release_connection(&mut self) {
        if let Some(connection) = self.connection.take() {
            tracing::debug!(room_code = %connection.room_code(), "Closing connection");
            connection.close();
        }
    }
}
