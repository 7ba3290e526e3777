use roshambo_shared::{ClientMessage, Move, PlayerId, RoomCode, ScoreBoard, ServerMessage};

use crate::infrastructure::message_translator;
use crate::ports::outbound::{ConnectionSignal, RenderInstruction};

use super::outcome::{GameOutcome, RoundOutcome, RoundSummary};
use super::phase::SessionPhase;

const INVALID_CODE_TEXT: &str = "Please enter a valid 4-digit game code.";
const CONNECTING_TEXT: &str = "Waiting for another player...";
const CONNECTED_TEXT: &str = "Connected to game room.";
const GAME_STARTED_TEXT: &str = "Game has started! Please make your move.";
const WAITING_FOR_OPPONENT_MOVE_TEXT: &str = "Waiting for opponent's move...";
const DISCONNECTED_TEXT: &str = "Disconnected from game room.";
const CONNECTION_ERROR_TEXT: &str = "Error connecting to the game room.";

/// Input to the state machine, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// User typed a room code
    RoomCodeSubmitted(String),
    /// User picked a move; `connection_open` is the transport state at that moment
    MoveSelected { choice: Move, connection_open: bool },
    /// Lifecycle signal from the session's connection
    Connection(ConnectionSignal),
}

/// Work the controller must carry out, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Open the connection for this room
    Open(RoomCode),
    /// Transmit a message on the open connection
    Send(ClientMessage),
    /// Release the connection
    Close,
    /// Redraw the presentation with this snapshot
    Render(RenderInstruction),
}

/// State of one game attempt.
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    room_code: Option<RoomCode>,
    player_id: Option<PlayerId>,
    pending_move: Option<Move>,
    scores: Option<ScoreBoard>,
    last_round: Option<RoundSummary>,
    final_outcome: Option<GameOutcome>,
    view: RenderInstruction,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            room_code: None,
            player_id: None,
            pending_move: None,
            scores: None,
            last_round: None,
            final_outcome: None,
            view: RenderInstruction::setup(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn room_code(&self) -> Option<&RoomCode> {
        self.room_code.as_ref()
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    /// Move sent this round and not yet resolved.
    pub fn pending_move(&self) -> Option<Move> {
        self.pending_move
    }

    /// Last score board the server sent.
    pub fn scores(&self) -> Option<&ScoreBoard> {
        self.scores.as_ref()
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn final_outcome(&self) -> Option<GameOutcome> {
        self.final_outcome
    }

    /// What the presentation layer should currently show.
    pub fn view(&self) -> &RenderInstruction {
        &self.view
    }

    /// Apply one event and return the effects it causes.
    ///
    /// Events that are not valid in the current phase change nothing and
    /// return no effects.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        match event {
            SessionEvent::RoomCodeSubmitted(raw) => self.on_room_code(&raw),
            SessionEvent::MoveSelected {
                choice,
                connection_open,
            } => self.on_move_selected(choice, connection_open),
            SessionEvent::Connection(ConnectionSignal::Opened) => self.on_opened(),
            SessionEvent::Connection(ConnectionSignal::Message(payload)) => {
                self.on_payload(&payload)
            }
            SessionEvent::Connection(ConnectionSignal::Closed) => {
                self.on_disconnect(DISCONNECTED_TEXT)
            }
            SessionEvent::Connection(ConnectionSignal::Errored(detail)) => {
                tracing::debug!(%detail, "Connection error reported to session");
                self.on_disconnect(CONNECTION_ERROR_TEXT)
            }
        }
    }

    fn enter(&mut self, next: SessionPhase) {
        tracing::debug!(from = %self.phase, to = %next, "Session phase transition");
        self.phase = next;
    }

    fn render(&self) -> SessionEffect {
        SessionEffect::Render(self.view.clone())
    }

    fn on_room_code(&mut self, raw: &str) -> Vec<SessionEffect> {
        if self.phase != SessionPhase::Idle {
            tracing::debug!(phase = %self.phase, "Ignoring room code outside idle phase");
            return Vec::new();
        }

        match RoomCode::parse(raw) {
            Ok(room_code) => {
                tracing::info!(room_code = %room_code, "Joining game room");
                self.view.status_text = CONNECTING_TEXT.to_string();
                self.room_code = Some(room_code.clone());
                self.enter(SessionPhase::Connecting);
                vec![self.render(), SessionEffect::Open(room_code)]
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected room code");
                self.view.status_text = INVALID_CODE_TEXT.to_string();
                vec![self.render()]
            }
        }
    }

    fn on_opened(&mut self) -> Vec<SessionEffect> {
        if self.phase != SessionPhase::Connecting {
            tracing::debug!(phase = %self.phase, "Ignoring opened signal");
            return Vec::new();
        }

        self.view.status_text = CONNECTED_TEXT.to_string();
        self.view.show_setup_panel = false;
        self.view.show_play_panel = true;
        self.view.room_label = self
            .room_code
            .as_ref()
            .map(|code| format!("Game Code: {code}"));
        self.enter(SessionPhase::WaitingForOpponent);
        vec![self.render()]
    }

    fn on_move_selected(&mut self, choice: Move, connection_open: bool) -> Vec<SessionEffect> {
        if self.phase != SessionPhase::AwaitingMove {
            tracing::debug!(phase = %self.phase, %choice, "Ignoring move outside awaiting-move phase");
            return Vec::new();
        }
        if !connection_open {
            tracing::debug!(%choice, "Ignoring move, connection is not open");
            return Vec::new();
        }

        self.pending_move = Some(choice);
        self.view.round_result_text = Some(WAITING_FOR_OPPONENT_MOVE_TEXT.to_string());
        self.enter(SessionPhase::MovePending);
        vec![
            SessionEffect::Send(ClientMessage::Move { choice }),
            self.render(),
        ]
    }

    fn on_payload(&mut self, payload: &str) -> Vec<SessionEffect> {
        if !self.phase.accepts_messages() {
            tracing::debug!(phase = %self.phase, "Ignoring server message");
            return Vec::new();
        }

        let message = match message_translator::translate(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, phase = %self.phase, "Ignoring malformed server message");
                return Vec::new();
            }
        };

        tracing::debug!(action = message.action(), phase = %self.phase, "Server message");
        match message {
            ServerMessage::GameStarted { player_id } => self.on_game_started(player_id),
            ServerMessage::RoundResult {
                winner,
                opponent_move,
                scores,
            } => self.on_round_result(winner, opponent_move, scores),
            ServerMessage::GameOver { winner } => self.on_game_over(winner),
            ServerMessage::Unknown => Vec::new(),
        }
    }

    fn on_game_started(&mut self, player_id: PlayerId) -> Vec<SessionEffect> {
        if let Some(existing) = self.player_id {
            if existing == player_id {
                tracing::debug!(%player_id, "Ignoring repeated game_started");
            } else {
                tracing::warn!(
                    %existing,
                    received = %player_id,
                    "Ignoring game_started that would reassign player id"
                );
            }
            return Vec::new();
        }

        tracing::info!(%player_id, "Game started");
        self.player_id = Some(player_id);
        self.pending_move = None;
        self.view.status_text = GAME_STARTED_TEXT.to_string();
        self.view.show_move_buttons = true;
        self.enter(SessionPhase::AwaitingMove);
        vec![self.render()]
    }

    fn on_round_result(
        &mut self,
        winner: Option<PlayerId>,
        opponent_move: Move,
        scores: Option<ScoreBoard>,
    ) -> Vec<SessionEffect> {
        let (SessionPhase::MovePending, Some(local_player), Some(my_move)) =
            (self.phase, self.player_id, self.pending_move)
        else {
            tracing::warn!(phase = %self.phase, "Ignoring result with no move pending");
            return Vec::new();
        };

        let outcome = RoundOutcome::classify(winner, local_player);
        if let Some(board) = &scores {
            self.scores = Some(board.clone());
        }

        let summary = RoundSummary {
            outcome,
            local_player,
            my_move,
            opponent_move,
            scores,
        };
        tracing::info!(?outcome, %my_move, %opponent_move, "Round resolved");

        self.view.round_result_text = Some(summary.text());
        self.last_round = Some(summary);
        self.enter(SessionPhase::RoundResolved);

        // No "next round" signal exists; input opens again straight away
        self.pending_move = None;
        self.enter(SessionPhase::AwaitingMove);
        vec![self.render()]
    }

    fn on_game_over(&mut self, winner: PlayerId) -> Vec<SessionEffect> {
        let Some(local_player) = self.player_id else {
            tracing::warn!(%winner, "Ignoring game_over before game_started");
            return Vec::new();
        };

        let outcome = GameOutcome::classify(winner, local_player);
        tracing::info!(?outcome, %winner, "Game over");

        self.final_outcome = Some(outcome);
        self.pending_move = None;
        self.view.game_result_text = Some(outcome.text().to_string());
        self.view.show_move_buttons = false;
        self.enter(SessionPhase::GameOver);
        vec![self.render()]
    }

    fn on_disconnect(&mut self, status: &str) -> Vec<SessionEffect> {
        if self.phase == SessionPhase::Disconnected {
            tracing::debug!("Ignoring signal after disconnect");
            return Vec::new();
        }

        tracing::info!(phase = %self.phase, "Session disconnected");
        if let Some(abandoned) = self.pending_move.take() {
            tracing::debug!(%abandoned, "Abandoning pending move");
        }
        self.view.status_text = status.to_string();
        self.view.show_setup_panel = true;
        self.view.show_play_panel = false;
        self.view.show_move_buttons = false;
        self.enter(SessionPhase::Disconnected);
        vec![SessionEffect::Close, self.render()]
    }
}
