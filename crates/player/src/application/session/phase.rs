use std::fmt;

/// Stage of a session's lifecycle. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No connection attempted yet
    Idle,
    /// Connection requested, waiting for the transport to open
    Connecting,
    /// Connected, the server has not started the game yet
    WaitingForOpponent,
    /// Game running, no move sent for this round
    AwaitingMove,
    /// Move sent, waiting for the round result
    MovePending,
    /// Round result received; left immediately for `AwaitingMove`
    RoundResolved,
    /// Server declared a winner; no more moves
    GameOver,
    /// Connection closed or failed
    Disconnected,
}

impl SessionPhase {
    /// No more moves can be played in this session.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::GameOver | SessionPhase::Disconnected)
    }

    /// Phases in which server messages are interpreted.
    pub fn accepts_messages(self) -> bool {
        matches!(
            self,
            SessionPhase::WaitingForOpponent
                | SessionPhase::AwaitingMove
                | SessionPhase::MovePending
                | SessionPhase::RoundResolved
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Connecting => "connecting",
            SessionPhase::WaitingForOpponent => "waiting_for_opponent",
            SessionPhase::AwaitingMove => "awaiting_move",
            SessionPhase::MovePending => "move_pending",
            SessionPhase::RoundResolved => "round_resolved",
            SessionPhase::GameOver => "game_over",
            SessionPhase::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
