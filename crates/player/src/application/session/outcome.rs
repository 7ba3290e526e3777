//! Win/lose/tie classification for rounds and games.
//!
//! The server decides who won; these helpers only translate its verdict into
//! the local player's point of view.

use roshambo_shared::{Move, PlayerId, ScoreBoard};

/// A round from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Win,
    Lose,
    Tie,
}

impl RoundOutcome {
    /// No winner is a tie; otherwise it is a win only if the winner is us.
    pub fn classify(winner: Option<PlayerId>, local: PlayerId) -> Self {
        match winner {
            None => RoundOutcome::Tie,
            Some(winner) if winner == local => RoundOutcome::Win,
            Some(_) => RoundOutcome::Lose,
        }
    }
}

/// A finished game from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Lose,
}

impl GameOutcome {
    pub fn classify(winner: PlayerId, local: PlayerId) -> Self {
        if winner == local {
            GameOutcome::Win
        } else {
            GameOutcome::Lose
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            GameOutcome::Win => "You win the game!",
            GameOutcome::Lose => "You lose the game!",
        }
    }
}

/// Everything known about the most recently resolved round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub outcome: RoundOutcome,
    pub local_player: PlayerId,
    pub my_move: Move,
    pub opponent_move: Move,
    /// Scores carried by the result message, if any
    pub scores: Option<ScoreBoard>,
}

impl RoundSummary {
    /// One-line description shown as the round result.
    pub fn text(&self) -> String {
        let mut text = match self.outcome {
            RoundOutcome::Tie => format!("It's a tie! Opponent played {}.", self.opponent_move),
            RoundOutcome::Win | RoundOutcome::Lose => format!(
                "You {} this round! You played {}. Opponent played {}.",
                if self.outcome == RoundOutcome::Win {
                    "win"
                } else {
                    "lose"
                },
                self.my_move,
                self.opponent_move
            ),
        };

        if let Some(scores) = &self.scores {
            text.push_str(&format!(
                " Scores: You ({}), Opponent ({})",
                scores.score(self.local_player),
                scores.score(self.local_player.opponent())
            ));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_winner_is_always_a_tie() {
        assert_eq!(RoundOutcome::classify(None, PlayerId::FIRST), RoundOutcome::Tie);
        assert_eq!(RoundOutcome::classify(None, PlayerId::SECOND), RoundOutcome::Tie);
    }

    #[test]
    fn winner_equal_to_local_player_is_a_win() {
        for player in [PlayerId::FIRST, PlayerId::SECOND] {
            assert_eq!(RoundOutcome::classify(Some(player), player), RoundOutcome::Win);
            assert_eq!(
                RoundOutcome::classify(Some(player.opponent()), player),
                RoundOutcome::Lose
            );
        }
    }

    #[test]
    fn game_outcome_has_no_tie() {
        assert_eq!(
            GameOutcome::classify(PlayerId::FIRST, PlayerId::SECOND),
            GameOutcome::Lose
        );
        assert_eq!(
            GameOutcome::classify(PlayerId::SECOND, PlayerId::SECOND),
            GameOutcome::Win
        );
    }

    #[test]
    fn summary_text_for_tie() {
        let summary = RoundSummary {
            outcome: RoundOutcome::Tie,
            local_player: PlayerId::FIRST,
            my_move: Move::Paper,
            opponent_move: Move::Paper,
            scores: None,
        };
        assert_eq!(summary.text(), "It's a tie! Opponent played paper.");
    }

    #[test]
    fn summary_text_reports_scores_from_local_seat() {
        let summary = RoundSummary {
            outcome: RoundOutcome::Win,
            local_player: PlayerId::SECOND,
            my_move: Move::Rock,
            opponent_move: Move::Scissors,
            scores: Some(
                [(PlayerId::FIRST, 2), (PlayerId::SECOND, 3)]
                    .into_iter()
                    .collect(),
            ),
        };
        assert_eq!(
            summary.text(),
            "You win this round! You played rock. Opponent played scissors. Scores: You (3), Opponent (2)"
        );
    }
}
