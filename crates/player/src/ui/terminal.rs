//! Line-oriented terminal front end.
//!
//! The renderer prints only what changed between two views. Input is read a
//! line at a time and interpreted against the view currently on screen: while
//! the setup panel is visible a line is a room code, while move buttons are
//! visible a line is a move.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};

use roshambo_shared::Move;

use crate::application::{SessionInput, UserIntent};
use crate::ports::outbound::{RenderInstruction, RenderPort};

const CODE_PROMPT: &str = "Enter a 4-digit game code (or 'quit'):";
const MOVE_PROMPT: &str = "Choose your move: rock, paper or scissors (r/p/s):";

/// Writes render instructions to a terminal and publishes the latest view
/// for the input reader.
pub struct TerminalRenderer<W: Write> {
    out: W,
    previous: Option<RenderInstruction>,
    view_tx: watch::Sender<RenderInstruction>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> (Self, watch::Receiver<RenderInstruction>) {
        let (view_tx, view_rx) = watch::channel(RenderInstruction::setup());
        let renderer = Self {
            out,
            previous: None,
            view_tx,
        };
        (renderer, view_rx)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn write_changes(&mut self, next: &RenderInstruction) -> io::Result<()> {
        let prev = self.previous.as_ref();
        let mut lines: Vec<String> = Vec::new();

        if let Some(label) = changed_text(prev, next, |v| &v.room_label) {
            lines.push(format!("== {label} =="));
        }
        if prev.map_or(true, |p| p.status_text != next.status_text) && !next.status_text.is_empty()
        {
            lines.push(next.status_text.clone());
        }
        if let Some(text) = changed_text(prev, next, |v| &v.round_result_text) {
            lines.push(text.to_string());
        }
        if let Some(text) = changed_text(prev, next, |v| &v.game_result_text) {
            lines.push(format!("*** {text} ***"));
        }

        if next.show_setup_panel && prev.map_or(true, |p| !p.show_setup_panel) {
            lines.push(CODE_PROMPT.to_string());
        }
        if next.show_move_buttons && prev.map_or(true, |p| !p.show_move_buttons) {
            lines.push(MOVE_PROMPT.to_string());
        }

        for line in &lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

/// The field's new value, if it is set and differs from the previous view.
fn changed_text<'a>(
    prev: Option<&RenderInstruction>,
    next: &'a RenderInstruction,
    field: fn(&RenderInstruction) -> &Option<String>,
) -> Option<&'a str> {
    let now = field(next).as_deref();
    match prev {
        Some(prev) if field(prev).as_deref() == now => None,
        _ => now,
    }
}

impl<W: Write> RenderPort for TerminalRenderer<W> {
    fn render(&mut self, instruction: &RenderInstruction) {
        if let Err(e) = self.write_changes(instruction) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
        self.previous = Some(instruction.clone());
        self.view_tx.send_replace(instruction.clone());
    }
}

/// How one input line was understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Intent(UserIntent),
    /// Nothing to do (blank line, or no panel accepts input)
    Ignored,
    /// Feedback for the user; no intent produced
    Invalid(String),
}

pub fn parse_line(line: &str, view: &RenderInstruction) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Ignored;
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return ParsedLine::Intent(UserIntent::Quit);
    }

    if view.show_setup_panel {
        return ParsedLine::Intent(UserIntent::SubmitRoomCode(line.to_string()));
    }
    if view.show_move_buttons {
        return match line.parse::<Move>() {
            Ok(choice) => ParsedLine::Intent(UserIntent::SelectMove(choice)),
            Err(_) => ParsedLine::Invalid(format!(
                "'{line}' is not a move. Choose rock, paper or scissors."
            )),
        };
    }
    if view.show_play_panel {
        return ParsedLine::Invalid("No move can be made right now.".to_string());
    }
    ParsedLine::Ignored
}

/// Read lines from `input` until EOF or quit, turning them into intents.
///
/// End of input is treated as a quit.
pub async fn read_intents<I, W>(
    input: I,
    view: watch::Receiver<RenderInstruction>,
    inputs: mpsc::UnboundedSender<SessionInput>,
    mut feedback: W,
) -> io::Result<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let parsed = parse_line(&line, &view.borrow());
        match parsed {
            ParsedLine::Intent(intent) => {
                let quit = intent == UserIntent::Quit;
                if inputs.send(SessionInput::User(intent)).is_err() || quit {
                    return Ok(());
                }
            }
            ParsedLine::Invalid(message) => {
                writeln!(feedback, "{message}")?;
                feedback.flush()?;
            }
            ParsedLine::Ignored => {}
        }
    }

    tracing::debug!("Input closed");
    let _ = inputs.send(SessionInput::User(UserIntent::Quit));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_view(buttons: bool) -> RenderInstruction {
        RenderInstruction {
            status_text: "Connected to game room.".to_string(),
            show_play_panel: true,
            show_move_buttons: buttons,
            room_label: Some("Game Code: 1234".to_string()),
            ..RenderInstruction::default()
        }
    }

    fn printed(renderer: &TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.output().clone()).expect("utf8")
    }

    #[test]
    fn first_render_prints_status_and_code_prompt() {
        let (mut renderer, _view) = TerminalRenderer::new(Vec::new());
        renderer.render(&RenderInstruction {
            status_text: "Waiting for another player...".to_string(),
            ..RenderInstruction::setup()
        });

        assert_eq!(
            printed(&renderer),
            format!("Waiting for another player...\n{CODE_PROMPT}\n")
        );
    }

    #[test]
    fn only_changed_fields_are_printed() {
        let (mut renderer, _view) = TerminalRenderer::new(Vec::new());
        renderer.render(&play_view(false));
        let before = printed(&renderer).len();

        renderer.render(&play_view(false));
        assert_eq!(printed(&renderer).len(), before);

        let mut started = play_view(true);
        started.status_text = "Game has started! Please make your move.".to_string();
        renderer.render(&started);

        let out = printed(&renderer);
        assert!(out.ends_with(&format!(
            "Game has started! Please make your move.\n{MOVE_PROMPT}\n"
        )));
        assert_eq!(out.matches("Game Code: 1234").count(), 1);
    }

    #[test]
    fn round_result_is_printed_once() {
        let (mut renderer, _view) = TerminalRenderer::new(Vec::new());
        renderer.render(&play_view(true));

        let mut resolved = play_view(true);
        resolved.round_result_text = Some("It's a tie! Opponent played rock.".to_string());
        renderer.render(&resolved);
        renderer.render(&resolved);

        let out = printed(&renderer);
        assert!(out.ends_with("It's a tie! Opponent played rock.\n"));
        assert_eq!(out.matches("tie").count(), 1);
        assert_eq!(out.matches(MOVE_PROMPT).count(), 1);
    }

    #[test]
    fn render_publishes_view() {
        let (mut renderer, view) = TerminalRenderer::new(Vec::new());
        renderer.render(&play_view(true));
        assert!(view.borrow().show_move_buttons);
    }

    #[test]
    fn lines_are_read_against_visible_panel() {
        let setup = RenderInstruction::setup();
        assert_eq!(
            parse_line("1234\n", &setup),
            ParsedLine::Intent(UserIntent::SubmitRoomCode("1234".to_string()))
        );
        assert_eq!(parse_line("   ", &setup), ParsedLine::Ignored);
        assert_eq!(parse_line("QUIT", &setup), ParsedLine::Intent(UserIntent::Quit));

        let playing = play_view(true);
        assert_eq!(
            parse_line("Paper", &playing),
            ParsedLine::Intent(UserIntent::SelectMove(Move::Paper))
        );
        assert_eq!(
            parse_line("s", &playing),
            ParsedLine::Intent(UserIntent::SelectMove(Move::Scissors))
        );
        assert!(matches!(parse_line("lizard", &playing), ParsedLine::Invalid(_)));

        assert!(matches!(
            parse_line("rock", &play_view(false)),
            ParsedLine::Invalid(_)
        ));
    }

    #[tokio::test]
    async fn reader_sends_intents_then_quits_at_eof() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_view_tx, view_rx) = watch::channel(RenderInstruction::setup());
        let mut feedback = Vec::new();

        read_intents(&b"\n1234\n"[..], view_rx, tx, &mut feedback)
            .await
            .expect("read");

        assert_eq!(
            rx.recv().await,
            Some(SessionInput::User(UserIntent::SubmitRoomCode(
                "1234".to_string()
            )))
        );
        assert_eq!(rx.recv().await, Some(SessionInput::User(UserIntent::Quit)));
        assert!(feedback.is_empty());
    }

    #[tokio::test]
    async fn reader_reports_bad_moves() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_view_tx, view_rx) = watch::channel(play_view(true));
        let mut feedback = Vec::new();

        read_intents(&b"spock\nrock\nexit\nignored\n"[..], view_rx, tx, &mut feedback)
            .await
            .expect("read");

        assert_eq!(
            rx.recv().await,
            Some(SessionInput::User(UserIntent::SelectMove(Move::Rock)))
        );
        assert_eq!(rx.recv().await, Some(SessionInput::User(UserIntent::Quit)));
        // Reader stopped at exit and dropped the sender
        assert_eq!(rx.recv().await, None);
        assert!(String::from_utf8(feedback).expect("utf8").contains("'spock'"));
    }
}
