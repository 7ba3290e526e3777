//! Render Port - Outbound port for the presentation surface
//!
//! The session core never touches a UI directly. After every state change it
//! hands a full [`RenderInstruction`] snapshot to whatever implements this port.

/// Everything the presentation layer needs to draw the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderInstruction {
    pub status_text: String,
    pub show_setup_panel: bool,
    pub show_play_panel: bool,
    pub show_move_buttons: bool,
    pub room_label: Option<String>,
    pub round_result_text: Option<String>,
    pub game_result_text: Option<String>,
}

impl RenderInstruction {
    /// View before any room code has been entered.
    pub fn setup() -> Self {
        Self {
            show_setup_panel: true,
            ..Self::default()
        }
    }
}

/// Presentation surface driven by the session controller
#[cfg_attr(test, mockall::automock)]
pub trait RenderPort {
    fn render(&mut self, instruction: &RenderInstruction);
}
