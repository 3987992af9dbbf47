//! Player-facing status line and its optional "Fire!" action.

use std::fmt;

use super::state::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    SearchingForSurfaces,
    PlaceCannon(Player),
    PlayerTurn(Player),
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::SearchingForSurfaces => write!(f, "Searching for surfaces..."),
            StatusMessage::PlaceCannon(player) => {
                write!(f, "Player {} place your cannon.", player.name())
            }
            StatusMessage::PlayerTurn(player) => write!(f, "Player {}'s turn.", player.name()),
        }
    }
}

/// A "Fire!" button bound to the cannon of `player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireAction {
    pub player: Player,
}

impl FireAction {
    pub const LABEL: &'static str = "Fire!";
}

/// What the host UI should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub message: StatusMessage,
    pub fire_action: Option<FireAction>,
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fire_action {
            Some(_) => write!(f, "{} [{}]", self.message, FireAction::LABEL),
            None => write!(f, "{}", self.message),
        }
    }
}
