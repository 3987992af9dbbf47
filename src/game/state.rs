//! Game State
//!
//! Turn state machine for two players sharing one tracked surface.
//!
//! ```text
//! SearchingForSurfaces -> WaitingForPlayer1Placement -> WaitingForPlayer2Placement
//!     -> Player1Turn <-> Player2Turn
//! ```
//!
//! A projectile in flight is orthogonal to the turn: it is launched from
//! either turn and, on landing, hands the turn to the other player.

use glam::Mat4;
use thiserror::Error;

use super::projectile::{Projectile, ProjectileStep};
use super::status::{FireAction, StatusMessage, StatusUpdate};
use crate::tracking::AnchorHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Any index other than 0 maps to player two.
    pub fn from_index(index: usize) -> Self {
        if index == 0 { Player::One } else { Player::Two }
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::One => "one",
            Player::Two => "two",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    SearchingForSurfaces,
    WaitingForPlayer1Placement,
    WaitingForPlayer2Placement,
    Player1Turn,
    Player2Turn,
}

impl TurnState {
    pub fn turn_of(player: Player) -> Self {
        match player {
            Player::One => TurnState::Player1Turn,
            Player::Two => TurnState::Player2Turn,
        }
    }
}

/// Combined view of the turn and the projectile sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    SearchingForSurfaces,
    WaitingForPlacement(Player),
    PlayerTurn(Player),
    ProjectileInFlight { fired_by: Player },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FireRejected {
    #[error("a projectile is already in flight")]
    AlreadyInFlight,
    #[error("no fire action is available")]
    NoFireAction,
    #[error("player {}'s cannon has no pose", .0.name())]
    AnchorUnavailable(Player),
}

#[derive(Debug, Clone)]
pub struct GameState {
    turn: TurnState,
    anchors: [Option<AnchorHandle>; 2],
    projectile: Option<Projectile>,
    fire_action: Option<FireAction>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            turn: TurnState::SearchingForSurfaces,
            anchors: [None, None],
            projectile: None,
            fire_action: None,
        }
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        if let Some(projectile) = self.projectile.as_ref().filter(|p| p.is_active()) {
            return GamePhase::ProjectileInFlight {
                fired_by: projectile.fired_by(),
            };
        }
        match self.turn {
            TurnState::SearchingForSurfaces => GamePhase::SearchingForSurfaces,
            TurnState::WaitingForPlayer1Placement => GamePhase::WaitingForPlacement(Player::One),
            TurnState::WaitingForPlayer2Placement => GamePhase::WaitingForPlacement(Player::Two),
            TurnState::Player1Turn => GamePhase::PlayerTurn(Player::One),
            TurnState::Player2Turn => GamePhase::PlayerTurn(Player::Two),
        }
    }

    pub fn anchor(&self, player: Player) -> Option<AnchorHandle> {
        self.anchors[player.index()]
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn fire_action(&self) -> Option<FireAction> {
        self.fire_action
    }

    /// A placeable surface was seen. Only leaves `SearchingForSurfaces`;
    /// returns whether the state changed.
    pub fn surfaces_found(&mut self) -> bool {
        if self.turn == TurnState::SearchingForSurfaces {
            self.turn = TurnState::WaitingForPlayer1Placement;
            true
        } else {
            false
        }
    }

    /// Player whose cannon the next accepted tap places, if any.
    pub fn next_placement(&self) -> Option<Player> {
        Player::ALL.into_iter().find(|p| self.anchors[p.index()].is_none())
    }

    /// Record a freshly created anchor for the next unplaced cannon.
    ///
    /// Placing the second cannon starts player one's turn and surfaces the
    /// fire action. Returns the player the anchor was assigned to.
    pub fn place_anchor(&mut self, handle: AnchorHandle) -> Option<Player> {
        let player = self.next_placement()?;
        self.anchors[player.index()] = Some(handle);
        match player {
            Player::One => self.turn = TurnState::WaitingForPlayer2Placement,
            Player::Two => {
                self.turn = TurnState::Player1Turn;
                self.fire_action = Some(FireAction { player: Player::One });
            }
        }
        Some(player)
    }

    /// Status line for the current turn state.
    pub fn status(&self) -> StatusUpdate {
        let message = match self.turn {
            TurnState::SearchingForSurfaces => StatusMessage::SearchingForSurfaces,
            TurnState::WaitingForPlayer1Placement => StatusMessage::PlaceCannon(Player::One),
            TurnState::WaitingForPlayer2Placement => StatusMessage::PlaceCannon(Player::Two),
            TurnState::Player1Turn => StatusMessage::PlayerTurn(Player::One),
            TurnState::Player2Turn => StatusMessage::PlayerTurn(Player::Two),
        };
        StatusUpdate {
            message,
            fire_action: self.fire_action,
        }
    }

    /// Launch a projectile through the surfaced fire action.
    ///
    /// `anchor_pose` resolves the firing player's current anchor pose; the
    /// fire action stays surfaced if it yields nothing.
    pub fn fire(
        &mut self,
        anchor_pose: impl FnOnce(Player) -> Option<Mat4>,
    ) -> Result<Player, FireRejected> {
        if self.projectile.as_ref().is_some_and(|p| p.is_active()) {
            return Err(FireRejected::AlreadyInFlight);
        }
        let player = self.fire_action.ok_or(FireRejected::NoFireAction)?.player;
        let origin = anchor_pose(player).ok_or(FireRejected::AnchorUnavailable(player))?;

        self.projectile = Some(Projectile::fire(origin, player));
        self.fire_action = None;
        Ok(player)
    }

    /// Step the projectile one frame. On landing the turn passes to the
    /// other player and the fire action is surfaced for them.
    pub fn advance_projectile(&mut self, step: f32, travel: f32) -> Option<ProjectileStep> {
        let projectile = self.projectile.as_mut()?;
        let outcome = projectile.advance(step, travel);
        if outcome == ProjectileStep::Landed {
            let next = projectile.fired_by().other();
            self.projectile = None;
            self.turn = TurnState::turn_of(next);
            self.fire_action = Some(FireAction { player: next });
        }
        Some(outcome)
    }
}
