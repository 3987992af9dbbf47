//! Game Module
//!
//! Turn-based rules layered on top of the engine: who places which cannon,
//! whose turn it is, and the single projectile's flight.

pub mod projectile;
pub mod state;
pub mod status;

pub use projectile::{Projectile, ProjectileStep};
pub use state::{FireRejected, GamePhase, GameState, Player, TurnState};
pub use status::{FireAction, StatusMessage, StatusUpdate};
