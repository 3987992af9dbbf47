//! Cross-thread aim and fire controls.
//!
//! The input thread is the only writer of the angle accumulators; the render
//! thread is the only writer of the active player. Angles are stored as f32
//! bit patterns in atomics with relaxed ordering: a frame may see one axis
//! updated before the other, which is harmless for continuously-changing
//! visual aim.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::game::Player;

/// Accumulated user aim for one player, in degrees. Unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AimAngles {
    pub horizontal: f32,
    pub vertical: f32,
}

#[derive(Default)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn add(&self, delta: f32) {
        // Single writer: a plain load/store is enough
        self.0.store((self.load() + delta).to_bits(), Ordering::Relaxed);
    }
}

#[derive(Default)]
struct PlayerAim {
    horizontal: AtomicF32,
    vertical: AtomicF32,
}

/// Shared between the input thread (drags, fire button) and the render thread.
pub struct AimControls {
    sensitivity: f32,
    active_player: AtomicU8,
    aims: [PlayerAim; 2],
    fire_requested: AtomicBool,
}

impl AimControls {
    /// `sensitivity` is degrees of aim per unit of drag distance.
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            active_player: AtomicU8::new(Player::One.index() as u8),
            aims: Default::default(),
            fire_requested: AtomicBool::new(false),
        }
    }

    /// Input thread: accumulate a drag delta into the active player's aim.
    pub fn apply_drag(&self, distance_x: f32, distance_y: f32) {
        let aim = &self.aims[self.active_player().index()];
        aim.horizontal.add(distance_x * self.sensitivity);
        aim.vertical.add(distance_y * self.sensitivity);
    }

    /// Render thread: publish whose turn it is, so drags steer that cannon.
    pub fn set_active_player(&self, player: Player) {
        self.active_player
            .store(player.index() as u8, Ordering::Release);
    }

    pub fn active_player(&self) -> Player {
        Player::from_index(self.active_player.load(Ordering::Acquire) as usize)
    }

    pub fn angles(&self, player: Player) -> AimAngles {
        let aim = &self.aims[player.index()];
        AimAngles {
            horizontal: aim.horizontal.load(),
            vertical: aim.vertical.load(),
        }
    }

    /// Input thread: the player pressed "Fire!".
    pub fn request_fire(&self) {
        self.fire_requested.store(true, Ordering::Release);
    }

    /// Render thread: consume a pending fire request.
    pub fn take_fire_request(&self) -> bool {
        self.fire_requested.swap(false, Ordering::AcqRel)
    }
}
