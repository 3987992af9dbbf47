//! Projectile flight.
//!
//! Not a ballistic simulation: the projectile slides along its cannon's
//! forward axis by a fixed step per frame, starting from the cannon pose
//! captured at fire time, and lands after a fixed travel distance.

use glam::{Mat4, Vec3};

use super::state::Player;

/// Outcome of one frame of flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    /// Still flying at the given displacement
    InFlight(f32),
    /// Reached the travel distance this frame; no longer drawn
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    origin: Mat4,
    fired_by: Player,
    frames: u32,
    displacement: f32,
    active: bool,
}

impl Projectile {
    /// Launch from `origin` (the firing cannon's anchor pose).
    pub fn fire(origin: Mat4, fired_by: Player) -> Self {
        Self {
            origin,
            fired_by,
            frames: 0,
            displacement: 0.0,
            active: true,
        }
    }

    pub fn fired_by(&self) -> Player {
        self.fired_by
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    /// Advance one frame. Displacement is derived from the frame count so
    /// landing happens on a predictable frame regardless of float drift.
    pub fn advance(&mut self, step: f32, travel: f32) -> ProjectileStep {
        if !self.active {
            return ProjectileStep::Landed;
        }

        self.frames += 1;
        self.displacement = step * self.frames as f32;
        if self.displacement >= travel {
            self.active = false;
            ProjectileStep::Landed
        } else {
            ProjectileStep::InFlight(self.displacement)
        }
    }

    /// Placement matrix for the current displacement, before scaling.
    pub fn placement_matrix(&self, lift: f32) -> Mat4 {
        self.origin * Mat4::from_translation(Vec3::new(self.displacement, lift, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lands_on_frame_200() {
        let mut projectile = Projectile::fire(Mat4::IDENTITY, Player::One);
        let mut last = 0.0;
        for frame in 1..200 {
            match projectile.advance(0.01, 2.0) {
                ProjectileStep::InFlight(d) => {
                    assert!(d >= last, "displacement decreased at frame {frame}");
                    last = d;
                }
                ProjectileStep::Landed => panic!("landed early at frame {frame}"),
            }
        }
        assert_eq!(projectile.advance(0.01, 2.0), ProjectileStep::Landed);
        assert!(!projectile.is_active());
    }

    #[test]
    fn test_advance_after_landing_is_noop() {
        let mut projectile = Projectile::fire(Mat4::IDENTITY, Player::Two);
        while projectile.advance(0.5, 1.0) != ProjectileStep::Landed {}
        let displacement = projectile.displacement();
        assert_eq!(projectile.advance(0.5, 1.0), ProjectileStep::Landed);
        assert_eq!(projectile.displacement(), displacement);
    }

    #[test]
    fn test_placement_follows_origin() {
        let origin = Mat4::from_translation(Vec3::new(1.0, 0.0, -2.0));
        let mut projectile = Projectile::fire(origin, Player::One);
        projectile.advance(0.25, 2.0);

        let position = projectile.placement_matrix(0.1).transform_point3(Vec3::ZERO);
        assert!((position - Vec3::new(1.25, 0.1, -2.0)).length() < 1e-6);
    }
}
