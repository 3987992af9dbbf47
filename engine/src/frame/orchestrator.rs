//! Frame Orchestrator
//!
//! Drives one frame at a time, in a fixed order:
//!
//! 1. Update the tracking session (camera pose, matrices, light estimate)
//! 2. Handle at most one tap, then any pending fire request
//! 3. Always draw the camera background
//! 4. Stop if the camera is not tracking
//! 5. Re-scan planes; leave `SearchingForSurfaces` once one is placeable
//! 6. Draw all planes
//! 7. Draw each placed cannon whose anchor is tracking
//! 8. Advance and draw the projectile; hand over the turn when it lands
//!
//! Input arrives from another thread through [`InputHandle`].

use std::sync::Arc;

use log::{debug, error, info, warn};

use super::FrameError;
use super::plan::{CameraMatrices, FramePlan, FrameSink, ObjectDraw, ObjectSlot};
use crate::config::CannonsConfig;
use crate::game::{FireRejected, GameState, Player, ProjectileStep, StatusUpdate};
use crate::input::{AimControls, TapReceiver, TapSender, tap_queue};
use crate::render::object_transform::ObjectTransform;
use crate::tracking::{
    CameraTextureHandle, Frame, Plane, SessionConfig, SessionError, Tap, Trackable, TrackingSession,
    TrackingState,
};

/// Input-thread side of the orchestrator. Cheap to clone.
#[derive(Clone)]
pub struct InputHandle {
    pub taps: TapSender,
    pub aim: Arc<AimControls>,
}

impl InputHandle {
    /// Queue a tap; returns `false` if the queue was full.
    pub fn tap(&self, x: f32, y: f32) -> bool {
        self.taps.offer(Tap::new(x, y))
    }

    pub fn drag(&self, distance_x: f32, distance_y: f32) {
        self.aim.apply_drag(distance_x, distance_y);
    }

    /// Press the "Fire!" action.
    pub fn fire(&self) {
        self.aim.request_fire();
    }
}

pub struct FrameOrchestrator<S: TrackingSession> {
    session: S,
    config: CannonsConfig,
    state: GameState,
    taps: TapReceiver,
    aim: Arc<AimControls>,
    configured: bool,
    resumed: bool,
    last_status: Option<StatusUpdate>,
}

impl<S: TrackingSession> FrameOrchestrator<S> {
    pub fn new(session: S, config: CannonsConfig) -> (Self, InputHandle) {
        let (sender, receiver) = tap_queue(config.tap_queue_capacity);
        let aim = Arc::new(AimControls::new(config.drag_sensitivity));
        let input = InputHandle {
            taps: sender,
            aim: Arc::clone(&aim),
        };
        let orchestrator = Self {
            session,
            config,
            state: GameState::new(),
            taps: receiver,
            aim,
            configured: false,
            resumed: false,
            last_status: None,
        };
        (orchestrator, input)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &CannonsConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Current status line, whether or not it was already published.
    pub fn status(&self) -> StatusUpdate {
        self.state.status()
    }

    /// Configure (first time only) and resume the session. Calling it while
    /// already resumed does nothing.
    pub fn on_resume(&mut self) -> Result<(), SessionError> {
        if self.resumed {
            return Ok(());
        }
        if !self.configured {
            self.session.configure(&SessionConfig::default())?;
            self.configured = true;
        }
        self.session.resume()?;
        self.resumed = true;
        // Re-publish the status line to a freshly shown UI
        self.last_status = None;
        info!("Tracking session resumed");
        Ok(())
    }

    pub fn on_pause(&mut self) {
        if !self.resumed {
            return;
        }
        self.session.pause();
        self.resumed = false;
        info!("Tracking session paused");
    }

    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.session.set_display_geometry(width, height);
    }

    /// Hand the background renderer's camera texture to the session.
    pub fn set_camera_texture(&mut self, handle: CameraTextureHandle) {
        self.session.set_camera_texture(handle);
    }

    /// Render-thread fire entry point; the input thread goes through
    /// [`InputHandle::fire`] instead.
    pub fn fire(&mut self) -> Result<Player, FireRejected> {
        let poses = Player::ALL.map(|player| {
            self.state
                .anchor(player)
                .and_then(|handle| self.session.anchor(handle))
                .map(|anchor| anchor.pose.to_matrix())
        });

        let player = self.state.fire(|player| poses[player.index()])?;
        info!("Player {} fired", player.name());
        Ok(player)
    }

    /// Compute one frame. The session must be resumed.
    pub fn run_frame(&mut self) -> Result<FramePlan, FrameError> {
        let frame = self.session.update(self.config.near_plane, self.config.far_plane)?;

        if let Some(tap) = self.taps.poll() {
            if frame.is_tracking() {
                self.handle_tap(&frame, tap);
            } else {
                debug!("Ignoring tap at ({}, {}): camera not tracking", tap.x, tap.y);
            }
        }
        if self.aim.take_fire_request() {
            if let Err(rejected) = self.fire() {
                warn!("Fire request rejected: {}", rejected);
            }
        }

        let mut plan = FramePlan::background(&frame);
        if !frame.is_tracking() {
            plan.status = self.take_status_change();
            return Ok(plan);
        }

        let planes = self.session.tracked_planes();
        if planes.iter().any(Plane::is_placeable) && self.state.surfaces_found() {
            info!("Surface found; waiting for player one");
        }

        plan.camera = Some(CameraMatrices {
            view: frame.view_matrix,
            projection: frame.projection_matrix,
            light_intensity: frame.light_intensity,
        });
        plan.planes = planes;

        self.emit_cannons(&mut plan);
        self.advance_projectile(&mut plan);

        plan.status = self.take_status_change();
        Ok(plan)
    }

    /// Run a frame and hand it to `sink`. Errors are logged and the frame is
    /// skipped. Returns whether anything was submitted.
    pub fn on_draw_frame(&mut self, sink: &mut dyn FrameSink) -> bool {
        if !self.resumed {
            return false;
        }
        let result = self.run_frame().and_then(|plan| sink.submit(&plan));
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Exception on the render thread: {}", e);
                false
            }
        }
    }

    fn handle_tap(&mut self, frame: &Frame, tap: Tap) {
        let Some(player) = self.state.next_placement() else {
            debug!("Tap ignored: both cannons placed");
            return;
        };

        // Only the nearest hit counts; anything behind it is ignored
        let planes = self.session.tracked_planes();
        let hit = self
            .session
            .hit_test(frame, tap)
            .into_iter()
            .next()
            .filter(|hit| match hit.trackable {
                Trackable::Plane(id) => planes
                    .iter()
                    .any(|plane| plane.id == id && plane.is_pose_in_polygon(&hit.pose)),
                Trackable::Point => false,
            });

        let Some(hit) = hit else {
            debug!("Tap at ({}, {}) hit no plane", tap.x, tap.y);
            return;
        };

        let handle = self.session.create_anchor(hit.pose);
        self.state.place_anchor(handle);
        info!(
            "Player {} cannon placed at {:?}",
            player.name(),
            hit.pose.translation
        );
        if player == Player::Two {
            self.aim.set_active_player(Player::One);
        }
    }

    fn emit_cannons(&self, plan: &mut FramePlan) {
        for (player, slot) in [
            (Player::One, ObjectSlot::Cannon1),
            (Player::Two, ObjectSlot::Cannon2),
        ] {
            let Some(anchor) = self
                .state
                .anchor(player)
                .and_then(|handle| self.session.anchor(handle))
            else {
                continue;
            };
            if anchor.tracking_state != TrackingState::Tracking {
                continue;
            }

            let aim = self.aim.angles(player);
            let mut transform = ObjectTransform::default();
            transform.update_model_matrix(anchor.pose.to_matrix(), self.config.cannon_scale);
            transform.update_rotation(aim.horizontal, aim.vertical);
            plan.objects.push(ObjectDraw { slot, transform });
        }
    }

    fn advance_projectile(&mut self, plan: &mut FramePlan) {
        let step = self
            .state
            .advance_projectile(self.config.projectile_step, self.config.projectile_travel);
        match step {
            Some(ProjectileStep::InFlight(_)) => {
                if let Some(projectile) = self.state.projectile() {
                    let mut transform = ObjectTransform::default();
                    transform.update_model_matrix(
                        projectile.placement_matrix(self.config.projectile_lift),
                        self.config.projectile_scale,
                    );
                    plan.objects.push(ObjectDraw {
                        slot: ObjectSlot::Projectile,
                        transform,
                    });
                }
            }
            Some(ProjectileStep::Landed) => {
                if let Some(action) = self.state.fire_action() {
                    self.aim.set_active_player(action.player);
                    info!("Projectile landed; player {}'s turn", action.player.name());
                }
            }
            None => {}
        }
    }

    fn take_status_change(&mut self) -> Option<StatusUpdate> {
        let status = self.state.status();
        if self.last_status == Some(status) {
            return None;
        }
        self.last_status = Some(status);
        Some(status)
    }
}
