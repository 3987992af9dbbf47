//! Game Flow Tests - Orchestrator and Turn State Machine
//!
//! Drives `FrameOrchestrator` frame by frame against a scripted tracking
//! session and a recording sink, without a GPU.

use std::cell::Cell;

use glam::{Mat4, Vec2, Vec3};

use cannons_ar_engine::config::CannonsConfig;
use cannons_ar_engine::frame::{FrameError, FrameOrchestrator, FramePlan, FrameSink, ObjectSlot};
use cannons_ar_engine::game::{
    FireAction, FireRejected, GamePhase, Player, StatusMessage, TurnState,
};
use cannons_ar_engine::tracking::{
    Anchor, AnchorHandle, CameraTextureHandle, DeviceProfile, Frame, HitResult,
    IDENTITY_DISPLAY_UVS, Plane, PlaneId, PlaneType, Pose, SessionConfig, SessionError,
    SimulatedSession, Tap, Trackable, TrackingSession, TrackingState, UpdateError,
};

// ============================================================================
// Test doubles
// ============================================================================

/// Tracking session whose planes, hits and camera state are set by the test.
#[derive(Default)]
struct ScriptedSession {
    resumed: bool,
    camera_lost: bool,
    fail_update: bool,
    planes: Vec<Plane>,
    hits: Vec<HitResult>,
    anchors: Vec<Pose>,
    configure_calls: usize,
    resume_calls: usize,
    pause_calls: usize,
    hit_tests: Cell<usize>,
}

impl TrackingSession for ScriptedSession {
    fn configure(&mut self, _config: &SessionConfig) -> Result<(), SessionError> {
        self.configure_calls += 1;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SessionError> {
        self.resume_calls += 1;
        self.resumed = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.resumed = false;
    }

    fn set_camera_texture(&mut self, _handle: CameraTextureHandle) {}

    fn set_display_geometry(&mut self, _width: u32, _height: u32) {}

    fn update(&mut self, _near: f32, _far: f32) -> Result<Frame, UpdateError> {
        if self.fail_update {
            return Err(UpdateError::CameraUnavailable);
        }
        Ok(Frame {
            timestamp_ns: 0,
            camera_pose: Pose::IDENTITY,
            camera_tracking_state: if self.camera_lost {
                TrackingState::Paused
            } else {
                TrackingState::Tracking
            },
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            light_intensity: 0.5,
            display_uvs: IDENTITY_DISPLAY_UVS,
            camera_image: None,
        })
    }

    fn hit_test(&self, _frame: &Frame, _tap: Tap) -> Vec<HitResult> {
        self.hit_tests.set(self.hit_tests.get() + 1);
        self.hits.clone()
    }

    fn tracked_planes(&self) -> Vec<Plane> {
        self.planes.clone()
    }

    fn create_anchor(&mut self, pose: Pose) -> AnchorHandle {
        self.anchors.push(pose);
        AnchorHandle(self.anchors.len() as u64 - 1)
    }

    fn anchor(&self, handle: AnchorHandle) -> Option<Anchor> {
        let pose = *self.anchors.get(handle.0 as usize)?;
        Some(Anchor {
            pose,
            tracking_state: if self.camera_lost {
                TrackingState::Paused
            } else {
                TrackingState::Tracking
            },
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    plans: Vec<FramePlan>,
    fail: bool,
}

impl FrameSink for RecordingSink {
    fn submit(&mut self, plan: &FramePlan) -> Result<(), FrameError> {
        if self.fail {
            return Err(FrameError::Renderer("sink failure".to_string()));
        }
        self.plans.push(plan.clone());
        Ok(())
    }
}

fn floor_plane() -> Plane {
    Plane {
        id: PlaneId(7),
        plane_type: PlaneType::HorizontalUpwardFacing,
        tracking_state: TrackingState::Tracking,
        center_pose: Pose::from_translation(Vec3::new(0.0, 0.0, -1.0)),
        polygon: vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ],
    }
}

fn plane_hit(x: f32, z: f32) -> HitResult {
    HitResult {
        pose: Pose::from_translation(Vec3::new(x, 0.0, z)),
        distance: 1.0,
        trackable: Trackable::Plane(PlaneId(7)),
    }
}

fn point_hit() -> HitResult {
    HitResult {
        pose: Pose::from_translation(Vec3::new(0.0, 0.0, -1.0)),
        distance: 0.5,
        trackable: Trackable::Point,
    }
}

fn orchestrator() -> (
    FrameOrchestrator<ScriptedSession>,
    cannons_ar_engine::frame::InputHandle,
) {
    let session = ScriptedSession {
        planes: vec![floor_plane()],
        ..Default::default()
    };
    let (mut orchestrator, input) = FrameOrchestrator::new(session, CannonsConfig::default());
    orchestrator.on_resume().unwrap();
    (orchestrator, input)
}

/// Place both cannons with in-polygon taps.
fn placed() -> (
    FrameOrchestrator<ScriptedSession>,
    cannons_ar_engine::frame::InputHandle,
) {
    let (mut orchestrator, input) = orchestrator();
    orchestrator.session_mut().hits = vec![plane_hit(-0.5, -1.0)];
    input.tap(10.0, 10.0);
    orchestrator.run_frame().unwrap();
    orchestrator.session_mut().hits = vec![plane_hit(0.5, -1.0)];
    input.tap(20.0, 20.0);
    orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.state().turn(), TurnState::Player1Turn);
    (orchestrator, input)
}

// ============================================================================
// Surface search and placement
// ============================================================================

#[test]
fn test_starts_searching_without_planes() {
    let session = ScriptedSession::default();
    let (mut orchestrator, _input) = FrameOrchestrator::new(session, CannonsConfig::default());
    orchestrator.on_resume().unwrap();

    let plan = orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.state().turn(), TurnState::SearchingForSurfaces);
    assert_eq!(
        plan.status.map(|s| s.message),
        Some(StatusMessage::SearchingForSurfaces)
    );

    // Unchanged status is not re-published
    let plan = orchestrator.run_frame().unwrap();
    assert!(plan.status.is_none());
}

#[test]
fn test_placeable_plane_ends_search() {
    let (mut orchestrator, _input) = orchestrator();
    let plan = orchestrator.run_frame().unwrap();

    assert_eq!(
        orchestrator.state().turn(),
        TurnState::WaitingForPlayer1Placement
    );
    assert_eq!(
        plan.status.map(|s| s.message),
        Some(StatusMessage::PlaceCannon(Player::One))
    );
    assert_eq!(plan.planes.len(), 1);
}

#[test]
fn test_non_placeable_planes_keep_searching() {
    let mut wall = floor_plane();
    wall.plane_type = PlaneType::Vertical;
    let mut paused = floor_plane();
    paused.tracking_state = TrackingState::Paused;
    let session = ScriptedSession {
        planes: vec![wall, paused],
        ..Default::default()
    };
    let (mut orchestrator, _input) = FrameOrchestrator::new(session, CannonsConfig::default());
    orchestrator.on_resume().unwrap();

    let plan = orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.state().turn(), TurnState::SearchingForSurfaces);
    // Still handed to the renderer, which filters by tracking state itself
    assert_eq!(plan.planes.len(), 2);
}

#[test]
fn test_repeated_non_plane_taps_change_nothing() {
    let (mut orchestrator, input) = orchestrator();
    orchestrator.run_frame().unwrap();

    // Point hits and plane hits outside the polygon
    orchestrator.session_mut().hits = vec![point_hit(), plane_hit(3.0, -1.0)];
    for i in 0..5 {
        assert!(input.tap(i as f32, 0.0));
        orchestrator.run_frame().unwrap();
    }

    assert_eq!(
        orchestrator.state().turn(),
        TurnState::WaitingForPlayer1Placement
    );
    assert!(orchestrator.session().anchors.is_empty());
    assert_eq!(orchestrator.state().anchor(Player::One), None);
}

#[test]
fn test_placement_sequence() {
    let (mut orchestrator, input) = orchestrator();
    orchestrator.run_frame().unwrap();

    orchestrator.session_mut().hits = vec![plane_hit(-0.5, -1.0)];
    input.tap(10.0, 10.0);
    let plan = orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.session().anchors.len(), 1);
    assert_eq!(
        orchestrator.state().turn(),
        TurnState::WaitingForPlayer2Placement
    );
    assert_eq!(
        plan.status.map(|s| s.message),
        Some(StatusMessage::PlaceCannon(Player::Two))
    );
    assert!(plan.object(ObjectSlot::Cannon1).is_some());
    assert!(plan.object(ObjectSlot::Cannon2).is_none());

    orchestrator.session_mut().hits = vec![plane_hit(0.5, -1.0)];
    input.tap(20.0, 20.0);
    let plan = orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.session().anchors.len(), 2);
    assert_eq!(orchestrator.state().turn(), TurnState::Player1Turn);
    let status = plan.status.unwrap();
    assert_eq!(status.message, StatusMessage::PlayerTurn(Player::One));
    assert_eq!(
        status.fire_action,
        Some(FireAction {
            player: Player::One
        })
    );
    assert!(plan.object(ObjectSlot::Cannon2).is_some());

    // Further taps are ignored
    input.tap(30.0, 30.0);
    orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.session().anchors.len(), 2);
}

#[test]
fn test_only_nearest_hit_is_considered() {
    let (mut orchestrator, input) = orchestrator();

    // Nearest hit is on the plane but outside its polygon
    orchestrator.session_mut().hits = vec![plane_hit(5.0, -1.0), plane_hit(0.0, -1.0)];
    input.tap(0.0, 0.0);
    orchestrator.run_frame().unwrap();
    assert!(orchestrator.session().anchors.is_empty());
    assert_eq!(
        orchestrator.state().turn(),
        TurnState::WaitingForPlayer1Placement
    );

    // Nearest hit is a feature point
    orchestrator.session_mut().hits = vec![point_hit(), plane_hit(0.25, -0.75)];
    input.tap(0.0, 0.0);
    orchestrator.run_frame().unwrap();
    assert!(orchestrator.session().anchors.is_empty());
}

#[test]
fn test_nearest_hit_inside_polygon_places_cannon() {
    let (mut orchestrator, input) = orchestrator();
    orchestrator.session_mut().hits = vec![plane_hit(0.25, -0.75), plane_hit(-0.25, -1.25)];
    input.tap(0.0, 0.0);
    orchestrator.run_frame().unwrap();

    let anchors = &orchestrator.session().anchors;
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].translation, Vec3::new(0.25, 0.0, -0.75));
}

#[test]
fn test_at_most_one_tap_per_frame() {
    let (mut orchestrator, input) = orchestrator();
    orchestrator.session_mut().hits = vec![plane_hit(0.0, -1.0)];
    input.tap(0.0, 0.0);
    input.tap(1.0, 1.0);

    orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.session().anchors.len(), 1);
    orchestrator.run_frame().unwrap();
    assert_eq!(orchestrator.session().anchors.len(), 2);
}

// ============================================================================
// Tracking loss
// ============================================================================

#[test]
fn test_lost_tracking_draws_background_only() {
    let (mut orchestrator, input) = placed();
    orchestrator.session_mut().camera_lost = true;

    input.tap(0.0, 0.0);
    let plan = orchestrator.run_frame().unwrap();
    assert!(plan.is_background_only());
    assert_eq!(plan.display_uvs, IDENTITY_DISPLAY_UVS);
    // The tap is consumed without a hit test
    assert_eq!(orchestrator.session().hit_tests.get(), 0);

    orchestrator.session_mut().camera_lost = false;
    let plan = orchestrator.run_frame().unwrap();
    assert!(plan.camera.is_some());
    assert_eq!(plan.objects.len(), 2);
}

#[test]
fn test_untracked_anchor_is_not_drawn() {
    let (mut orchestrator, _input) = placed();
    // Anchors discarded by the session are skipped
    orchestrator.session_mut().anchors.clear();
    let plan = orchestrator.run_frame().unwrap();
    assert!(plan.objects.is_empty());
}

// ============================================================================
// Aim and transforms
// ============================================================================

#[test]
fn test_cannon_transform_is_scaled_pose() {
    let (mut orchestrator, _input) = placed();
    let plan = orchestrator.run_frame().unwrap();

    let cannon = plan.object(ObjectSlot::Cannon1).unwrap();
    let expected = Mat4::from_translation(Vec3::new(-0.5, 0.0, -1.0))
        * Mat4::from_scale(Vec3::splat(0.12));
    assert!(cannon.transform.model_matrix().abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_drag_aims_active_player_only() {
    let (mut orchestrator, input) = placed();
    input.drag(10.0, 0.0);

    let aim = &input.aim;
    assert!((aim.angles(Player::One).horizontal - 3.0).abs() < 1e-6);
    assert_eq!(aim.angles(Player::Two).horizontal, 0.0);

    let plan = orchestrator.run_frame().unwrap();
    let cannon1 = plan.object(ObjectSlot::Cannon1).unwrap().transform.model_matrix();
    let cannon2 = plan.object(ObjectSlot::Cannon2).unwrap().transform.model_matrix();
    let expected2 = Mat4::from_translation(Vec3::new(0.5, 0.0, -1.0))
        * Mat4::from_scale(Vec3::splat(0.12));
    assert!(cannon2.abs_diff_eq(expected2, 1e-6));
    assert!(!cannon1.abs_diff_eq(
        Mat4::from_translation(Vec3::new(-0.5, 0.0, -1.0)) * Mat4::from_scale(Vec3::splat(0.12)),
        1e-6
    ));
}

// ============================================================================
// Firing
// ============================================================================

#[test]
fn test_projectile_flight_and_turn_change() {
    let (mut orchestrator, input) = placed();
    input.fire();

    let mut last = 0.0;
    for frame in 1..200 {
        let plan = orchestrator.run_frame().unwrap();
        let projectile = plan
            .object(ObjectSlot::Projectile)
            .unwrap_or_else(|| panic!("projectile missing at frame {frame}"));
        let position = projectile
            .transform
            .model_matrix()
            .transform_point3(Vec3::ZERO);
        // Launched from player one's cannon at (-0.5, 0, -1), lifted 0.1
        let displacement = position.x + 0.5;
        assert!(displacement > last);
        assert!((position.y - 0.1).abs() < 1e-5);
        last = displacement;
        assert_eq!(
            orchestrator.state().phase(),
            GamePhase::ProjectileInFlight {
                fired_by: Player::One
            }
        );
    }

    let plan = orchestrator.run_frame().unwrap();
    assert!(plan.object(ObjectSlot::Projectile).is_none());
    assert_eq!(orchestrator.state().turn(), TurnState::Player2Turn);
    let status = plan.status.unwrap();
    assert_eq!(status.message, StatusMessage::PlayerTurn(Player::Two));
    assert_eq!(
        status.fire_action,
        Some(FireAction {
            player: Player::Two
        })
    );
    assert_eq!(input.aim.active_player(), Player::Two);
}

#[test]
fn test_first_projectile_frame_transform() {
    let (mut orchestrator, input) = placed();
    input.fire();
    let plan = orchestrator.run_frame().unwrap();

    let projectile = plan.object(ObjectSlot::Projectile).unwrap();
    let expected = Mat4::from_translation(Vec3::new(-0.5, 0.0, -1.0))
        * Mat4::from_translation(Vec3::new(0.01, 0.1, 0.0))
        * Mat4::from_scale(Vec3::splat(0.02));
    assert!(projectile.transform.model_matrix().abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_refire_in_flight_rejected() {
    let (mut orchestrator, input) = placed();
    input.fire();
    orchestrator.run_frame().unwrap();

    assert_eq!(orchestrator.fire(), Err(FireRejected::AlreadyInFlight));
    // A rejected request through the input handle leaves the flight intact
    input.fire();
    orchestrator.run_frame().unwrap();
    let projectile = orchestrator.state().projectile().unwrap();
    assert!((projectile.displacement() - 0.02).abs() < 1e-6);
}

#[test]
fn test_fire_before_placement_rejected() {
    let (mut orchestrator, input) = orchestrator();
    assert_eq!(orchestrator.fire(), Err(FireRejected::NoFireAction));

    input.fire();
    let plan = orchestrator.run_frame().unwrap();
    assert!(plan.object(ObjectSlot::Projectile).is_none());
    assert!(orchestrator.state().projectile().is_none());
}

#[test]
fn test_turns_alternate() {
    let (mut orchestrator, input) = placed();
    for expected in [Player::Two, Player::One, Player::Two] {
        input.fire();
        for _ in 0..200 {
            orchestrator.run_frame().unwrap();
        }
        assert_eq!(
            orchestrator.state().phase(),
            GamePhase::PlayerTurn(expected)
        );
    }
}

// ============================================================================
// Lifecycle and failure handling
// ============================================================================

#[test]
fn test_resume_and_pause_are_idempotent() {
    let (mut orchestrator, _input) = orchestrator();
    orchestrator.on_resume().unwrap();
    assert_eq!(orchestrator.session().configure_calls, 1);
    assert_eq!(orchestrator.session().resume_calls, 1);

    orchestrator.on_pause();
    orchestrator.on_pause();
    assert_eq!(orchestrator.session().pause_calls, 1);
    assert!(!orchestrator.is_resumed());

    orchestrator.on_resume().unwrap();
    assert!(orchestrator.is_resumed());
    assert_eq!(orchestrator.session().configure_calls, 1);
    assert_eq!(orchestrator.session().resume_calls, 2);
}

#[test]
fn test_resume_republishes_status() {
    let (mut orchestrator, _input) = orchestrator();
    assert!(orchestrator.run_frame().unwrap().status.is_some());
    assert!(orchestrator.run_frame().unwrap().status.is_none());

    orchestrator.on_pause();
    orchestrator.on_resume().unwrap();
    assert!(orchestrator.run_frame().unwrap().status.is_some());
}

#[test]
fn test_draw_frame_skips_failures() {
    let (mut orchestrator, _input) = orchestrator();
    let mut sink = RecordingSink::default();

    assert!(orchestrator.on_draw_frame(&mut sink));
    assert_eq!(sink.plans.len(), 1);

    orchestrator.session_mut().fail_update = true;
    assert!(!orchestrator.on_draw_frame(&mut sink));
    assert_eq!(sink.plans.len(), 1);

    orchestrator.session_mut().fail_update = false;
    sink.fail = true;
    assert!(!orchestrator.on_draw_frame(&mut sink));

    sink.fail = false;
    assert!(orchestrator.on_draw_frame(&mut sink));
    assert_eq!(sink.plans.len(), 2);
}

#[test]
fn test_draw_frame_requires_resume() {
    let session = ScriptedSession::default();
    let (mut orchestrator, _input) = FrameOrchestrator::new(session, CannonsConfig::default());
    let mut sink = RecordingSink::default();
    assert!(!orchestrator.on_draw_frame(&mut sink));
    assert!(sink.plans.is_empty());
}

#[test]
fn test_tap_queue_overflow_through_handle() {
    let (_orchestrator, input) = orchestrator();
    let accepted = (0..20).filter(|&i| input.tap(i as f32, 0.0)).count();
    assert_eq!(accepted, 16);
}

// ============================================================================
// End to end with the simulated session
// ============================================================================

#[test]
fn test_simulated_session_full_round() {
    let session = SimulatedSession::create(DeviceProfile::default())
        .unwrap()
        .with_detection_delay(2);
    let (mut orchestrator, input) = FrameOrchestrator::new(session, CannonsConfig::default());
    orchestrator.set_camera_texture(CameraTextureHandle(1));
    orchestrator.on_surface_changed(800, 600);
    orchestrator.on_resume().unwrap();

    let mut sink = RecordingSink::default();
    for _ in 0..3 {
        assert!(orchestrator.on_draw_frame(&mut sink));
    }
    assert_eq!(
        orchestrator.state().turn(),
        TurnState::WaitingForPlayer1Placement
    );
    assert!(sink.plans.iter().all(|plan| plan.camera_image.is_some()));

    input.tap(380.0, 320.0);
    orchestrator.on_draw_frame(&mut sink);
    input.tap(420.0, 320.0);
    orchestrator.on_draw_frame(&mut sink);
    assert_eq!(orchestrator.state().turn(), TurnState::Player1Turn);

    input.fire();
    for _ in 0..200 {
        orchestrator.on_draw_frame(&mut sink);
    }
    assert_eq!(orchestrator.state().turn(), TurnState::Player2Turn);
    assert_eq!(
        orchestrator.status().to_string(),
        "Player two's turn. [Fire!]"
    );
}
