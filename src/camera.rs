/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::window::{CursorGrabMode, CursorOptions};
use rand::RngExt;

use crate::player::{Player, PlayerMotion};
use crate::world::{Obstacle, WorldStatic};

const FOCUS_DISTANCE: f32 = 10.0;
// Occluders keep the camera this far in front of the hit point
const OCCLUSION_PULL_IN: f32 = 1.0;
// ~ +/- 88 Degrees
const PITCH_LIMIT: f32 = 1.54;

/// Orbit rig state. Injected into whoever needs camera facts (the
/// player faces `focus_point`) instead of living behind a global.
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    pub focus_point: Vec3,
    /// Rotation-root offset above the tracked actor
    pub pivot_offset: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
    pub follow_speed: f32,
    pub zoom_speed: f32,
    pub target_arm_length: f32,
    pub current_arm_length: f32,
    pub arm_length_min: f32,
    pub arm_length_max: f32,
    pub shake_offset: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        let arm_length_min = 2.0;
        let arm_length_max = 8.0;
        Self {
            focus_point: Vec3::ZERO,
            pivot_offset: Vec3::new(0.0, 1.5, 0.0),
            yaw: 0.0,
            pitch: -0.25,
            sensitivity: 0.002,
            follow_speed: 1.0,
            zoom_speed: 4.0,
            // Start halfway through the zoom range
            target_arm_length: (arm_length_min + arm_length_max) / 2.0,
            current_arm_length: (arm_length_min + arm_length_max) / 2.0,
            arm_length_min,
            arm_length_max,
            shake_offset: Vec3::ZERO,
        }
    }
}

#[derive(Component)]
pub struct CameraPositionRoot;

#[derive(Component)]
pub struct CameraRotationRoot;

#[derive(Component)]
pub struct RigCamera;

// ---------- Transient effects ----------
// Staged routines with explicit elapsed/duration state, advanced once
// per frame. A second request simply overwrites the running one.

#[derive(Clone, Copy, Debug, Message)]
pub struct ShakeRequest {
    pub duration: f32,
    pub magnitude: f32,
}

#[derive(Clone, Copy, Debug, Message)]
pub struct HitStopRequest {
    pub duration: f32,
    pub scale: f32,
}

#[derive(Resource, Debug, Default)]
pub struct CameraShake {
    pub active: bool,
    pub elapsed: f32,
    pub duration: f32,
    pub magnitude: f32,
}

impl CameraShake {
    pub fn start(&mut self, duration: f32, magnitude: f32) {
        self.active = true;
        self.elapsed = 0.0;
        self.duration = duration;
        self.magnitude = magnitude;
    }

    /// One frame of shake; returns the offset to apply, resetting to
    /// zero on the frame the duration elapses
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if !self.active {
            return Vec3::ZERO;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
            return Vec3::ZERO;
        }
        Vec3::ONE * rand::rng().random_range(-1.0..=1.0_f32) * self.magnitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum HitStopPhase {
    #[default]
    Inactive,
    Hold {
        left: f32,
    },
    Ramp,
}

/// Time-dilation routine: hold virtual time at a crawl, then ramp the
/// scale back to 1 at 2x real time
#[derive(Resource, Debug, Default)]
pub struct HitStop {
    phase: HitStopPhase,
}

impl HitStop {
    pub fn active(&self) -> bool {
        self.phase != HitStopPhase::Inactive
    }
}

pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .init_resource::<CameraShake>()
            .init_resource::<HitStop>()
            .add_message::<ShakeRequest>()
            .add_message::<HitStopRequest>()
            .add_systems(Startup, setup_camera_rig)
            .add_systems(
                Update,
                (
                    start_transient_effects,
                    tick_camera_shake,
                    tick_hit_stop,
                    camera_rotation,
                    camera_zoom_and_follow,
                )
                    .chain(),
            );
    }
}

fn setup_camera_rig(mut commands: Commands, rig: Res<CameraRig>) {
    commands
        .spawn((CameraPositionRoot, Transform::default(), Visibility::default()))
        .with_children(|root| {
            root.spawn((
                CameraRotationRoot,
                Transform::from_translation(rig.pivot_offset),
                Visibility::default(),
            ))
            .with_children(|rot| {
                rot.spawn((
                    RigCamera,
                    Camera3d::default(),
                    Transform::from_translation(Vec3::Z * rig.current_arm_length),
                ));
            });
        });
}

fn start_transient_effects(
    mut shake_requests: MessageReader<ShakeRequest>,
    mut stop_requests: MessageReader<HitStopRequest>,
    mut shake: ResMut<CameraShake>,
    mut hit_stop: ResMut<HitStop>,
    mut virt: ResMut<Time<Virtual>>,
) {
    for req in shake_requests.read() {
        shake.start(req.duration, req.magnitude);
    }
    for req in stop_requests.read() {
        hit_stop.phase = HitStopPhase::Hold { left: req.duration };
        virt.set_relative_speed(req.scale);
    }
}

fn tick_camera_shake(time: Res<Time>, mut shake: ResMut<CameraShake>, mut rig: ResMut<CameraRig>) {
    rig.shake_offset = shake.advance(time.delta_secs());
}

fn tick_hit_stop(real: Res<Time<Real>>, mut virt: ResMut<Time<Virtual>>, mut stop: ResMut<HitStop>) {
    let dt = real.delta_secs();

    match stop.phase {
        HitStopPhase::Inactive => {}
        HitStopPhase::Hold { left } => {
            let left = left - dt;
            if left <= 0.0 {
                stop.phase = HitStopPhase::Ramp;
            } else {
                stop.phase = HitStopPhase::Hold { left };
            }
        }
        HitStopPhase::Ramp => {
            let next = ramp_speed(virt.relative_speed(), dt);
            virt.set_relative_speed(next);
            if next >= 1.0 {
                stop.phase = HitStopPhase::Inactive;
            }
        }
    }
}

/// Recovery curve back to real time, 2x per second, capped at 1
fn ramp_speed(current: f32, real_dt: f32) -> f32 {
    (current + real_dt * 2.0).min(1.0)
}

fn camera_rotation(
    cursor_options: Single<&CursorOptions>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut rig: ResMut<CameraRig>,
    mut q_rot: Query<&mut Transform, With<CameraRotationRoot>>,
) {
    if cursor_options.grab_mode == CursorGrabMode::Locked {
        let delta = mouse_motion.delta;
        rig.yaw -= delta.x * rig.sensitivity;
        rig.pitch = (rig.pitch - delta.y * rig.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    let Ok(mut tf) = q_rot.single_mut() else {
        return;
    };
    tf.rotation = Quat::from_euler(EulerRot::YXZ, rig.yaw, rig.pitch, 0.0);
    tf.translation = rig.pivot_offset;
}

#[allow(clippy::type_complexity)]
fn camera_zoom_and_follow(
    time: Res<Time>,
    scroll: Res<AccumulatedMouseScroll>,
    mut rig: ResMut<CameraRig>,
    obstacles: Query<(&GlobalTransform, &Obstacle), With<WorldStatic>>,
    q_player: Query<
        (&Transform, &PlayerMotion),
        (With<Player>, Without<CameraPositionRoot>, Without<RigCamera>),
    >,
    mut q_root: Query<
        (&mut Transform, &GlobalTransform),
        (With<CameraPositionRoot>, Without<RigCamera>, Without<Player>),
    >,
    mut q_cam: Query<
        (&mut Transform, &GlobalTransform),
        (With<RigCamera>, Without<CameraPositionRoot>, Without<Player>),
    >,
) {
    let dt = time.delta_secs();
    let Ok((mut root_tf, root_gt)) = q_root.single_mut() else {
        return;
    };
    let Ok((mut cam_tf, cam_gt)) = q_cam.single_mut() else {
        return;
    };

    // Scroll steps the desired arm length one unit at a time
    if scroll.delta.y > 0.0 {
        rig.target_arm_length -= 1.0;
    } else if scroll.delta.y < 0.0 {
        rig.target_arm_length += 1.0;
    }
    rig.target_arm_length = rig
        .target_arm_length
        .clamp(rig.arm_length_min, rig.arm_length_max);

    // Anything world-static between the pivot and the camera shortens
    // the arm so the view never clips through geometry
    let pivot = root_gt.translation();
    let cam_pos = cam_gt.translation();
    if let Some(hit_dist) = nearest_segment_hit(pivot, cam_pos, &obstacles) {
        rig.target_arm_length = hit_dist - OCCLUSION_PULL_IN;
    }

    // Exponential ease toward the target length
    rig.current_arm_length += (rig.target_arm_length - rig.current_arm_length)
        * (rig.zoom_speed * dt).min(1.0);

    // Follow speed scales with how fast the tracked actor is moving
    if let Ok((player_tf, motion)) = q_player.single() {
        let follow = ((rig.follow_speed + motion.speed) * dt).min(1.0);
        root_tf.translation = root_tf.translation.lerp(player_tf.translation, follow);
    }

    cam_tf.translation = Vec3::Z * rig.current_arm_length + rig.shake_offset;

    // Focus lands in front of the lens; the player faces it
    let forward = cam_gt.rotation() * Vec3::NEG_Z;
    rig.focus_point = cam_pos + forward * FOCUS_DISTANCE;
}

fn nearest_segment_hit(
    from: Vec3,
    to: Vec3,
    obstacles: &Query<(&GlobalTransform, &Obstacle), With<WorldStatic>>,
) -> Option<f32> {
    let mut nearest: Option<f32> = None;
    for (gt, obstacle) in obstacles.iter() {
        if let Some(d) = segment_hits_sphere(from, to, gt.translation(), obstacle.radius) {
            if nearest.is_none_or(|n| d < n) {
                nearest = Some(d);
            }
        }
    }
    nearest
}

/// Distance along the segment to the first intersection with a sphere,
/// if any. The camera occlusion cast treats obstacles as bounding
/// spheres; good enough for pillar-sized geometry.
pub fn segment_hits_sphere(from: Vec3, to: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let seg = to - from;
    let len = seg.length();
    if len < 1e-6 {
        return None;
    }
    let dir = seg / len;
    let oc = from - center;

    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    // Nearest root in front of the segment start
    let t = if -b - sqrt_disc >= 0.0 {
        -b - sqrt_disc
    } else {
        -b + sqrt_disc
    };
    if t < 0.0 || t > len {
        return None;
    }
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_hits_sphere_straight_through() {
        let hit = segment_hits_sphere(
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            1.0,
        );
        assert_eq!(hit, Some(4.0));
    }

    #[test]
    fn test_segment_misses_offset_sphere() {
        let hit = segment_hits_sphere(
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(5.0, 3.0, 0.0),
            1.0,
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_segment_stops_short_of_sphere() {
        // Sphere sits past the end of the segment
        let hit = segment_hits_sphere(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            1.0,
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_shake_runs_then_resets() {
        let mut shake = CameraShake::default();
        shake.start(0.15, 0.05);
        assert!(shake.active);

        // Mid-shake frames produce bounded offsets
        let offset = shake.advance(0.05);
        assert!(shake.active);
        assert!(offset.length() <= Vec3::ONE.length() * 0.05 + 1e-6);

        // Crossing the duration resets the offset and finishes
        let offset = shake.advance(0.2);
        assert_eq!(offset, Vec3::ZERO);
        assert!(!shake.active);

        // Finished routine stays quiet
        assert_eq!(shake.advance(0.1), Vec3::ZERO);
    }

    #[test]
    fn test_shake_restart_overwrites() {
        let mut shake = CameraShake::default();
        shake.start(0.15, 0.05);
        shake.advance(0.1);
        // Second invocation races the first by overwriting it
        shake.start(0.3, 0.2);
        assert_eq!(shake.elapsed, 0.0);
        assert_eq!(shake.duration, 0.3);
    }

    #[test]
    fn test_ramp_speed_recovers_and_caps() {
        let mut speed = 0.1;
        for _ in 0..100 {
            speed = ramp_speed(speed, 1.0 / 60.0);
        }
        assert_eq!(speed, 1.0);

        // Never overshoots
        assert_eq!(ramp_speed(0.99, 1.0), 1.0);
    }
}
