/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::actors::{AttackCommand, Dead};
use crate::animation::{AnimatorParams, AttackStage, JumpEnded};
use crate::camera::CameraRig;

// Grounded capsule vs the tucked-in jump capsule
const CAPSULE_HEIGHT_STANDING: f32 = 2.0;
const CAPSULE_HEIGHT_JUMPING: f32 = 1.0;
const CAPSULE_CENTER_JUMPING: Vec3 = Vec3::new(0.0, 0.5, 0.0);

#[derive(Component)]
pub struct Player;

#[derive(Resource)]
pub struct PlayerSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub acceleration: f32,
    pub animation_switch_speed: f32,
    /// Combo accumulator drain, units per second
    pub attack_decay: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 4.5,
            acceleration: 1.0,
            animation_switch_speed: 4.0,
            attack_decay: 2.0,
        }
    }
}

/// Smoothed locomotion state; direction is in input space (x = strafe,
/// z = forward) and gets mapped through the facing basis on move
#[derive(Component, Debug, Default)]
pub struct PlayerMotion {
    pub speed: f32,
    pub direction: Vec3,
    pub running: bool,
}

/// Collision-body stand-in handed to the physics side: the jump clip
/// tucks the capsule and cuts gravity until the landing notification
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerBody {
    pub gravity: bool,
    pub capsule_height: f32,
    pub capsule_center: Vec3,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            gravity: true,
            capsule_height: CAPSULE_HEIGHT_STANDING,
            capsule_center: Vec3::ZERO,
        }
    }
}

// Left Click to Lock/Hide Cursor, Esc to Release
pub fn grab_mouse(
    mut cursor_options: Single<&mut CursorOptions>,
    mouse: Res<ButtonInput<MouseButton>>,
    key: Res<ButtonInput<KeyCode>>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    }
    if key.just_pressed(KeyCode::Escape) {
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    }
}

/// Attack and jump edges plus the run modifier. The combo mirror of the
/// enemy's attack action: same accumulator, same stage clamp, but fed by
/// click edges and drained continuously.
pub fn player_input(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<PlayerSettings>,
    mut q: Query<
        (
            &mut PlayerMotion,
            &mut PlayerBody,
            &mut AttackCommand,
            &mut AnimatorParams,
            &AttackStage,
        ),
        (With<Player>, Without<Dead>),
    >,
) {
    let Ok((mut motion, mut body, mut command, mut params, stage)) = q.single_mut() else {
        return;
    };

    motion.running = keys.pressed(KeyCode::ShiftLeft);

    if keys.just_pressed(KeyCode::Space) && body.gravity {
        // One-shot trigger; the clip driver answers with JumpStarted
        params.set_jump_trigger();
        body.gravity = false;
        body.capsule_height = CAPSULE_HEIGHT_JUMPING;
        body.capsule_center = CAPSULE_CENTER_JUMPING;
    }

    if mouse.just_pressed(MouseButton::Left) {
        command.bump(stage.0);
    }

    if command.0 > 0.0 {
        command.decay(settings.attack_decay, time.delta_secs());
        params.attack = command.0;
    }
}

/// Landing notification restores the grounded body
pub fn on_jump_end(
    mut jump_ends: MessageReader<JumpEnded>,
    mut q: Query<&mut PlayerBody, With<Player>>,
) {
    for m in jump_ends.read() {
        if let Ok(mut body) = q.get_mut(m.actor) {
            body.capsule_height = CAPSULE_HEIGHT_STANDING;
            body.capsule_center = Vec3::ZERO;
            body.gravity = true;
        }
    }
}

pub fn player_move(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<PlayerSettings>,
    rig: Res<CameraRig>,
    mut q: Query<
        (
            &mut Transform,
            &mut PlayerMotion,
            &mut AnimatorParams,
            &AttackStage,
        ),
        (With<Player>, Without<Dead>),
    >,
) {
    let Ok((mut transform, mut motion, mut params, stage)) = q.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    // Raw input axes, doubled while running
    let run_mul = if motion.running { 2.0 } else { 1.0 };
    let mut target_dir = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        target_dir.z += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        target_dir.z -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        target_dir.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        target_dir.x -= 1.0;
    }
    target_dir *= run_mul;

    // Smooth the blend-space direction for the animator
    motion.direction = motion
        .direction
        .lerp(target_dir, (settings.animation_switch_speed * dt).min(1.0));
    params.movement_x = motion.direction.x;
    params.movement_y = motion.direction.z;

    // Speed ramps toward the walk/run target, then gets zeroed outright
    // while any attack clip is playing (no locomotion mid-swing)
    let target_speed = if motion.running {
        settings.run_speed
    } else {
        settings.walk_speed
    };
    let attack_gate = attack_speed_gate(stage.0);
    motion.speed =
        (motion.speed + (target_speed - motion.speed) * (settings.acceleration * dt).min(1.0))
            * attack_gate;

    // Face the camera focus point, yaw only
    let mut focus = rig.focus_point;
    focus.y = transform.translation.y;
    if focus.distance_squared(transform.translation) > 1e-6 {
        transform.look_at(focus, Vec3::Y);
    }

    // Move along the facing basis
    let forward = transform.rotation * Vec3::NEG_Z;
    let right = transform.rotation * Vec3::X;
    let move_dir = motion.direction.x * right + motion.direction.z * forward;
    let step = move_dir * motion.speed * dt;
    transform.translation += step;
}

/// Locomotion multiplier: zero while any attack clip is playing
fn attack_speed_gate(stage: i32) -> f32 {
    if stage == 0 { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_defaults_grounded() {
        let body = PlayerBody::default();
        assert!(body.gravity);
        assert_eq!(body.capsule_height, CAPSULE_HEIGHT_STANDING);
        assert_eq!(body.capsule_center, Vec3::ZERO);
    }

    #[test]
    fn test_attack_gate_zeroes_speed() {
        assert_eq!(attack_speed_gate(0), 1.0);
        for stage in 1..=3 {
            assert_eq!(attack_speed_gate(stage), 0.0);
        }
    }
}
