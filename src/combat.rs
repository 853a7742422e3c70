/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;

use crate::actors::{Dead, Health, Ragdoll};
use crate::ai::Enemy;
use crate::animation::{AttackEnded, AttackStageStarted};
use crate::audio::{PlaySfx, SfxKind};
use crate::camera::{HitStopRequest, ShakeRequest};
use crate::player::Player;
use crate::ui::HudState;

const HIT_DAMAGE: f32 = 10.0;
const BLADE_REACH: f32 = 1.0;
const ENEMY_BODY_RADIUS: f32 = 0.5;

// Hit feedback presets
const HIT_SHAKE_DURATION: f32 = 0.15;
const HIT_SHAKE_MAGNITUDE: f32 = 0.05;
const HIT_STOP_DURATION: f32 = 0.1;
const HIT_STOP_SCALE: f32 = 0.1;

#[derive(Clone, Copy, Debug, Message)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
}

/// Broadcast once when the enemy dies; the UI banner listens
#[derive(Clone, Copy, Debug, Message)]
pub struct PlayerWin;

/// Weapon contact volume, live only while an attack clip plays
#[derive(Component, Debug)]
pub struct SwordHitbox {
    pub active: bool,
    /// One hit per swing; latched on first contact
    pub latched: bool,
    pub radius: f32,
}

impl Default for SwordHitbox {
    fn default() -> Self {
        Self {
            active: false,
            latched: false,
            radius: 0.6,
        }
    }
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DamageDealt>()
            .add_message::<PlayerWin>()
            .add_systems(
                Update,
                (sword_hitbox_window, sword_overlap, apply_damage).chain(),
            );
    }
}

/// The relay opens and closes the contact window exactly where the
/// authored clips put their notifications
fn sword_hitbox_window(
    mut starts: MessageReader<AttackStageStarted>,
    mut ends: MessageReader<AttackEnded>,
    mut q: Query<(&mut SwordHitbox, &Transform), With<Player>>,
    mut sfx: MessageWriter<PlaySfx>,
) {
    for m in starts.read() {
        if let Ok((mut hitbox, tf)) = q.get_mut(m.actor) {
            hitbox.active = true;
            hitbox.latched = false;
            sfx.write(PlaySfx {
                kind: SfxKind::SwordSwing,
                pos: tf.translation,
            });
        }
    }
    for m in ends.read() {
        if let Ok((mut hitbox, _)) = q.get_mut(m.actor) {
            hitbox.active = false;
        }
    }
}

fn sword_overlap(
    mut q_player: Query<(&Transform, &mut SwordHitbox), (With<Player>, Without<Dead>)>,
    q_enemy: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
    mut damage: MessageWriter<DamageDealt>,
) {
    let Ok((player_tf, mut hitbox)) = q_player.single_mut() else {
        return;
    };
    if !hitbox.active || hitbox.latched {
        return;
    }

    for (enemy, enemy_tf) in q_enemy.iter() {
        if blade_contact(player_tf, enemy_tf.translation, hitbox.radius) {
            damage.write(DamageDealt {
                target: enemy,
                amount: HIT_DAMAGE,
            });
            hitbox.latched = true;
            break;
        }
    }
}

/// Blade tip vs enemy body, both as spheres
fn blade_contact(player_tf: &Transform, enemy_pos: Vec3, blade_radius: f32) -> bool {
    let forward = player_tf.rotation * Vec3::NEG_Z;
    let blade = player_tf.translation + forward * BLADE_REACH;
    blade.distance(enemy_pos) <= blade_radius + ENEMY_BODY_RADIUS
}

/// Applies queued damage, drives the hit feedback, and runs the kill
/// transition exactly once. Hits on a dead enemy fall through the
/// `Without<Dead>` filter and do nothing.
fn apply_damage(
    mut commands: Commands,
    mut damage: MessageReader<DamageDealt>,
    mut q_enemy: Query<(Entity, &mut Health, &Transform), (With<Enemy>, Without<Dead>)>,
    mut hud: ResMut<HudState>,
    mut shake: MessageWriter<ShakeRequest>,
    mut hit_stop: MessageWriter<HitStopRequest>,
    mut sfx: MessageWriter<PlaySfx>,
    mut win: MessageWriter<PlayerWin>,
) {
    for ev in damage.read() {
        let Ok((entity, mut health, tf)) = q_enemy.get_mut(ev.target) else {
            continue;
        };

        health.damage(ev.amount);
        hud.enemy_hp_ratio = health.ratio();

        sfx.write(PlaySfx {
            kind: SfxKind::SwordHit,
            pos: tf.translation,
        });
        shake.write(ShakeRequest {
            duration: HIT_SHAKE_DURATION,
            magnitude: HIT_SHAKE_MAGNITUDE,
        });
        hit_stop.write(HitStopRequest {
            duration: HIT_STOP_DURATION,
            scale: HIT_STOP_SCALE,
        });

        if health.depleted() {
            // Terminal: AI, animation and the health bar all key off Dead;
            // the physics side takes over the pose via Ragdoll
            commands.entity(entity).insert((Dead, Ragdoll));
            hud.enemy_alive = false;

            sfx.write(PlaySfx {
                kind: SfxKind::EnemyDeath,
                pos: tf.translation,
            });
            win.write(PlayerWin);
            info!("Enemy down, broadcasting win");
        }
    }
}
