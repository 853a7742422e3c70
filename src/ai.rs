/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;
use rand::RngExt;

use crate::actors::{AttackCommand, Dead, Stamina, TargetLayer};
use crate::animation::{AnimatorParams, AttackStage};

// Decisions run on a coarse ~1 Hz clock; motion and animation stay at
// the fixed physics rate below
const SIM_TICK_SECS: f32 = 1.0;

// Stamina regen per tick, by state
const IDLE_REGEN: f32 = 0.2;
const SEARCH_REGEN: f32 = 0.15;
const ENGAGE_REGEN: f32 = 0.075;

// Safe point handling while too drained to attack: keep the stored
// point while the distance to the target stays inside (NEAR, FAR]
const SAFE_POINT_NEAR: f32 = 0.5;
const SAFE_POINT_FAR: f32 = 5.0;
const SAFE_POINT_RADIUS: f32 = 5.0;

const AGENT_SPEED_TPS: f32 = 2.0;
const ARRIVE_RADIUS: f32 = 0.05;
const ATTACK_DECAY_PER_SEC: f32 = 3.0;

#[derive(Component)]
pub struct Enemy;

/// Detection bands and action costs, per enemy
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyConfig {
    pub attack_range: f32,
    pub engage_range: f32,
    pub search_range: f32,
    pub attack_stamina_cost: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            attack_range: 1.0,
            engage_range: 3.0,
            search_range: 10.0,
            attack_stamina_cost: 0.1,
        }
    }
}

/// Behavior state, recomputed fresh each tick from the distance bands.
/// There is no transition table; the bands ARE the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyState {
    #[default]
    Idle,
    Engage,
    Attack,
    Search,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyAi {
    pub state: EnemyState,
    /// Non-owning reference to the last detected hostile
    pub detected_target: Option<Entity>,
    /// Lateral retreat point; only recomputed outside the reuse band
    pub safe_point: Vec3,
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self {
            state: EnemyState::Idle,
            detected_target: None,
            safe_point: Vec3::ZERO,
        }
    }
}

/// Per-actor simulation pulse. `next_tick` only ever advances, by
/// exactly one time-unit per fired tick, so the cadence stays steady
/// under frame-rate variance and never resets backward.
#[derive(Component, Debug, Clone, Copy)]
pub struct SimClock {
    pub next_tick: f32,
}

/// Owned steering reference for the navigation stand-in. Decoupled from
/// the detected target so "keep distance" can override pursuit.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    Point(Vec3),
    Follow(Entity),
}

pub struct EnemyAiPlugin;

impl Plugin for EnemyAiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, attach_enemy_ai)
            .add_systems(FixedUpdate, (enemy_sim_tick, enemy_agent_move).chain());
    }
}

fn attach_enemy_ai(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    q_new: Query<(Entity, &Transform), (Added<Enemy>, Without<EnemyAi>)>,
) {
    for (e, tf) in q_new.iter() {
        commands.entity(e).insert((
            EnemyAi::default(),
            // First decision lands one time-unit after the actor appears
            SimClock {
                next_tick: time.elapsed_secs() + SIM_TICK_SECS,
            },
            MoveTarget::Point(tf.translation),
        ));
    }
}

/// Advances the per-actor clock and reports whether a tick fires now
fn sim_tick_due(now: f32, clock: &mut SimClock) -> bool {
    if now > clock.next_tick {
        clock.next_tick += SIM_TICK_SECS;
        return true;
    }
    false
}

fn value_in_range(value: f32, min: f32, max: f32) -> bool {
    value >= min && value < max
}

/// Total, non-overlapping classification of distance into behavior
/// bands; every upper bound is exclusive
pub fn classify_distance(distance: f32, cfg: &EnemyConfig) -> EnemyState {
    if value_in_range(distance, 0.0, cfg.attack_range) {
        EnemyState::Attack
    } else if value_in_range(distance, cfg.attack_range, cfg.engage_range) {
        EnemyState::Engage
    } else if value_in_range(distance, cfg.engage_range, cfg.search_range) {
        EnemyState::Search
    } else {
        EnemyState::Idle
    }
}

pub fn enemy_sim_tick(
    time: Res<Time<Fixed>>,
    targets: Query<(Entity, &Transform), (With<TargetLayer>, Without<Enemy>)>,
    mut q: Query<
        (
            &Transform,
            &EnemyConfig,
            &mut SimClock,
            &mut EnemyAi,
            &mut MoveTarget,
            &mut Stamina,
            &mut AttackCommand,
            &AttackStage,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let now = time.elapsed_secs();

    for (tf, cfg, mut clock, mut ai, mut move_target, mut stamina, mut command, stage) in
        q.iter_mut()
    {
        if !sim_tick_due(now, &mut clock) {
            continue;
        }

        // First overlapping hostile inside the search radius; query order,
        // not nearest (kept faithful to the original behavior)
        let detected = targets
            .iter()
            .find(|(_, t)| t.translation.distance(tf.translation) <= cfg.search_range)
            .map(|(e, t)| (e, t.translation));

        actor_tick(
            tf,
            cfg,
            &mut ai,
            &mut stamina,
            &mut command,
            stage.0,
            &mut move_target,
            detected,
        );
    }
}

/// One AI decision: detection, distance classification, state action
#[allow(clippy::too_many_arguments)]
fn actor_tick(
    tf: &Transform,
    cfg: &EnemyConfig,
    ai: &mut EnemyAi,
    stamina: &mut Stamina,
    command: &mut AttackCommand,
    stage: i32,
    move_target: &mut MoveTarget,
    detected: Option<(Entity, Vec3)>,
) {
    // Nothing in range: keep previous state and target for this tick
    let Some((target, target_pos)) = detected else {
        return;
    };
    ai.detected_target = Some(target);

    let distance = tf.translation.distance(target_pos);
    ai.state = classify_distance(distance, cfg);

    match ai.state {
        EnemyState::Idle => {
            stamina.update(IDLE_REGEN);
        }
        EnemyState::Search => {
            stamina.update(SEARCH_REGEN);
            *move_target = MoveTarget::Follow(target);
        }
        EnemyState::Engage => {
            stamina.update(ENGAGE_REGEN);
            engage_steer(tf, cfg, ai, stamina, move_target, target, target_pos);
        }
        EnemyState::Attack => {
            action_attack(
                tf, cfg, ai, stamina, command, stage, move_target, target, target_pos,
            );
        }
    }
}

/// Engage steering: pursue when there is stamina to spend, otherwise
/// hold a lateral safe point and keep distance
fn engage_steer(
    tf: &Transform,
    cfg: &EnemyConfig,
    ai: &mut EnemyAi,
    stamina: &Stamina,
    move_target: &mut MoveTarget,
    target: Entity,
    target_pos: Vec3,
) {
    if stamina.can_afford(cfg.attack_stamina_cost) {
        *move_target = MoveTarget::Follow(target);
        return;
    }

    // Recompute only when the distance leaves the reuse band; inside it
    // the stored point stands, which keeps the retreat from jittering
    let distance = tf.translation.distance(target_pos);
    if distance <= SAFE_POINT_NEAR || distance > SAFE_POINT_FAR {
        let right = tf.rotation * Vec3::X;
        let t = rand::rng().random_range(0.0..=1.0_f32);
        ai.safe_point = tf.translation + (-right).lerp(right, t) * SAFE_POINT_RADIUS;
    }

    *move_target = MoveTarget::Point(ai.safe_point);
}

/// Attack action: spend stamina and advance the combo, or abort into
/// engage steering when too drained to commit
#[allow(clippy::too_many_arguments)]
fn action_attack(
    tf: &Transform,
    cfg: &EnemyConfig,
    ai: &mut EnemyAi,
    stamina: &mut Stamina,
    command: &mut AttackCommand,
    stage: i32,
    move_target: &mut MoveTarget,
    target: Entity,
    target_pos: Vec3,
) {
    if !stamina.can_afford(cfg.attack_stamina_cost) {
        command.0 = 0.0;
        engage_steer(tf, cfg, ai, stamina, move_target, target, target_pos);
        return;
    }

    stamina.update(-cfg.attack_stamina_cost);
    command.bump(stage);
}

/// Fixed-rate motion glue under the 1 Hz decisions: steer toward the
/// move target, face the detected hostile, feed the animator
pub fn enemy_agent_move(
    time: Res<Time<Fixed>>,
    targets: Query<&Transform, (With<TargetLayer>, Without<Enemy>)>,
    mut q: Query<
        (
            &mut Transform,
            &EnemyAi,
            &MoveTarget,
            &mut AnimatorParams,
            &mut AttackCommand,
        ),
        (With<Enemy>, Without<Dead>),
    >,
) {
    let dt = time.delta_secs();

    for (mut tf, ai, move_target, mut params, mut command) in q.iter_mut() {
        let dest = match move_target {
            MoveTarget::Point(p) => *p,
            MoveTarget::Follow(e) => targets
                .get(*e)
                .map(|t| t.translation)
                .unwrap_or(tf.translation),
        };

        let mut to_dest = dest - tf.translation;
        to_dest.y = 0.0;
        let distance = to_dest.length();

        let velocity = if distance > ARRIVE_RADIUS {
            to_dest / distance * AGENT_SPEED_TPS
        } else {
            Vec3::ZERO
        };
        tf.translation += velocity * dt;

        // Locomotion blend inputs; forward axis smoothed the way the
        // blend tree expects, strafe written raw
        let forward = velocity.x.round();
        params.movement_y += (forward - params.movement_y) * (3.0 * dt).min(1.0);
        params.movement_x = -velocity.z;

        // Combo accumulator drains between attack ticks
        command.decay(ATTACK_DECAY_PER_SEC, dt);
        params.attack = command.0;

        // Face the detected hostile, yaw only
        if let Some(target) = ai.detected_target
            && let Ok(t) = targets.get(target)
        {
            let mut look = t.translation;
            look.y = tf.translation.y;
            if look.distance_squared(tf.translation) > 1e-6 {
                tf.look_at(look, Vec3::Y);
            }
        }
    }
}
