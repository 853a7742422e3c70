use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use duskblade::actors::{AttackCommand, Dead, Health, Stamina, TargetLayer};
use duskblade::ai::{Enemy, EnemyAi, EnemyAiPlugin, EnemyConfig, EnemyState, MoveTarget};
use duskblade::animation::{AnimatorParams, AttackEnded, AttackStage, AttackStageStarted};
use duskblade::audio::PlaySfx;
use duskblade::camera::{HitStopRequest, ShakeRequest};
use duskblade::combat::{CombatPlugin, DamageDealt};
use duskblade::ui::HudState;

const STEP: Duration = Duration::from_millis(50);

/// Headless app ticking on a fixed 50 ms wall clock.
fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(STEP))
        .insert_resource(Time::<Fixed>::from_seconds(1.0 / 60.0))
        .init_resource::<HudState>()
        .add_message::<PlaySfx>()
        .add_message::<ShakeRequest>()
        .add_message::<HitStopRequest>()
        .add_message::<AttackStageStarted>()
        .add_message::<AttackEnded>()
        .add_plugins((EnemyAiPlugin, CombatPlugin));
    app
}

fn spawn_enemy(app: &mut App, pos: Vec3, stamina: Stamina) -> Entity {
    app.world_mut()
        .spawn((
            Enemy,
            Health::new(100.0),
            stamina,
            EnemyConfig::default(),
            AttackCommand::default(),
            AttackStage::default(),
            AnimatorParams::default(),
            Transform::from_translation(pos),
        ))
        .id()
}

fn spawn_target(app: &mut App, pos: Vec3) -> Entity {
    app.world_mut()
        .spawn((TargetLayer, Transform::from_translation(pos)))
        .id()
}

fn run_secs(app: &mut App, secs: f32) {
    let steps = (secs / STEP.as_secs_f32()).ceil() as u32;
    for _ in 0..steps {
        app.update();
    }
}

#[test]
fn search_band_regens_and_follows() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, Stamina { cur: 0.0, max: 1.0 });
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -9.5));

    // Three and a quarter seconds: decisions land on the 1 Hz clock,
    // so that is 3 ticks of Search regen at 0.15 each (give or take one
    // tick of scheduling slack)
    run_secs(&mut app, 3.25);

    let ai = app.world().get::<EnemyAi>(enemy).unwrap();
    assert_eq!(ai.state, EnemyState::Search);
    assert_eq!(ai.detected_target, Some(target));
    assert_eq!(
        *app.world().get::<MoveTarget>(enemy).unwrap(),
        MoveTarget::Follow(target)
    );

    let stamina = app.world().get::<Stamina>(enemy).unwrap();
    assert!(
        stamina.cur >= 0.29 && stamina.cur <= 0.46,
        "expected 2-3 ticks of search regen, got {}",
        stamina.cur
    );

    // Pursuit actually closes distance
    let tf = app.world().get::<Transform>(enemy).unwrap();
    assert!(tf.translation.distance(Vec3::new(0.0, 0.0, -9.5)) < 9.5);
}

#[test]
fn adjacent_enemy_spends_stamina_attacking() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, Stamina::new(1.0));
    spawn_target(&mut app, Vec3::new(0.0, 0.0, -0.5));

    run_secs(&mut app, 3.25);

    let ai = app.world().get::<EnemyAi>(enemy).unwrap();
    assert_eq!(ai.state, EnemyState::Attack);

    // Each attack tick costs 0.1; the combo accumulator was bumped and
    // is draining between ticks
    let stamina = app.world().get::<Stamina>(enemy).unwrap();
    assert!(
        stamina.cur >= 0.55 && stamina.cur < 1.0,
        "expected attack ticks to spend stamina, got {}",
        stamina.cur
    );
}

#[test]
fn lethal_damage_kills_exactly_once() {
    let mut app = headless_app();
    let enemy = app
        .world_mut()
        .spawn((
            Enemy,
            Health {
                cur: 10.0,
                max: 100.0,
            },
            Stamina::new(1.0),
            EnemyConfig::default(),
            AttackCommand::default(),
            AttackStage::default(),
            AnimatorParams::default(),
            Transform::from_translation(Vec3::ZERO),
        ))
        .id();

    app.update();

    app.world_mut().write_message(DamageDealt {
        target: enemy,
        amount: 10.0,
    });
    app.update();

    assert!(app.world().get::<Dead>(enemy).is_some());
    let hud = app.world().resource::<HudState>();
    assert!(!hud.enemy_alive);
    assert_eq!(hud.enemy_hp_ratio, 0.0);

    // A late hit on the corpse is a no-op
    app.world_mut().write_message(DamageDealt {
        target: enemy,
        amount: 10.0,
    });
    app.update();

    let health = app.world().get::<Health>(enemy).unwrap();
    assert_eq!(health.cur, 0.0);
    assert!(!app.world().resource::<HudState>().enemy_alive);
}

#[test]
fn nonlethal_damage_updates_hud_ratio() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, Stamina::new(1.0));

    app.update();
    app.world_mut().write_message(DamageDealt {
        target: enemy,
        amount: 10.0,
    });
    app.update();

    let hud = app.world().resource::<HudState>();
    assert!(hud.enemy_alive);
    assert!((hud.enemy_hp_ratio - 0.9).abs() < 1e-6);
    assert!(app.world().get::<Dead>(enemy).is_none());
}
