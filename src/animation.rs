/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;

use crate::actors::Dead;

// Combo chains are authored as three clips; stage 0 means locomotion
pub const MAX_ATTACK_STAGE: i32 = 3;

const ATTACK_CLIP_SECS: f32 = 0.6;
const JUMP_CLIP_SECS: f32 = 0.8;

/// Attack clip currently playing on an actor (0 = none, 1..=3 = combo stage)
///
/// This is the only read-back the animator offers; everything else is
/// fire-and-forget notifications.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AttackStage(pub i32);

// ---------- Relay messages ----------
// One channel per clip-defined notification point. Listeners read in
// registration order; zero listeners is a silent no-op.

#[derive(Clone, Copy, Debug, Message)]
pub struct AttackStageStarted {
    pub actor: Entity,
    pub stage: i32,
}

#[derive(Clone, Copy, Debug, Message)]
pub struct AttackEnded {
    pub actor: Entity,
}

#[derive(Clone, Copy, Debug, Message)]
pub struct MovementStarted {
    pub actor: Entity,
}

#[derive(Clone, Copy, Debug, Message)]
pub struct JumpStarted {
    pub actor: Entity,
}

#[derive(Clone, Copy, Debug, Message)]
pub struct JumpEnded {
    pub actor: Entity,
}

/// Write-only animator parameter sink
///
/// Gameplay writes these every frame/tick; the animation side consumes
/// them as the "Movement_x" / "Movement_y" / "Attack" floats and the
/// "Jump" trigger. There is no read-back contract here.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AnimatorParams {
    pub movement_x: f32,
    pub movement_y: f32,
    pub attack: f32,
    jump_trigger: bool,
}

impl AnimatorParams {
    /// One-shot "Jump" trigger; consumed by the clip driver
    pub fn set_jump_trigger(&mut self) {
        self.jump_trigger = true;
    }

    pub fn take_jump_trigger(&mut self) -> bool {
        std::mem::take(&mut self.jump_trigger)
    }
}

/// Keeps `AttackStage` in sync with the relay: attack-start stamps the
/// stage of the clip that began, movement-start and jump-start reset it.
pub fn apply_relay_to_stage(
    mut attacks: MessageReader<AttackStageStarted>,
    mut movements: MessageReader<MovementStarted>,
    mut jumps: MessageReader<JumpStarted>,
    mut q: Query<&mut AttackStage>,
) {
    for m in attacks.read() {
        if let Ok(mut stage) = q.get_mut(m.actor) {
            stage.0 = m.stage;
        }
    }
    for m in movements.read() {
        if let Ok(mut stage) = q.get_mut(m.actor) {
            stage.0 = 0;
        }
    }
    for m in jumps.read() {
        if let Ok(mut stage) = q.get_mut(m.actor) {
            stage.0 = 0;
        }
    }
}

/// Stand-in for the animation controller's clip graph
///
/// Starts the next combo clip when the "Attack" parameter crosses its
/// stage threshold, runs it on a timer, and emits the clip-defined
/// notifications at the same points the authored clips would.
#[derive(Component, Debug, Default)]
pub struct ClipDriver {
    attack_clip: Option<Timer>,
    jump_clip: Option<Timer>,
}

pub fn drive_clips(
    time: Res<Time>,
    mut q: Query<(Entity, &mut ClipDriver, &mut AnimatorParams, &AttackStage), Without<Dead>>,
    mut attack_started: MessageWriter<AttackStageStarted>,
    mut attack_ended: MessageWriter<AttackEnded>,
    mut movement_started: MessageWriter<MovementStarted>,
    mut jump_started: MessageWriter<JumpStarted>,
    mut jump_ended: MessageWriter<JumpEnded>,
) {
    for (actor, mut driver, mut params, stage) in q.iter_mut() {
        // Jump clip: triggered once, lands on its own timer
        if params.take_jump_trigger() && driver.jump_clip.is_none() {
            driver.jump_clip = Some(Timer::from_seconds(JUMP_CLIP_SECS, TimerMode::Once));
            jump_started.write(JumpStarted { actor });
        }
        if let Some(timer) = driver.jump_clip.as_mut() {
            timer.tick(time.delta());
            if timer.is_finished() {
                driver.jump_clip = None;
                jump_ended.write(JumpEnded { actor });
            }
        }

        // Attack param crossing the next threshold wants stage N+1
        let next_stage_requested =
            stage.0 < MAX_ATTACK_STAGE && params.attack >= (stage.0 + 1) as f32;

        let mut clip_finished = false;
        if let Some(timer) = driver.attack_clip.as_mut() {
            timer.tick(time.delta());
            clip_finished = timer.is_finished();
        } else if next_stage_requested {
            driver.attack_clip = Some(Timer::from_seconds(ATTACK_CLIP_SECS, TimerMode::Once));
            attack_started.write(AttackStageStarted { actor, stage: stage.0 + 1 });
            continue;
        }

        if clip_finished {
            attack_ended.write(AttackEnded { actor });

            if next_stage_requested {
                // Chain straight into the next stage
                if let Some(timer) = driver.attack_clip.as_mut() {
                    timer.reset();
                }
                attack_started.write(AttackStageStarted { actor, stage: stage.0 + 1 });
            } else {
                // Back to locomotion; this resets the stage via the relay
                driver.attack_clip = None;
                movement_started.write(MovementStarted { actor });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn clip_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_message::<AttackStageStarted>()
            .add_message::<AttackEnded>()
            .add_message::<MovementStarted>()
            .add_message::<JumpStarted>()
            .add_message::<JumpEnded>()
            .add_systems(Update, (drive_clips, apply_relay_to_stage).chain());
        app
    }

    #[test]
    fn test_attack_clip_plays_out_and_returns_to_locomotion() {
        let mut app = clip_app();
        let actor = app
            .world_mut()
            .spawn((
                ClipDriver::default(),
                AnimatorParams::default(),
                AttackStage::default(),
            ))
            .id();

        // Accumulator crosses the stage-1 threshold: clip starts, relay
        // stamps the stage the same frame
        app.world_mut().get_mut::<AnimatorParams>(actor).unwrap().attack = 1.0;
        app.update();
        assert_eq!(app.world().get::<AttackStage>(actor).unwrap().0, 1);

        // Accumulator drained: the clip runs its full length, then the
        // movement notification resets the stage
        app.world_mut().get_mut::<AnimatorParams>(actor).unwrap().attack = 0.0;
        for _ in 0..8 {
            app.update();
        }
        assert_eq!(app.world().get::<AttackStage>(actor).unwrap().0, 0);
    }

    #[test]
    fn test_jump_clip_lands_on_its_timer() {
        let mut app = clip_app();
        let actor = app
            .world_mut()
            .spawn((
                ClipDriver::default(),
                AnimatorParams::default(),
                AttackStage::default(),
            ))
            .id();

        app.world_mut()
            .get_mut::<AnimatorParams>(actor)
            .unwrap()
            .set_jump_trigger();
        app.update();
        assert!(app.world().get::<ClipDriver>(actor).unwrap().jump_clip.is_some());

        for _ in 0..10 {
            app.update();
        }
        assert!(app.world().get::<ClipDriver>(actor).unwrap().jump_clip.is_none());
    }

    #[test]
    fn test_jump_trigger_is_one_shot() {
        let mut p = AnimatorParams::default();
        assert!(!p.take_jump_trigger());
        p.set_jump_trigger();
        assert!(p.take_jump_trigger());
        assert!(!p.take_jump_trigger());
    }
}
