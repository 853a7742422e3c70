use bevy::prelude::*;
use duskblade::ai::EnemyAiPlugin;
use duskblade::animation::{
    apply_relay_to_stage, drive_clips, AttackEnded, AttackStageStarted, JumpEnded, JumpStarted,
    MovementStarted,
};
use duskblade::audio::{play_sfx_events, setup_audio, start_music, victory_sting, PlaySfx};
use duskblade::camera::CameraRigPlugin;
use duskblade::combat::CombatPlugin;
use duskblade::player::{grab_mouse, on_jump_end, player_input, player_move, PlayerSettings};
use duskblade::settings::SettingsPlugin;
use duskblade::ui::UiPlugin;
use duskblade::world::setup;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(Time::<Fixed>::from_seconds(1.0 / 60.0))
        .init_resource::<PlayerSettings>() // ensures it exists before SettingsPlugin applies
        .add_message::<PlaySfx>()
        .add_message::<AttackStageStarted>()
        .add_message::<AttackEnded>()
        .add_message::<MovementStarted>()
        .add_message::<JumpStarted>()
        .add_message::<JumpEnded>()
        .add_plugins((
            SettingsPlugin,
            CameraRigPlugin,
            EnemyAiPlugin,
            CombatPlugin,
            UiPlugin,
        ))
        .add_systems(Startup, (setup, setup_audio))
        .add_systems(PostStartup, start_music)
        // Clip driver runs before the relay listeners so stage reads are
        // fresh the same frame a notification lands
        .add_systems(
            Update,
            (
                grab_mouse,
                player_input,
                drive_clips,
                apply_relay_to_stage,
                on_jump_end,
                player_move,
            )
                .chain(),
        )
        .add_systems(Update, (play_sfx_events, victory_sting))
        .run();
}
