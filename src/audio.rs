use bevy::prelude::*;
use bevy::audio::{
	AudioPlayer,
	AudioSource,
	PlaybackSettings,
    SpatialScale,
    Volume,
};
use std::collections::HashMap;
use rand::RngExt;
use crate::combat::PlayerWin;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SfxKind {
    // Blade
    SwordSwing,
    SwordHit,

    // Enemy
    EnemyDeath,

    // End of duel sting
    Victory,
}

#[derive(Clone, Copy, Debug, Message)]
pub struct PlaySfx {
    pub kind: SfxKind,
    pub pos: Vec3,
}

#[derive(Resource, Default)]
pub struct SfxLibrary {
    pub map: HashMap<SfxKind, Vec<Handle<AudioSource>>>,
}

impl SfxLibrary {
    pub fn insert_one(&mut self, k: SfxKind, h: Handle<AudioSource>) {
        self.map.entry(k).or_default().push(h);
    }
}

#[derive(Resource)]
pub struct GameAudio {
    pub music_arena: Handle<AudioSource>,
}

#[derive(Component)]
pub struct Music;

pub fn setup_audio(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(GameAudio {
        music_arena: asset_server.load("sounds/music/arena.wav"),
    });

    // 1-or-many clips per SfxKind; random selection happens at play time
    let mut lib = SfxLibrary::default();

    lib.insert_one(SfxKind::SwordSwing, asset_server.load("sounds/sfx/sword/sword_swing_0.wav"));
    lib.insert_one(SfxKind::SwordSwing, asset_server.load("sounds/sfx/sword/sword_swing_1.wav"));
    lib.insert_one(SfxKind::SwordSwing, asset_server.load("sounds/sfx/sword/sword_swing_2.wav"));
    lib.insert_one(SfxKind::SwordHit, asset_server.load("sounds/sfx/sword/sword_hit_0.wav"));
    lib.insert_one(SfxKind::SwordHit, asset_server.load("sounds/sfx/sword/sword_hit_1.wav"));

    lib.insert_one(SfxKind::EnemyDeath, asset_server.load("sounds/sfx/enemy/enemy_death_0.wav"));
    lib.insert_one(SfxKind::EnemyDeath, asset_server.load("sounds/sfx/enemy/enemy_death_1.wav"));

    lib.insert_one(SfxKind::Victory, asset_server.load("sounds/sfx/victory.wav"));

    commands.insert_resource(lib);
}

pub fn start_music(
    mut commands: Commands,
    audio: Res<GameAudio>,
    q_music: Query<(), With<Music>>,
) {
    // prevent duplicates if Startup runs again (hot reload etc)
    if q_music.iter().next().is_some() {
        return;
    }

    commands.spawn((
        Music,
        AudioPlayer::new(audio.music_arena.clone()),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(0.4)),
    ));
}

/// The win broadcast gets a one-shot sting on top of whatever combat
/// audio is still ringing out.
pub fn victory_sting(
    mut wins: MessageReader<PlayerWin>,
    mut sfx: MessageWriter<PlaySfx>,
) {
    for _ in wins.read() {
        sfx.write(PlaySfx {
            kind: SfxKind::Victory,
            pos: Vec3::ZERO,
        });
    }
}

pub fn play_sfx_events(
    lib: Res<SfxLibrary>,
    mut commands: Commands,
    mut ev: MessageReader<PlaySfx>,
) {
    for e in ev.read() {
        let Some(list) = lib.map.get(&e.kind) else {
            warn!("Missing SFX for {:?}", e.kind);
            continue;
        };
        if list.is_empty() {
            continue;
        }

        let i = rand::rng().random_range(0..list.len());
        let clip = list[i].clone();

        let settings = match e.kind {
            SfxKind::SwordSwing => PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_spatial_scale(SpatialScale::new(0.12))
                .with_volume(Volume::Linear(1.0)),

            SfxKind::SwordHit => PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_spatial_scale(SpatialScale::new(0.12))
                .with_volume(Volume::Linear(1.2)),

            SfxKind::EnemyDeath => PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_spatial_scale(SpatialScale::new(0.15))
                .with_volume(Volume::Linear(1.3)),

            // Non-spatial, plays over the whole mix
            SfxKind::Victory => PlaybackSettings::DESPAWN.with_volume(Volume::Linear(1.1)),
        };

        commands.spawn((
            Transform::from_translation(e.pos),
            AudioPlayer::new(clip),
            settings,
        ));
    }
}
