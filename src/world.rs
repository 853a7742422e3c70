/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;

use crate::actors::{AttackCommand, Health, Stamina, TargetLayer};
use crate::ai::{Enemy, EnemyConfig};
use crate::animation::{AnimatorParams, AttackStage, ClipDriver};
use crate::combat::SwordHitbox;
use crate::player::{Player, PlayerBody, PlayerMotion};

const ARENA_SIZE: f32 = 40.0;
const PILLAR_RADIUS: f32 = 0.9;

const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 6.0);
const ENEMY_SPAWN: Vec3 = Vec3::new(0.0, 1.0, -6.0);

/// Level geometry the camera occlusion sweep tests against.
#[derive(Component)]
pub struct WorldStatic;

/// Bounding sphere stand-in for a static blocker.
#[derive(Component, Debug, Clone, Copy)]
pub struct Obstacle {
    pub radius: f32,
}

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let floor_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.27, 0.24),
        perceptual_roughness: 0.95,
        ..default()
    });
    let pillar_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.42, 0.38),
        ..default()
    });
    let player_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.35, 0.7),
        ..default()
    });
    let enemy_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.15, 0.15),
        ..default()
    });

    // Light
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 10.0, 0.0)),
    ));

    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(ARENA_SIZE, ARENA_SIZE))),
        MeshMaterial3d(floor_mat),
        Transform::from_translation(Vec3::ZERO),
    ));

    // Pillars around the duel ground; these are what the camera sweep hits
    let pillar_mesh = meshes.add(Cuboid::new(1.2, 3.0, 1.2));
    for pos in [
        Vec3::new(6.0, 1.5, 0.0),
        Vec3::new(-6.0, 1.5, 0.0),
        Vec3::new(0.0, 1.5, 10.0),
        Vec3::new(-8.0, 1.5, -8.0),
    ] {
        commands.spawn((
            WorldStatic,
            Obstacle {
                radius: PILLAR_RADIUS,
            },
            Mesh3d(pillar_mesh.clone()),
            MeshMaterial3d(pillar_mat.clone()),
            Transform::from_translation(pos),
        ));
    }

    // Player
    commands.spawn((
        Player,
        TargetLayer,
        PlayerMotion::default(),
        PlayerBody::default(),
        AttackCommand::default(),
        AttackStage::default(),
        AnimatorParams::default(),
        ClipDriver::default(),
        SwordHitbox::default(),
        Mesh3d(meshes.add(Capsule3d::new(0.4, 1.2))),
        MeshMaterial3d(player_mat),
        Transform::from_translation(PLAYER_SPAWN),
    ));

    // Enemy; the AI attach system fills in its brain on first sight
    commands.spawn((
        Enemy,
        Health::new(100.0),
        Stamina::new(1.0),
        EnemyConfig::default(),
        AttackCommand::default(),
        AttackStage::default(),
        AnimatorParams::default(),
        ClipDriver::default(),
        Mesh3d(meshes.add(Capsule3d::new(0.4, 1.2))),
        MeshMaterial3d(enemy_mat),
        Transform::from_translation(ENEMY_SPAWN),
    ));
}
