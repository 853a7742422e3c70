/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::camera::CameraRig;
use crate::player::PlayerSettings;

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
	fn build(&self, app: &mut App) {
		app
			.insert_resource(GameSettings::load())
			// Startup: Apply Persisted Settings Once on Launch
			.add_systems(Startup, apply_settings_startup)
			// Update: Deal With Changes
			.add_systems(Update, apply_settings_on_change);
	}
}

/// Player-tunable knobs persisted between runs. Gameplay systems never
/// read this directly; it is pushed into `PlayerSettings` / `CameraRig`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
	pub mouse_sensitivity: f32,
	pub camera_zoom_speed: f32,
	pub camera_follow_speed: f32,
	pub arm_length_min: f32,
	pub arm_length_max: f32,
	pub walk_speed: f32,
	pub run_speed: f32,
}

impl Default for GameSettings {
	fn default() -> Self {
		Self {
			mouse_sensitivity: 0.002,
			camera_zoom_speed: 4.0,
			camera_follow_speed: 1.0,
			arm_length_min: 2.0,
			arm_length_max: 8.0,
			walk_speed: 2.0,
			run_speed: 4.5,
		}
	}
}

impl GameSettings {
	fn config_path() -> Option<PathBuf> {
		#[cfg(debug_assertions)]
		{
			// Debug builds: save in project directory
			let mut p = std::env::current_dir().ok()?;
			p.push("settings.ron");
			Some(p)
		}
		#[cfg(not(debug_assertions))]
		{
			// Release builds: save in AppData
			dirs::config_dir().and_then(|mut p| {
				p.push("Duskblade");
				std::fs::create_dir_all(&p).ok()?;
				p.push("settings.ron");
				Some(p)
			})
		}
	}

	pub fn load() -> Self {
		Self::config_path()
			.and_then(|path| std::fs::read_to_string(path).ok())
			.and_then(|contents| ron::from_str(&contents).ok())
			.unwrap_or_default()
	}

	pub fn save(&self) {
		if let Some(path) = Self::config_path() {
			if let Ok(contents) = ron::ser::to_string_pretty(self, Default::default()) {
				let _ = std::fs::write(path, contents);
			}
		}
	}
}

fn apply(settings: &GameSettings, player: &mut PlayerSettings, rig: &mut CameraRig) {
	player.walk_speed = settings.walk_speed;
	player.run_speed = settings.run_speed;

	rig.sensitivity = settings.mouse_sensitivity;
	rig.zoom_speed = settings.camera_zoom_speed;
	rig.follow_speed = settings.camera_follow_speed;
	rig.arm_length_min = settings.arm_length_min;
	rig.arm_length_max = settings.arm_length_max;
}

fn apply_settings_startup(
	settings: Res<GameSettings>,
	mut player: ResMut<PlayerSettings>,
	mut rig: ResMut<CameraRig>,
) {
	apply(&settings, &mut player, &mut rig);
}

fn apply_settings_on_change(
	settings: Res<GameSettings>,
	mut player: ResMut<PlayerSettings>,
	mut rig: ResMut<CameraRig>,
) {
	if !settings.is_changed() || settings.is_added() {
		return;
	}
	apply(&settings, &mut player, &mut rig);
	settings.save();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_settings_ron_round_trip() {
		let s = GameSettings {
			mouse_sensitivity: 0.004,
			..Default::default()
		};
		let text = ron::ser::to_string_pretty(&s, Default::default()).unwrap();
		let back: GameSettings = ron::from_str(&text).unwrap();
		assert_eq!(back, s);
	}

	#[test]
	fn test_malformed_settings_rejected() {
		assert!(ron::from_str::<GameSettings>("not settings at all").is_err());
	}
}
