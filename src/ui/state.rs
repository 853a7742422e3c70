use bevy::prelude::*;

/// What the HUD shows about the duel opponent. Combat writes it, the
/// bar widget reads it; the widget never touches the ECS combat state.
#[derive(Resource, Debug, Clone)]
pub struct HudState {
    pub enemy_hp_ratio: f32,
    pub enemy_alive: bool,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            enemy_hp_ratio: 1.0,
            enemy_alive: true,
        }
    }
}
