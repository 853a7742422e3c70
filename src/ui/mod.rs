use bevy::prelude::*;

mod state;
mod hud;
mod banner;

pub use state::HudState;
pub use banner::VictoryFade;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudState>()
            .init_resource::<VictoryFade>()
            .add_systems(Startup, (hud::setup_hud, banner::setup_victory_banner))
            .add_systems(Update, hud::sync_health_bar)
            // start the fade on the win broadcast, then advance it
            .add_systems(
                Update,
                (banner::start_victory_fade, banner::tick_victory_fade).chain(),
            );
    }
}
