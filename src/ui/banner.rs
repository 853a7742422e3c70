/*
Duskblade - by David Petnick
*/
use bevy::prelude::*;

use crate::combat::PlayerWin;

const FADE_PER_SEC: f32 = 0.5;
const BACKDROP_MAX_ALPHA: f32 = 0.6;

/// Latched fade state for the full-screen victory overlay. Starts the
/// moment the win broadcast lands and parks itself at full opacity.
#[derive(Resource, Debug, Clone, Default)]
pub struct VictoryFade {
    pub active: bool,
    pub alpha: f32,
}

/// Marker for the full-screen victory overlay root.
#[derive(Component)]
pub(super) struct VictoryBanner;

#[derive(Component)]
pub(super) struct VictoryText;

pub(crate) fn setup_victory_banner(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font: Handle<Font> = asset_server.load("fonts/duskblade.ttf");

    commands
        .spawn((
            VictoryBanner,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
            Visibility::Hidden,
        ))
        .with_children(|ui| {
            ui.spawn((
                VictoryText,
                Text::new("VICTORY"),
                TextFont {
                    font: font.clone(),
                    font_size: 96.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 0.85, 0.3, 0.0)),
            ));
        });
}

pub(crate) fn start_victory_fade(
    mut wins: MessageReader<PlayerWin>,
    mut fade: ResMut<VictoryFade>,
    mut q: Query<&mut Visibility, With<VictoryBanner>>,
) {
    if wins.read().next().is_none() {
        return;
    }
    if fade.active || fade.alpha > 0.0 {
        // Already fading or shown; repeat broadcasts do nothing
        return;
    }

    fade.active = true;
    if let Ok(mut vis) = q.single_mut() {
        *vis = Visibility::Visible;
    }
}

pub(crate) fn tick_victory_fade(
    time: Res<Time>,
    mut fade: ResMut<VictoryFade>,
    mut q_root: Query<&mut BackgroundColor, With<VictoryBanner>>,
    mut q_text: Query<&mut TextColor, With<VictoryText>>,
) {
    if !fade.active {
        return;
    }

    fade.alpha = (fade.alpha + FADE_PER_SEC * time.delta_secs()).min(1.0);
    if fade.alpha >= 1.0 {
        fade.active = false;
    }

    if let Ok(mut backdrop) = q_root.single_mut() {
        backdrop.0 = Color::srgba(0.0, 0.0, 0.0, fade.alpha * BACKDROP_MAX_ALPHA);
    }
    if let Ok(mut text) = q_text.single_mut() {
        text.0 = Color::srgba(1.0, 0.85, 0.3, fade.alpha);
    }
}
