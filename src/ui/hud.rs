use bevy::prelude::*;

use super::HudState;

const BAR_W: f32 = 300.0;
const BAR_H: f32 = 18.0;
const BAR_PAD: f32 = 2.0;
const BAR_TOP: f32 = 24.0;

#[derive(Component)]
pub(super) struct HealthBarFrame;

#[derive(Component)]
pub(super) struct HealthBarFill;

pub(crate) fn setup_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::FlexStart,
            padding: UiRect::top(Val::Px(BAR_TOP)),
            ..default()
        })
        .with_children(|ui| {
            // Frame is the dark backing, fill shrinks left-to-right
            ui.spawn((
                HealthBarFrame,
                Node {
                    width: Val::Px(BAR_W),
                    height: Val::Px(BAR_H),
                    padding: UiRect::all(Val::Px(BAR_PAD)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            ))
            .with_children(|frame| {
                frame.spawn((
                    HealthBarFill,
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.8, 0.1, 0.1)),
                ));
            });
        });
}

pub(crate) fn sync_health_bar(
    hud: Res<HudState>,
    mut q_fill: Query<&mut Node, With<HealthBarFill>>,
    mut q_frame: Query<&mut Visibility, (With<HealthBarFrame>, Without<HealthBarFill>)>,
) {
    if !hud.is_changed() {
        return;
    }

    if let Ok(mut fill) = q_fill.single_mut() {
        fill.width = Val::Percent(hud.enemy_hp_ratio.clamp(0.0, 1.0) * 100.0);
    }
    if let Ok(mut vis) = q_frame.single_mut() {
        // The bar disappears with its owner
        *vis = if hud.enemy_alive {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
