use bevy::prelude::*;

use crate::shared::*;

use super::{text_font, UiFontHandle};

#[derive(Component)]
pub struct HudPackageText;

const HUD_POSITION: Vec2 = Vec2::new(20.0, 20.0);
const HUD_SIZE: Vec2 = Vec2::new(250.0, 70.0);

pub fn package_label(packages: u32) -> String {
    format!("Packages: {}", packages)
}

pub fn spawn_hud(mut commands: Commands, font: Res<UiFontHandle>, config: Res<GameConfig>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(HUD_POSITION.x),
                top: Val::Px(HUD_POSITION.y),
                width: Val::Px(HUD_SIZE.x),
                height: Val::Px(HUD_SIZE.y),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(3.0)),
                ..default()
            },
            BackgroundColor(Color::srgb(0.96, 0.93, 0.85)),
            BorderColor(config.text_color()),
        ))
        .with_children(|parent| {
            parent.spawn((
                HudPackageText,
                Text::new(package_label(0)),
                text_font(&font, 16.0),
                TextColor(config.text_color()),
            ));
        });
}

pub fn update_package_display(
    players: Query<&Actor, (With<Player>, Changed<Actor>)>,
    mut texts: Query<&mut Text, With<HudPackageText>>,
) {
    let Ok(actor) = players.get_single() else {
        return;
    };
    let label = package_label(actor.packages);
    for mut text in &mut texts {
        if text.0 != label {
            text.0 = label.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_label() {
        assert_eq!(package_label(7), "Packages: 7");
    }
}
