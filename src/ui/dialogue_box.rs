use bevy::prelude::*;

use crate::shared::*;

use super::{text_font, UiFontHandle};

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct DialogueBoxRoot;

#[derive(Component)]
pub struct DialogueText;

#[derive(Component)]
pub struct DialoguePrompt;

const BOX_WIDTH: f32 = 850.0;
const BOX_HEIGHT: f32 = 200.0;
const BOX_BOTTOM_MARGIN: f32 = 20.0;

// ═══════════════════════════════════════════════════════════════════════
// MODAL INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Escape closes the dialogue. Only scheduled while it is open.
pub fn close_dialogue_on_escape(input: Res<PlayerInput>, mut dialogue: ResMut<Dialogue>) {
    if input.escape {
        dialogue.deactivate();
        debug!("[Dialogue] Closed");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / SYNC
// ═══════════════════════════════════════════════════════════════════════

/// Spawned hidden once; `sync_dialogue_box` shows it while the dialogue is
/// active.
pub fn spawn_dialogue_box(
    mut commands: Commands,
    font: Res<UiFontHandle>,
    config: Res<GameConfig>,
    dialogue: Res<Dialogue>,
) {
    commands
        .spawn((
            DialogueBoxRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                padding: UiRect::bottom(Val::Px(BOX_BOTTOM_MARGIN)),
                ..default()
            },
            Visibility::Hidden,
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(BOX_WIDTH),
                        height: Val::Px(BOX_HEIGHT),
                        flex_direction: FlexDirection::Column,
                        justify_content: JustifyContent::SpaceBetween,
                        padding: UiRect::all(Val::Px(24.0)),
                        border: UiRect::all(Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.96, 0.93, 0.85)),
                    BorderColor(config.text_color()),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        DialogueText,
                        Text::new(dialogue.message()),
                        text_font(&font, 18.0),
                        TextColor(config.text_color()),
                    ));
                    panel.spawn((
                        DialoguePrompt,
                        Text::new(DIALOGUE_PROMPT),
                        text_font(&font, 12.0),
                        TextColor(config.text_color()),
                        Node {
                            align_self: AlignSelf::FlexEnd,
                            ..default()
                        },
                    ));
                });
        });
}

pub fn sync_dialogue_box(
    dialogue: Res<Dialogue>,
    mut roots: Query<&mut Visibility, With<DialogueBoxRoot>>,
    mut texts: Query<&mut Text, With<DialogueText>>,
) {
    if !dialogue.is_changed() {
        return;
    }
    for mut visibility in &mut roots {
        *visibility = if dialogue.is_active() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut text in &mut texts {
        if text.0 != dialogue.message() {
            text.0 = dialogue.message().to_string();
        }
    }
}
