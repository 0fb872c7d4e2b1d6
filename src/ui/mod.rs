//! UI domain: the modal dialogue box, the full-map overlay, and the
//! package counter.
//!
//! The modal key handling runs in `TickSet::Modal`; everything else here
//! only mirrors shared state onto UI nodes.

pub mod dialogue_box;
pub mod hud;
pub mod map_view;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::shared::*;

pub const FONT_PATH: &str = "graphics/fonts/PressStart2P-vaV7.ttf";

/// The game font. Falls back to Bevy's built-in font if it cannot load.
#[derive(Resource, Debug, Clone, Default)]
pub struct UiFontHandle(pub Handle<Font>);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFontHandle>();

        app.add_systems(Startup, load_ui_font);
        app.add_systems(Update, fallback_font_on_failure);

        // ─── SPAWN: once, when gameplay starts ───
        app.add_systems(
            OnEnter(GameState::Playing),
            (hud::spawn_hud, dialogue_box::spawn_dialogue_box),
        );

        // ─── MODAL INPUT ───
        app.add_systems(
            Update,
            (
                dialogue_box::close_dialogue_on_escape.run_if(dialogue_active),
                map_view::handle_map_input,
            )
                .chain()
                .in_set(TickSet::Modal),
        );

        // ─── MIRROR STATE ONTO NODES ───
        app.add_systems(
            Update,
            (
                dialogue_box::sync_dialogue_box,
                map_view::sync_map_view,
                hud::update_package_display,
            )
                .after(TickSet::DayCycle)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn load_ui_font(asset_server: Res<AssetServer>, mut font: ResMut<UiFontHandle>) {
    font.0 = asset_server.load(FONT_PATH);
}

/// Swap every text node over to the built-in font once the game font is
/// known to be missing.
fn fallback_font_on_failure(
    asset_server: Res<AssetServer>,
    mut font: ResMut<UiFontHandle>,
    mut texts: Query<&mut TextFont>,
) {
    if font.0 == Handle::default() {
        return;
    }
    if !matches!(asset_server.load_state(font.0.id()), LoadState::Failed(_)) {
        return;
    }

    warn!("[UI] Could not load {}; using the default font", FONT_PATH);
    let failed = std::mem::take(&mut font.0);
    for mut text_font in &mut texts {
        if text_font.font == failed {
            text_font.font = Handle::default();
        }
    }
}

/// `TextFont` for the game font at `size`.
pub fn text_font(font: &UiFontHandle, size: f32) -> TextFont {
    TextFont {
        font: font.0.clone(),
        font_size: size,
        ..default()
    }
}
