//! Data layer: reads `GameConfig` and moves the game out of `Loading`.
//!
//! The config is read while the plugin is built so that every plugin added
//! after it can build its resources from the loaded values. An app that
//! already holds a `GameConfig` (tests, tools) keeps it untouched.

use std::path::Path;

use bevy::prelude::*;

use crate::shared::*;

pub const CONFIG_PATH: &str = "assets/config.ron";

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(load_config_or_default(Path::new(CONFIG_PATH)));
        }
        app.add_systems(OnEnter(GameState::Loading), finish_loading);
    }
}

/// Parse a RON config. Missing fields take their default values.
pub fn parse_config(text: &str) -> Result<GameConfig, String> {
    ron::from_str::<GameConfig>(text).map_err(|e| e.to_string())
}

pub fn load_config(path: &Path) -> Result<GameConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_config(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

pub fn load_config_or_default(path: &Path) -> GameConfig {
    match load_config(path) {
        Ok(config) => {
            info!("[Data] Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("[Data] {}; using defaults", e);
            GameConfig::default()
        }
    }
}

fn finish_loading(config: Res<GameConfig>, mut next_state: ResMut<NextState<GameState>>) {
    info!(
        "[Data] Viewport {}x{}, {}..={} packages per day",
        config.screen_width, config.screen_height, config.package_range.0, config.package_range.1
    );
    next_state.set(GameState::Playing);
}
