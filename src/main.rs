use std::path::Path;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use doorstep::shared::*;
use doorstep::{daycycle, data, delivery, input, player, render, ui, world};

fn main() {
    let config = data::load_config_or_default(Path::new(data::CONFIG_PATH));

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Doorstep".into(),
                    resolution: WindowResolution::new(config.screen_width, config.screen_height),
                    present_mode: PresentMode::AutoVsync,
                    resizable: false,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    // Config first: plugins below build their resources from it
    .insert_resource(config)
    // Game state
    .init_state::<GameState>()
    // Shared resources
    .init_resource::<Dialogue>()
    .init_resource::<MapView>()
    // Events
    .add_event::<DoorInteractionEvent>()
    .add_event::<DayStartedEvent>();

    configure_tick_sets(&mut app);

    app
        // Data loading
        .add_plugins(data::DataPlugin)
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(delivery::DeliveryPlugin)
        .add_plugins(daycycle::DayCyclePlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(render::CompositorPlugin)
        .run();
}
