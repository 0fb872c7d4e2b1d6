//! Keyboard → `PlayerInput`, once per frame in `PreUpdate`.
//!
//! Game logic only ever reads the snapshot; it never touches
//! `ButtonInput<KeyCode>` directly.

use bevy::input::InputSystem;
use bevy::prelude::*;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            .add_systems(PreUpdate, read_input.after(InputSystem));
    }
}

/// Primary bindings. Arrow keys always work as a second set of movement keys.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub escape: KeyCode,
    pub toggle_map: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::KeyF,
            escape: KeyCode::Escape,
            toggle_map: KeyCode::KeyM,
        }
    }
}

/// Build one frame's snapshot from the held/just-pressed key state.
///
/// Up beats down and right beats left when both are held.
pub fn snapshot(keys: &ButtonInput<KeyCode>, bindings: &KeyBindings) -> PlayerInput {
    let held = |primary: KeyCode, alt: KeyCode| keys.pressed(primary) || keys.pressed(alt);

    let y = if held(bindings.move_up, KeyCode::ArrowUp) {
        -1.0
    } else if held(bindings.move_down, KeyCode::ArrowDown) {
        1.0
    } else {
        0.0
    };
    let x = if held(bindings.move_right, KeyCode::ArrowRight) {
        1.0
    } else if held(bindings.move_left, KeyCode::ArrowLeft) {
        -1.0
    } else {
        0.0
    };

    PlayerInput {
        move_axis: Vec2::new(x, y),
        interact_held: keys.pressed(bindings.interact),
        escape: keys.just_pressed(bindings.escape),
        toggle_map: keys.just_pressed(bindings.toggle_map),
    }
}

fn read_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    // Headless apps have no keyboard; leave whatever was written directly.
    let Some(keys) = keys else {
        return;
    };
    *input = snapshot(&keys, &bindings);
}
