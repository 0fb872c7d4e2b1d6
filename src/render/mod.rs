//! Render domain: turns `Drawable`s into Bevy sprites.
//!
//! Responsible for:
//! - The fixed camera and the scroll offset
//! - Compositing: layer bands, row sorting, screen positions
//! - Loading sprite images, with flat-colour placeholders when they fail
//! - Multiplicative tint from the sky and the day transition
//! - The "next day" caption

pub mod camera;
pub mod compositor;

use std::collections::HashSet;

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::daycycle::sky::Sky;
use crate::daycycle::transition::DayTransition;
use crate::shared::*;
use crate::ui::{text_font, UiFontHandle};

use compositor::DrawOrder;

pub struct CompositorPlugin;

impl Plugin for CompositorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraOffset>()
            .init_resource::<DrawOrder>()
            .init_resource::<FailedImages>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(OnEnter(GameState::Playing), spawn_caption)
            .add_systems(
                PostUpdate,
                (
                    camera::update_camera_offset,
                    compositor::composite_drawables,
                    attach_sprites,
                    refresh_sprite_images,
                    mark_failed_images,
                    tint_sprites,
                    sync_caption,
                )
                    .chain()
                    .before(TransformSystem::TransformPropagate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// The image a sprite is showing and whether it could be loaded.
#[derive(Component, Debug, Clone)]
pub struct LoadedVisual {
    pub path: Option<String>,
    pub failed: bool,
}

/// Image paths already reported as missing, so each warns once.
#[derive(Resource, Debug, Default)]
pub struct FailedImages(pub HashSet<String>);

#[derive(Component)]
pub struct CaptionText;

/// Multiply `base` by the sky colour and the transition brightness.
pub fn tinted(base: Color, sky: &Sky, brightness: f32) -> Color {
    let base = base.to_srgba();
    let tint = sky.tint().to_srgba();
    Color::srgba(
        base.red * tint.red * brightness,
        base.green * tint.green * brightness,
        base.blue * tint.blue * brightness,
        base.alpha,
    )
}

fn sprite_image(asset_server: &AssetServer, path: Option<&str>) -> Handle<Image> {
    match path {
        Some(path) => asset_server.load(path.to_string()),
        None => Handle::default(),
    }
}

fn attach_sprites(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    query: Query<(Entity, &Drawable), Without<LoadedVisual>>,
) {
    for (entity, drawable) in &query {
        let path = drawable.visual.image.clone();
        commands.entity(entity).insert((
            Sprite {
                image: sprite_image(&asset_server, path.as_deref()),
                custom_size: Some(drawable.rect.size()),
                color: drawable.visual.color,
                ..default()
            },
            LoadedVisual {
                path,
                failed: false,
            },
        ));
    }
}

/// Follow image and size changes (animation frames, new day).
fn refresh_sprite_images(
    asset_server: Res<AssetServer>,
    failed: Res<FailedImages>,
    mut query: Query<(&Drawable, &mut LoadedVisual, &mut Sprite), Changed<Drawable>>,
) {
    for (drawable, mut loaded, mut sprite) in &mut query {
        let size = Some(drawable.rect.size());
        if sprite.custom_size != size {
            sprite.custom_size = size;
        }
        if loaded.path == drawable.visual.image {
            continue;
        }
        loaded.path = drawable.visual.image.clone();
        loaded.failed = loaded
            .path
            .as_ref()
            .is_some_and(|path| failed.0.contains(path));
        sprite.image = if loaded.failed {
            Handle::default()
        } else {
            sprite_image(&asset_server, loaded.path.as_deref())
        };
    }
}

/// A sprite whose image failed to load shows its placeholder colour over
/// the default white texture instead.
fn mark_failed_images(
    asset_server: Res<AssetServer>,
    mut failed_images: ResMut<FailedImages>,
    mut query: Query<(&mut LoadedVisual, &mut Sprite)>,
) {
    for (mut loaded, mut sprite) in &mut query {
        if loaded.failed {
            continue;
        }
        let Some(path) = loaded.path.clone() else {
            continue;
        };
        if !matches!(asset_server.load_state(sprite.image.id()), LoadState::Failed(_)) {
            continue;
        }
        if failed_images.0.insert(path.clone()) {
            warn!("[Render] Could not load {}; drawing a placeholder", path);
        }
        loaded.failed = true;
        sprite.image = Handle::default();
    }
}

fn tint_sprites(
    sky: Res<Sky>,
    transition: Res<DayTransition>,
    mut query: Query<(&Drawable, &LoadedVisual, &mut Sprite)>,
) {
    let brightness = transition.brightness_factor();
    for (drawable, loaded, mut sprite) in &mut query {
        let base = if loaded.path.is_some() && !loaded.failed {
            Color::WHITE
        } else {
            drawable.visual.color
        };
        let color = tinted(base, &sky, brightness);
        if sprite.color != color {
            sprite.color = color;
        }
    }
}

fn spawn_caption(mut commands: Commands, font: Res<UiFontHandle>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            GlobalZIndex(30),
        ))
        .with_children(|parent| {
            parent.spawn((
                CaptionText,
                Text::new(NEXT_DAY_CAPTION),
                text_font(&font, 20.0),
                TextColor(Color::WHITE),
                Visibility::Hidden,
            ));
        });
}

fn sync_caption(
    transition: Res<DayTransition>,
    mut captions: Query<&mut Visibility, With<CaptionText>>,
) {
    let wanted = if transition.shows_caption() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut captions {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sky() -> Sky {
        Sky::from_config(&GameConfig::default())
    }

    #[test]
    fn test_white_sky_full_brightness_is_identity() {
        let base = Color::srgb(0.5, 0.25, 1.0);
        let out = tinted(base, &sky(), 1.0).to_srgba();
        assert!((out.red - 0.5).abs() < 1e-6);
        assert!((out.green - 0.25).abs() < 1e-6);
        assert!((out.blue - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_brightness_is_black() {
        let out = tinted(Color::WHITE, &sky(), 0.0).to_srgba();
        assert_eq!((out.red, out.green, out.blue), (0.0, 0.0, 0.0));
        assert_eq!(out.alpha, 1.0);
    }

    #[test]
    fn test_evening_sky_multiplies_per_channel() {
        let mut sky = sky();
        sky.color = sky.end_color;
        let out = tinted(Color::WHITE, &sky, 1.0).to_srgba();
        assert!((out.red - 38.0 / 255.0).abs() < 1e-5);
        assert!((out.blue - 189.0 / 255.0).abs() < 1e-5);
    }
}
