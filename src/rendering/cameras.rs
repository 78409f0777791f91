//! Camera for the field
//!
//! The viewport controller owns pan and zoom; the camera only follows it.
//! Field coordinates have y pointing down while Bevy's world has y pointing
//! up, so every conversion between the two flips y.

use crate::core::state::EditorContext;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Marks the camera that renders the field
#[derive(Component)]
pub struct DesignCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_design_camera).add_systems(
            Update,
            (track_window_size, sync_camera_to_viewport).chain(),
        );
    }
}

/// Field pixels to Bevy world units
pub fn field_to_world(point: kurbo::Point) -> Vec2 {
    Vec2::new(point.x as f32, -point.y as f32)
}

/// Window cursor position (top-left origin) as a kurbo point
pub fn cursor_point(cursor: Vec2) -> kurbo::Point {
    kurbo::Point::new(cursor.x as f64, cursor.y as f64)
}

pub fn spawn_design_camera(mut commands: Commands) {
    commands.spawn((Camera2d, DesignCamera));
}

/// Keeps the viewport's idea of the screen size in step with the window
fn track_window_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut ctx: ResMut<EditorContext>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = kurbo::Size::new(window.width() as f64, window.height() as f64);
    if ctx.scene.viewport().screen_size() != size {
        ctx.scene.viewport_mut().set_screen_size(size);
        ctx.scene.request_render();
    }
}

/// Places the camera over the field point at the center of the screen and
/// scales the projection by the inverse zoom
fn sync_camera_to_viewport(
    ctx: Res<EditorContext>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<DesignCamera>>,
) {
    let Ok((mut transform, mut projection)) = cameras.single_mut() else {
        return;
    };
    let viewport = ctx.scene.viewport();
    let center = field_to_world(viewport.screen_to_world(viewport.screen_center()));
    transform.translation.x = center.x;
    transform.translation.y = center.y;

    if let Projection::Orthographic(ortho) = projection.as_mut() {
        let scale = (1.0 / viewport.zoom()) as f32;
        if ortho.scale != scale {
            ortho.scale = scale;
        }
    }
}
