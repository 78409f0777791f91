//! Window input
//!
//! Translates Bevy keyboard, wheel and pointer events into calls on the
//! editor core. Keys go through the `ActionDispatcher`; the wheel goes to
//! the viewport; pointer presses select, drag and pan.

use crate::core::errors::DrillError;
use crate::core::settings::WHEEL_PIXELS_PER_LINE;
use crate::core::state::EditorContext;
use crate::editing::chord::{FocusTarget, KeyEvent};
use crate::editing::dispatcher::{ActionDispatcher, KeyOutcome};
use crate::rendering::cameras::cursor_point;
use bevy::input::keyboard::KeyboardInput;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyboardFocus>()
            .init_resource::<PointerState>()
            .add_systems(
                Update,
                (
                    handle_key_down,
                    handle_mouse_wheel,
                    handle_pointer,
                    settle_viewport,
                )
                    .chain(),
            );
    }
}

/// Where keyboard input is currently going. Text widgets set this while
/// they hold focus so shortcuts stay out of their way.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardFocus(pub FocusTarget);

#[derive(Resource, Debug, Default)]
struct PointerState {
    /// Last cursor position while panning, in screen space
    pan_anchor: Option<Vec2>,
}

/// Chord key name for a physical key; `None` for keys nothing binds
pub fn key_name(key: KeyCode) -> Option<&'static str> {
    let name = match key {
        KeyCode::KeyA => "a",
        KeyCode::KeyB => "b",
        KeyCode::KeyC => "c",
        KeyCode::KeyD => "d",
        KeyCode::KeyE => "e",
        KeyCode::KeyF => "f",
        KeyCode::KeyG => "g",
        KeyCode::KeyH => "h",
        KeyCode::KeyI => "i",
        KeyCode::KeyJ => "j",
        KeyCode::KeyK => "k",
        KeyCode::KeyL => "l",
        KeyCode::KeyM => "m",
        KeyCode::KeyN => "n",
        KeyCode::KeyO => "o",
        KeyCode::KeyP => "p",
        KeyCode::KeyQ => "q",
        KeyCode::KeyR => "r",
        KeyCode::KeyS => "s",
        KeyCode::KeyT => "t",
        KeyCode::KeyU => "u",
        KeyCode::KeyV => "v",
        KeyCode::KeyW => "w",
        KeyCode::KeyX => "x",
        KeyCode::KeyY => "y",
        KeyCode::KeyZ => "z",
        KeyCode::Digit0 => "0",
        KeyCode::Digit1 => "1",
        KeyCode::Digit2 => "2",
        KeyCode::Digit3 => "3",
        KeyCode::Digit4 => "4",
        KeyCode::Digit5 => "5",
        KeyCode::Digit6 => "6",
        KeyCode::Digit7 => "7",
        KeyCode::Digit8 => "8",
        KeyCode::Digit9 => "9",
        KeyCode::Equal => "=",
        KeyCode::Minus => "-",
        KeyCode::Space => "space",
        KeyCode::Escape => "escape",
        KeyCode::ArrowUp => "arrowup",
        KeyCode::ArrowDown => "arrowdown",
        KeyCode::ArrowLeft => "arrowleft",
        KeyCode::ArrowRight => "arrowright",
        _ => return None,
    };
    Some(name)
}

fn handle_key_down(
    mut key_events: EventReader<KeyboardInput>,
    keys: Res<ButtonInput<KeyCode>>,
    focus: Res<KeyboardFocus>,
    dispatcher: Res<ActionDispatcher>,
    mut ctx: ResMut<EditorContext>,
) {
    for event in key_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let Some(name) = key_name(event.key_code) else {
            continue;
        };

        let mut key = KeyEvent::new(name).focused_on(focus.0);
        key.ctrl = keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
        key.meta = keys.any_pressed([KeyCode::SuperLeft, KeyCode::SuperRight]);
        key.alt = keys.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]);
        key.shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

        match dispatcher.handle_key_down(&key, &mut ctx) {
            KeyOutcome::Dispatched { action, .. } => {
                debug!("{} handled {}", key.chord_string(), action.name());
            }
            KeyOutcome::Ignored | KeyOutcome::Unbound => {}
        }
    }
}

/// Wheel zoom around the cursor. Bevy reports scrolling up as positive,
/// which zooms in, so the delta is negated before it reaches the viewport.
fn handle_mouse_wheel(
    mut wheel_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut ctx: ResMut<EditorContext>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        wheel_events.clear();
        return;
    };
    for event in wheel_events.read() {
        let pixels = match event.unit {
            MouseScrollUnit::Line => event.y as f64 * WHEEL_PIXELS_PER_LINE,
            MouseScrollUnit::Pixel => event.y as f64,
        };
        let outcome = ctx.scene.viewport_mut().handle_wheel(
            -pixels,
            cursor_point(cursor),
            time.elapsed_secs_f64(),
        );
        if outcome.consumed {
            ctx.scene.request_render();
        }
    }
}

/// Left button selects and drags markers, middle or right button pans
fn handle_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Query<&Interaction, With<Button>>,
    mut pointer: ResMut<PointerState>,
    mut ctx: ResMut<EditorContext>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let world = ctx.scene.viewport().screen_to_world(cursor_point(cursor));

    if mouse.any_just_pressed([MouseButton::Middle, MouseButton::Right]) {
        pointer.pan_anchor = Some(cursor);
    }
    if let Some(anchor) = pointer.pan_anchor {
        if mouse.any_pressed([MouseButton::Middle, MouseButton::Right]) {
            let delta = cursor - anchor;
            if delta != Vec2::ZERO {
                ctx.scene
                    .viewport_mut()
                    .pan_by(kurbo::Vec2::new(delta.x as f64, delta.y as f64));
                ctx.scene.request_render();
                pointer.pan_anchor = Some(cursor);
            }
        } else {
            pointer.pan_anchor = None;
        }
    }

    if mouse.just_pressed(MouseButton::Left) {
        let ctx = &mut *ctx;
        let over_ui = buttons
            .iter()
            .any(|interaction| *interaction != Interaction::None);
        if over_ui {
            return;
        }
        let additive = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        match ctx.scene.hit_test(world) {
            Some(hit) if additive => {
                ctx.scene
                    .toggle_in_selection(hit, &ctx.ui, &mut ctx.selection);
            }
            Some(hit) => {
                let already_selected = ctx
                    .scene
                    .graph()
                    .get(hit)
                    .is_some_and(|object| object.selected);
                if !already_selected {
                    ctx.scene
                        .set_selected_markers(&[hit], &ctx.ui, &mut ctx.selection);
                }
                ctx.scene.begin_drag(world);
            }
            None if !additive => {
                ctx.scene
                    .set_selected_markers(&[], &ctx.ui, &mut ctx.selection);
            }
            None => {}
        }
    }

    if ctx.scene.is_dragging() {
        if mouse.pressed(MouseButton::Left) {
            ctx.scene.drag_to(world);
        } else {
            finish_drag(&mut ctx);
        }
    }
}

/// Commits a drag as one batch for the selected page
fn finish_drag(ctx: &mut EditorContext) {
    let page = match ctx.current_page() {
        Ok(page) => page,
        Err(err) => {
            warn!("Dropping drag: {err}");
            ctx.scene.cancel_drag();
            return;
        }
    };
    let patches = ctx.scene.finish_drag(page.id);
    match ctx.submit_patches(&patches) {
        Ok(0) => {}
        Ok(count) => info!("Moved {count} marchers on '{}'", page.name),
        Err(DrillError::RefreshAfterWrite { saved, source }) => {
            info!("Moved {saved} marchers on '{}'", page.name);
            warn!("Could not redraw after the move: {source}");
        }
        Err(err) => {
            error!("Could not save dragged positions: {err}");
            // Put the markers back where the store says they are
            if let Err(err) = ctx.refresh_scene() {
                warn!("{err}");
            }
        }
    }
}

fn settle_viewport(time: Res<Time>, mut ctx: ResMut<EditorContext>) {
    if ctx.scene.viewport().settle_deadline().is_some() {
        ctx.scene.tick(time.elapsed_secs_f64());
    }
}
