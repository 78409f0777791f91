//! Action toolbar
//!
//! A column of buttons along the left edge, one per toolbar action. Buttons
//! are bound by action name and go through `ActionDispatcher::dispatch_named`,
//! which ends in the same `dispatch` the keyboard uses. Toggle buttons
//! relabel themselves from the current `UiSettings`.

use crate::core::state::EditorContext;
use crate::editing::actions::ActionId;
use crate::editing::dispatcher::ActionDispatcher;
use crate::ui::theme::*;
use bevy::prelude::*;

/// Toolbar layout, top to bottom, by stable action name
pub const TOOLBAR_ACTIONS: [&str; 14] = [
    "first_page",
    "previous_page",
    "toggle_play",
    "next_page",
    "last_page",
    "copy_previous_page_to_all",
    "copy_previous_page_to_selected",
    "copy_next_page_to_all",
    "copy_next_page_to_selected",
    "snap_to_whole_step",
    "toggle_lock_x",
    "toggle_lock_y",
    "toggle_previous_paths",
    "toggle_next_paths",
];

pub struct ToolbarPlugin;

impl Plugin for ToolbarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_toolbar).add_systems(
            Update,
            (handle_toolbar_buttons, update_button_labels).chain(),
        );
    }
}

/// A button bound to an action by name
#[derive(Component, Debug, Clone, Copy)]
pub struct ActionButton(pub &'static str);

/// The text inside an action button
#[derive(Component, Debug, Clone, Copy)]
pub struct ActionLabel(pub ActionId);

pub fn spawn_toolbar(
    mut commands: Commands,
    dispatcher: Res<ActionDispatcher>,
    ctx: Res<EditorContext>,
) {
    let registry = dispatcher.registry().clone();
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(TOOLBAR_MARGIN),
                left: Val::Px(TOOLBAR_MARGIN),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(TOOLBAR_PADDING)),
                row_gap: Val::Px(TOOLBAR_ITEM_SPACING),
                ..default()
            },
            BackgroundColor(WIDGET_BACKGROUND_COLOR),
            Name::new("ActionToolbar"),
        ))
        .with_children(|parent| {
            for name in TOOLBAR_ACTIONS {
                let Some(descriptor) = ActionId::from_name(name).and_then(|id| registry.get(id))
                else {
                    warn!("Toolbar action {name} is not registered");
                    continue;
                };
                let id = descriptor.id;
                parent
                    .spawn((
                        Button,
                        ActionButton(name),
                        Node {
                            height: Val::Px(TOOLBAR_BUTTON_HEIGHT),
                            padding: UiRect::horizontal(Val::Px(TOOLBAR_PADDING)),
                            border: UiRect::all(Val::Px(TOOLBAR_BORDER_WIDTH)),
                            justify_content: JustifyContent::FlexStart,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BorderColor(NORMAL_BUTTON_OUTLINE_COLOR),
                        BackgroundColor(NORMAL_BUTTON),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(descriptor.label_with_chord(&ctx.ui)),
                            TextFont {
                                font_size: TOOLBAR_TEXT_FONT_SIZE,
                                ..default()
                            },
                            TextColor(PRIMARY_TEXT_COLOR),
                            ActionLabel(id),
                        ));
                    });
            }
        });
    info!("Spawned toolbar with {} actions", TOOLBAR_ACTIONS.len());
}

/// Dispatches pressed buttons and keeps their colors in step with the
/// interaction and toggle state
pub fn handle_toolbar_buttons(
    mut buttons: Query<
        (
            &Interaction,
            &ActionButton,
            &mut BackgroundColor,
            &mut BorderColor,
        ),
        With<Button>,
    >,
    pressed_buttons: Query<(&Interaction, &ActionButton), Changed<Interaction>>,
    dispatcher: Res<ActionDispatcher>,
    mut ctx: ResMut<EditorContext>,
) {
    for (interaction, button, mut background, mut border) in &mut buttons {
        let toggled_on = ActionId::from_name(button.0)
            .and_then(|id| dispatcher.registry().get(id))
            .and_then(|descriptor| descriptor.toggle)
            .is_some_and(|toggle| ctx.ui.get(toggle));

        let (fill, outline) = match *interaction {
            Interaction::Pressed => (PRESSED_BUTTON, PRESSED_BUTTON_OUTLINE_COLOR),
            Interaction::Hovered => (HOVERED_BUTTON, HOVERED_BUTTON_OUTLINE_COLOR),
            Interaction::None if toggled_on => (ACTIVE_BUTTON, PRESSED_BUTTON_OUTLINE_COLOR),
            Interaction::None => (NORMAL_BUTTON, NORMAL_BUTTON_OUTLINE_COLOR),
        };
        if background.0 != fill {
            background.0 = fill;
        }
        if border.0 != outline {
            border.0 = outline;
        }
    }

    for (interaction, button) in &pressed_buttons {
        if *interaction == Interaction::Pressed {
            // Errors are logged by the dispatcher
            let _ = dispatcher.dispatch_named(button.0, &mut ctx);
        }
    }
}

fn update_button_labels(
    dispatcher: Res<ActionDispatcher>,
    ctx: Res<EditorContext>,
    mut labels: Query<(&ActionLabel, &mut Text)>,
) {
    if !ctx.is_changed() {
        return;
    }
    for (label, mut text) in &mut labels {
        let Some(descriptor) = dispatcher.registry().get(label.0) else {
            continue;
        };
        let wanted = descriptor.label_with_chord(&ctx.ui);
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
}
