//! Status pane
//!
//! Shows the selected page, the zoom level, the selected marchers with
//! their field coordinates, and the step size extremes for the page.

use crate::core::state::EditorContext;
use crate::data::model::MarcherId;
use crate::ui::theme::*;
use bevy::prelude::*;
use std::collections::HashMap;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_hud);
    }
}

#[derive(Component)]
pub struct HudText;

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(WIDGET_MARGIN),
                bottom: Val::Px(WIDGET_MARGIN),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(WIDGET_PADDING)),
                border: UiRect::all(Val::Px(WIDGET_BORDER_WIDTH)),
                row_gap: Val::Px(WIDGET_ROW_GAP),
                ..default()
            },
            BackgroundColor(WIDGET_BACKGROUND_COLOR),
            BorderColor(WIDGET_BORDER_COLOR),
            Name::new("StatusPane"),
        ))
        .with_children(|pane| {
            pane.spawn((
                Text::new(""),
                TextFont {
                    font_size: WIDGET_TEXT_FONT_SIZE,
                    ..default()
                },
                TextColor(PRIMARY_TEXT_COLOR),
                HudText,
            ));
        });
}

/// Lines shown in the status pane
pub fn status_lines(ctx: &EditorContext) -> Vec<String> {
    let mut lines = Vec::new();
    match ctx.current_page() {
        Ok(page) => lines.push(format!("Page {} ({} counts)", page.name, page.counts)),
        Err(_) => lines.push("No page selected".to_string()),
    }
    lines.push(format!(
        "Zoom {:.0}%",
        ctx.scene.viewport().zoom() * 100.0
    ));

    let labels: HashMap<MarcherId, String> = ctx
        .marchers()
        .unwrap_or_default()
        .into_iter()
        .map(|marcher| (marcher.id, marcher.label()))
        .collect();
    if let Some(field) = &ctx.field {
        for position in ctx.selection.selected_positions() {
            let label = labels
                .get(&position.marcher_id)
                .cloned()
                .unwrap_or_else(|| position.marcher_id.to_string());
            lines.push(format!(
                "{label}: {} | {}",
                field.describe_x(position.x),
                field.describe_y(position.y)
            ));
        }
    }

    match ctx.page_step_range() {
        Ok(Some(range)) => {
            let name = |id: MarcherId| labels.get(&id).cloned().unwrap_or_else(|| id.to_string());
            lines.push(format!(
                "Largest step: {} ({})",
                range.largest.1,
                name(range.largest.0)
            ));
            lines.push(format!(
                "Smallest step: {} ({})",
                range.smallest.1,
                name(range.smallest.0)
            ));
        }
        Ok(None) => {}
        Err(err) => debug!("No step sizes: {err}"),
    }
    lines
}

fn update_hud(ctx: Res<EditorContext>, mut text: Query<&mut Text, With<HudText>>) {
    if !ctx.is_changed() {
        return;
    }
    let Ok(mut text) = text.single_mut() else {
        return;
    };
    let wanted = status_lines(&ctx).join("\n");
    if text.0 != wanted {
        text.0 = wanted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::field::FieldConfig;
    use crate::data::store::InMemoryPositionStore;
    use crate::rendering::scene::RetainedScene;
    use crate::rendering::scene_sync::SceneSync;
    use std::sync::Arc;

    #[test]
    fn status_names_page_and_zoom() {
        let store = InMemoryPositionStore::new(kurbo::Point::new(800.0, 850.0));
        store.add_marcher("T", 1).unwrap();
        let page = store.add_page(0, "Opener").unwrap();
        let mut ctx = EditorContext::new(
            Arc::new(store),
            Some(FieldConfig::default()),
            SceneSync::new(Box::new(RetainedScene::new())),
        );
        ctx.select_page(page).unwrap();

        let lines = status_lines(&ctx);
        assert_eq!(lines[0], "Page Opener (0 counts)");
        assert_eq!(lines[1], "Zoom 100%");
    }

    #[test]
    fn status_without_page() {
        let ctx = EditorContext::new(
            Arc::new(InMemoryPositionStore::new(kurbo::Point::ZERO)),
            None,
            SceneSync::new(Box::new(RetainedScene::new())),
        );
        assert_eq!(status_lines(&ctx)[0], "No page selected");
    }
}
