//! Drawing the retained scene
//!
//! Gizmos are immediate mode, so something has to be drawn every frame. What
//! gets drawn is a `FieldSnapshot` that is only rebuilt when the scene has a
//! render request pending; a mutation that forgets to request a render stays
//! invisible instead of being papered over by a per-frame rebuild.

use crate::core::settings::MARKER_RADIUS;
use crate::core::state::EditorContext;
use crate::geometry::grid::{build_grid, GridFidelity, GridLine, GridLineKind};
use crate::rendering::cameras::field_to_world;
use crate::rendering::scene::{SceneGraph, Tint, VisualKind};
use crate::ui::theme::*;
use bevy::prelude::*;

pub struct DrawPlugin;

impl Plugin for DrawPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FieldSnapshot>().add_systems(
            Update,
            (rebuild_snapshot, draw_snapshot, sync_marker_labels).chain(),
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Marker {
        center: Vec2,
        color: Color,
        selected: bool,
        lock_x: bool,
        lock_y: bool,
    },
    /// A marcher with no position on the page, drawn as a cross
    Unknown { center: Vec2, color: Color },
    Ghost { center: Vec2, color: Color },
    Pathway { from: Vec2, to: Vec2, color: Color },
}

/// Drill number drawn next to a live or unknown marker
#[derive(Debug, Clone, PartialEq)]
pub struct LabelItem {
    pub text: String,
    pub anchor: Vec2,
    pub color: Color,
}

/// Pooled text entity showing one `LabelItem`
#[derive(Component)]
pub struct MarkerLabel;

/// Everything the gizmo pass draws, in world units
#[derive(Resource, Debug, Default)]
pub struct FieldSnapshot {
    pub grid: Vec<(Vec2, Vec2, Color)>,
    /// Back to front
    pub items: Vec<DrawItem>,
    pub labels: Vec<LabelItem>,
    pub fidelity: Option<GridFidelity>,
    pub rebuilds: u64,
}

impl FieldSnapshot {
    /// Rebuilds from the scene. The grid is only rebuilt when the fidelity
    /// changed since the last pass.
    pub fn rebuild(
        &mut self,
        scene: &dyn SceneGraph,
        field: Option<&crate::data::field::FieldConfig>,
        fidelity: GridFidelity,
    ) {
        if self.fidelity != Some(fidelity) || self.grid.is_empty() {
            self.grid = field
                .map(|field| build_grid(field, fidelity))
                .unwrap_or_default()
                .iter()
                .map(grid_segment)
                .collect();
            self.fidelity = Some(fidelity);
        }

        self.items = scene
            .objects()
            .into_iter()
            .map(|object| {
                let center = field_to_world(object.position);
                let color = tint_color(object.tint);
                match &object.kind {
                    VisualKind::Marcher { .. } => DrawItem::Marker {
                        center,
                        color,
                        selected: object.selected,
                        lock_x: object.lock_x,
                        lock_y: object.lock_y,
                    },
                    VisualKind::Unknown { .. } => DrawItem::Unknown { center, color },
                    VisualKind::Ghost { .. } => DrawItem::Ghost { center, color },
                    VisualKind::Pathway { end, .. } => DrawItem::Pathway {
                        from: center,
                        to: field_to_world(*end),
                        color,
                    },
                }
            })
            .collect();

        self.labels = scene
            .objects()
            .into_iter()
            .filter(|object| !object.label.is_empty())
            .filter_map(|object| {
                let color = match object.kind {
                    VisualKind::Marcher { .. } => PRIMARY_TEXT_COLOR,
                    VisualKind::Unknown { .. } => SECONDARY_TEXT_COLOR,
                    VisualKind::Ghost { .. } | VisualKind::Pathway { .. } => return None,
                };
                Some(LabelItem {
                    text: object.label.clone(),
                    anchor: field_to_world(object.position)
                        + Vec2::new(0.0, MARKER_LABEL_OFFSET),
                    color,
                })
            })
            .collect();
        self.rebuilds += 1;
    }
}

fn tint_color(tint: Tint) -> Color {
    Color::srgba(tint.r, tint.g, tint.b, tint.a)
}

fn grid_segment(line: &GridLine) -> (Vec2, Vec2, Color) {
    let color = match line.kind {
        GridLineKind::Boundary => BOUNDARY_LINE_COLOR,
        GridLineKind::YardLine => YARD_LINE_COLOR,
        GridLineKind::HashTick => HASH_TICK_COLOR,
        GridLineKind::Step => STEP_LINE_COLOR,
    };
    (field_to_world(line.from), field_to_world(line.to), color)
}

fn rebuild_snapshot(mut ctx: ResMut<EditorContext>, mut snapshot: ResMut<FieldSnapshot>) {
    // Consuming the request is not an edit; keep the HUD from refreshing
    if !ctx
        .bypass_change_detection()
        .scene
        .graph_mut()
        .take_render_request()
    {
        return;
    }
    let fidelity = ctx.scene.viewport().grid_fidelity();
    snapshot.rebuild(ctx.scene.graph(), ctx.field.as_ref(), fidelity);
}

fn draw_snapshot(mut gizmos: Gizmos, snapshot: Res<FieldSnapshot>) {
    for (from, to, color) in &snapshot.grid {
        gizmos.line_2d(*from, *to, *color);
    }

    let radius = MARKER_RADIUS as f32;
    for item in &snapshot.items {
        match item {
            DrawItem::Pathway { from, to, color } => {
                gizmos.line_2d(*from, *to, *color);
            }
            DrawItem::Ghost { center, color } => {
                gizmos.circle_2d(
                    Isometry2d::from_translation(*center),
                    radius * GHOST_RADIUS_RATIO,
                    *color,
                );
            }
            DrawItem::Unknown { center, color } => {
                let d = Vec2::splat(radius * 0.7);
                gizmos.line_2d(*center - d, *center + d, *color);
                gizmos.line_2d(
                    *center + Vec2::new(-d.x, d.y),
                    *center + Vec2::new(d.x, -d.y),
                    *color,
                );
            }
            DrawItem::Marker {
                center,
                color,
                selected,
                lock_x,
                lock_y,
            } => {
                let iso = Isometry2d::from_translation(*center);
                gizmos.circle_2d(iso, radius, *color);
                if *selected {
                    gizmos.circle_2d(iso, radius + 3.0, SELECTED_MARKER_COLOR);
                }
                // A locked axis is marked by a bar across it
                if *lock_x {
                    let half = Vec2::new(0.0, radius + 5.0);
                    gizmos.line_2d(*center - half, *center + half, LOCK_INDICATOR_COLOR);
                }
                if *lock_y {
                    let half = Vec2::new(radius + 5.0, 0.0);
                    gizmos.line_2d(*center - half, *center + half, LOCK_INDICATOR_COLOR);
                }
            }
        }
    }
}

/// Points the pooled label entities at the snapshot's labels, spawning
/// more when needed and hiding the surplus
fn sync_marker_labels(
    mut commands: Commands,
    snapshot: Res<FieldSnapshot>,
    mut pool: Query<
        (&mut Text2d, &mut Transform, &mut TextColor, &mut Visibility),
        With<MarkerLabel>,
    >,
) {
    if !snapshot.is_changed() {
        return;
    }
    let mut wanted = snapshot.labels.iter();
    for (mut text, mut transform, mut color, mut visibility) in &mut pool {
        match wanted.next() {
            Some(label) => {
                if text.0 != label.text {
                    text.0 = label.text.clone();
                }
                transform.translation = label.anchor.extend(1.0);
                color.0 = label.color;
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
    for label in wanted {
        commands.spawn((
            Text2d::new(label.text.clone()),
            TextFont {
                font_size: MARKER_LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(label.color),
            Transform::from_translation(label.anchor.extend(1.0)),
            MarkerLabel,
        ));
    }
}
