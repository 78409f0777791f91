//! Keeps the scene graph consistent with the position store
//!
//! `SceneSync` owns every visual object on the field. Live markers are keyed
//! by marcher identity so repeated syncs update in place instead of
//! recreating objects; ghosts and pathways are transient and swept by kind.
//! Nothing here redraws on its own: every mutation that changes what is
//! visible ends in an explicit `request_render`.

use crate::core::settings::UNKNOWN_MARKER_SPACING;
use crate::core::state::{SelectionState, UiSettings};
use crate::data::field::FieldConfig;
use crate::data::model::{Marcher, MarcherId, PageId, Position, PositionPatch};
use crate::rendering::scene::{
    ActiveSelection, ObjectId, SceneGraph, Tint, VisualKind, VisualObject,
    LIVE_MARKER_TINT, UNKNOWN_MARKER_TINT,
};
use crate::rendering::viewport::ViewportController;
use bevy::prelude::*;
use kurbo::{Point, Vec2};
use std::collections::{HashMap, HashSet};

/// What a sync pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    /// Positions whose marcher was not in the marcher set
    pub skipped: usize,
}

/// Pointer drag over the active selection
#[derive(Debug, Clone)]
struct DragState {
    pointer_origin: Point,
    object_origins: Vec<(ObjectId, Point)>,
}

pub struct SceneSync {
    graph: Box<dyn SceneGraph>,
    live: HashMap<MarcherId, ObjectId>,
    unknown: HashMap<MarcherId, ObjectId>,
    viewport: ViewportController,
    drag: Option<DragState>,
}

impl SceneSync {
    pub fn new(graph: Box<dyn SceneGraph>) -> Self {
        Self {
            graph,
            live: HashMap::new(),
            unknown: HashMap::new(),
            viewport: ViewportController::default(),
            drag: None,
        }
    }

    pub fn graph(&self) -> &dyn SceneGraph {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> &mut dyn SceneGraph {
        self.graph.as_mut()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn request_render(&mut self) {
        self.graph.request_render();
    }

    /// Advances the viewport settle timer; a settled zoom needs one redraw
    pub fn tick(&mut self, now: f64) {
        if self.viewport.tick(now) {
            self.graph.request_render();
        }
    }

    /// The live marker for a marcher, if one is rendered
    pub fn marker_for(&self, marcher_id: MarcherId) -> Option<&VisualObject> {
        self.live.get(&marcher_id).and_then(|id| self.graph.get(*id))
    }

    pub fn live_marker_count(&self) -> usize {
        self.live.len()
    }

    pub fn unknown_marker_count(&self) -> usize {
        self.unknown.len()
    }

    //--------------------------------------------------------------------------
    // Live markers
    //--------------------------------------------------------------------------

    /// Creates or moves one live marker per position. Markers for marchers
    /// that are not in `positions` are left alone; see `sync_page`.
    pub fn render_marchers(&mut self, positions: &[Position], marchers: &[Marcher]) -> SyncReport {
        let by_id: HashMap<MarcherId, &Marcher> =
            marchers.iter().map(|marcher| (marcher.id, marcher)).collect();
        let mut report = SyncReport::default();

        for position in positions {
            let Some(marcher) = by_id.get(&position.marcher_id) else {
                warn!(
                    "Position on page {} references unknown marcher {}, skipping",
                    position.page_id, position.marcher_id
                );
                report.skipped += 1;
                continue;
            };

            if let Some(placeholder) = self.unknown.remove(&position.marcher_id) {
                self.graph.remove(placeholder);
                report.removed += 1;
            }

            let target = position.point();
            match self.live.get(&position.marcher_id).copied() {
                Some(object_id) => {
                    let Some(object) = self.graph.get_mut(object_id) else {
                        // The graph lost the object behind our back; recreate it
                        self.live.remove(&position.marcher_id);
                        self.insert_live_marker(marcher, target);
                        report.created += 1;
                        continue;
                    };
                    let label = marcher.label();
                    let relabeled = object.label != label;
                    if relabeled {
                        object.label = label;
                    }
                    let moved = object.position != target;
                    if moved {
                        self.graph.set_coordinates(object_id, target);
                    }
                    if relabeled || moved {
                        report.updated += 1;
                    }
                }
                None => {
                    self.insert_live_marker(marcher, target);
                    report.created += 1;
                }
            }
        }

        if report != SyncReport::default() {
            debug!(
                "[render_marchers] created={} updated={} skipped={}",
                report.created, report.updated, report.skipped
            );
            self.graph.request_render();
        }
        report
    }

    fn insert_live_marker(&mut self, marcher: &Marcher, position: Point) {
        let object = VisualObject::new(
            VisualKind::Marcher {
                marcher_id: marcher.id,
            },
            position,
            marcher.label(),
            LIVE_MARKER_TINT,
        );
        let object_id = self.graph.add(object);
        self.live.insert(marcher.id, object_id);
    }

    /// Full reconciliation for a page transition: adds and moves markers,
    /// removes markers of marchers without a position on the page, and
    /// parks an unknown-position marker below the field for each of those
    /// that still exists.
    pub fn sync_page(
        &mut self,
        positions: &[Position],
        marchers: &[Marcher],
        field: &FieldConfig,
    ) -> SyncReport {
        // Drag origins belong to the page being left
        if self.drag.is_some() {
            debug!("[sync_page] page changed under a drag, cancelling it");
            self.cancel_drag();
        }
        let mut report = self.render_marchers(positions, marchers);

        let placed: HashSet<MarcherId> = positions
            .iter()
            .map(|position| position.marcher_id)
            .filter(|id| self.live.contains_key(id))
            .collect();

        let stale: Vec<MarcherId> = self
            .live
            .keys()
            .filter(|id| !placed.contains(id))
            .copied()
            .collect();
        for marcher_id in stale {
            if let Some(object_id) = self.live.remove(&marcher_id) {
                self.graph.remove(object_id);
                report.removed += 1;
            }
        }

        let existing: HashSet<MarcherId> = marchers.iter().map(|m| m.id).collect();
        let orphaned: Vec<MarcherId> = self
            .unknown
            .keys()
            .filter(|id| !existing.contains(id))
            .copied()
            .collect();
        for marcher_id in orphaned {
            if let Some(object_id) = self.unknown.remove(&marcher_id) {
                self.graph.remove(object_id);
                report.removed += 1;
            }
        }

        let parking_y = field.height_px() + 2.0 * UNKNOWN_MARKER_SPACING;
        let mut holes: Vec<&Marcher> = marchers
            .iter()
            .filter(|marcher| !placed.contains(&marcher.id))
            .collect();
        holes.sort_by_key(|marcher| marcher.id);
        for (slot, marcher) in holes.into_iter().enumerate() {
            let spot = Point::new(UNKNOWN_MARKER_SPACING * (slot as f64 + 1.0), parking_y);
            match self.unknown.get(&marcher.id).copied() {
                Some(object_id) => {
                    if self.graph.get(object_id).map(|o| o.position) != Some(spot) {
                        self.graph.set_coordinates(object_id, spot);
                    }
                }
                None => {
                    let object_id = self.graph.add(VisualObject::new(
                        VisualKind::Unknown {
                            marcher_id: marcher.id,
                        },
                        spot,
                        format!("{}?", marcher.label()),
                        UNKNOWN_MARKER_TINT,
                    ));
                    self.unknown.insert(marcher.id, object_id);
                    report.created += 1;
                }
            }
        }

        self.graph.request_render();
        report
    }

    //--------------------------------------------------------------------------
    // Ghosts and pathways
    //--------------------------------------------------------------------------

    /// Adds non-interactive previews of another page's positions
    pub fn render_static_marchers(
        &mut self,
        tint: Tint,
        positions: &[Position],
        marchers: &[Marcher],
    ) -> usize {
        let labels: HashMap<MarcherId, String> =
            marchers.iter().map(|m| (m.id, m.label())).collect();
        let mut added = 0;
        for position in positions {
            let Some(label) = labels.get(&position.marcher_id) else {
                warn!(
                    "Ghost for unknown marcher {} on page {}, skipping",
                    position.marcher_id, position.page_id
                );
                continue;
            };
            self.graph.add(VisualObject::new(
                VisualKind::Ghost {
                    marcher_id: position.marcher_id,
                    page_id: position.page_id,
                },
                position.point(),
                label.clone(),
                tint,
            ));
            added += 1;
        }
        self.graph.request_render();
        added
    }

    pub fn remove_static_markers(&mut self) -> usize {
        self.sweep(|kind| matches!(kind, VisualKind::Ghost { .. }))
    }

    /// Draws one segment per marcher from its `start` to its `end` position.
    /// Marchers with no start position are reported and skipped.
    pub fn render_pathways(&mut self, start: &[Position], end: &[Position], tint: Tint) -> usize {
        let starts: HashMap<MarcherId, Point> = start
            .iter()
            .map(|position| (position.marcher_id, position.point()))
            .collect();
        let mut added = 0;
        for position in end {
            let Some(from) = starts.get(&position.marcher_id) else {
                warn!(
                    "No start position for marcher {}, skipping its pathway",
                    position.marcher_id
                );
                continue;
            };
            self.graph.add(VisualObject::new(
                VisualKind::Pathway {
                    marcher_id: position.marcher_id,
                    end: position.point(),
                },
                *from,
                String::new(),
                tint,
            ));
            added += 1;
        }
        self.graph.request_render();
        added
    }

    pub fn remove_pathways(&mut self) -> usize {
        self.sweep(|kind| matches!(kind, VisualKind::Pathway { .. }))
    }

    fn sweep(&mut self, doomed: impl Fn(&VisualKind) -> bool) -> usize {
        let ids: Vec<ObjectId> = self
            .graph
            .objects()
            .into_iter()
            .filter(|object| doomed(&object.kind))
            .map(|object| object.id)
            .collect();
        for id in &ids {
            self.graph.remove(*id);
        }
        if !ids.is_empty() {
            self.graph.request_render();
        }
        ids.len()
    }

    //--------------------------------------------------------------------------
    // Selection
    //--------------------------------------------------------------------------

    /// Rebuilds the active selection from `selected` and publishes the
    /// selected marchers. Only live markers take part: with several objects
    /// selected the previous active representation is discarded and a
    /// composite of live markers is built, so ghosts or pathways never get
    /// transformed along with them.
    pub fn set_selected_markers(
        &mut self,
        selected: &[ObjectId],
        ui: &UiSettings,
        selection: &mut SelectionState,
    ) -> Vec<MarcherId> {
        let live: Vec<ObjectId> = selected
            .iter()
            .copied()
            .filter(|id| {
                self.graph
                    .get(*id)
                    .is_some_and(|object| object.kind.is_interactive())
            })
            .collect();

        if selected.len() > 1 {
            self.graph.set_active_objects(ActiveSelection::None);
        }
        let active = match live.as_slice() {
            [] => ActiveSelection::None,
            [single] => ActiveSelection::Single(*single),
            _ => ActiveSelection::Composite(live.clone()),
        };
        self.graph.set_active_objects(active);
        self.refresh_selection_flags(ui);

        let marchers: Vec<MarcherId> = self
            .graph
            .active_objects()
            .ids()
            .into_iter()
            .filter_map(|id| self.graph.get(id))
            .filter_map(|object| match object.kind {
                VisualKind::Marcher { marcher_id } => Some(marcher_id),
                _ => None,
            })
            .collect();

        selection.set_marchers(marchers.clone());
        self.graph.request_render();
        marchers
    }

    /// Selects the live markers of the given marchers
    pub fn select_marchers(
        &mut self,
        marcher_ids: &[MarcherId],
        ui: &UiSettings,
        selection: &mut SelectionState,
    ) -> Vec<MarcherId> {
        let objects: Vec<ObjectId> = marcher_ids
            .iter()
            .filter_map(|id| self.live.get(id).copied())
            .collect();
        self.set_selected_markers(&objects, ui, selection)
    }

    /// Adds or removes one object from the current selection (shift-click)
    pub fn toggle_in_selection(
        &mut self,
        object_id: ObjectId,
        ui: &UiSettings,
        selection: &mut SelectionState,
    ) -> Vec<MarcherId> {
        let mut ids = self.graph.active_objects().ids();
        if let Some(index) = ids.iter().position(|id| *id == object_id) {
            ids.remove(index);
        } else {
            ids.push(object_id);
        }
        self.set_selected_markers(&ids, ui, selection)
    }

    /// Re-applies the axis locks to the active objects after a toggle
    pub fn apply_axis_locks(&mut self, ui: &UiSettings) {
        self.refresh_selection_flags(ui);
        self.graph.request_render();
    }

    fn refresh_selection_flags(&mut self, ui: &UiSettings) {
        let active: HashSet<ObjectId> = self.graph.active_objects().ids().into_iter().collect();
        let all: Vec<ObjectId> = self.graph.objects().iter().map(|o| o.id).collect();
        for id in all {
            if let Some(object) = self.graph.get_mut(id) {
                let is_active = active.contains(&id);
                object.selected = is_active;
                object.lock_x = is_active && ui.lock_x;
                object.lock_y = is_active && ui.lock_y;
            }
        }
        for id in &active {
            self.graph.bring_to_front(*id);
        }
    }

    pub fn hit_test(&self, world: Point) -> Option<ObjectId> {
        self.graph.hit_test(world)
    }

    //--------------------------------------------------------------------------
    // Dragging
    //--------------------------------------------------------------------------

    /// Starts dragging the active selection from `pointer` (field space)
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        let object_origins: Vec<(ObjectId, Point)> = self
            .graph
            .active_objects()
            .ids()
            .into_iter()
            .filter_map(|id| self.graph.get(id).map(|object| (id, object.position)))
            .collect();
        if object_origins.is_empty() {
            return false;
        }
        self.drag = Some(DragState {
            pointer_origin: pointer,
            object_origins,
        });
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Moves the dragged objects so they follow `pointer`, honoring each
    /// object's axis locks
    pub fn drag_to(&mut self, pointer: Point) {
        let Some(drag) = &self.drag else {
            return;
        };
        let delta: Vec2 = pointer - drag.pointer_origin;
        let moves: Vec<(ObjectId, Point)> = drag
            .object_origins
            .iter()
            .filter_map(|(id, origin)| {
                let object = self.graph.get(*id)?;
                let target = Point::new(
                    if object.lock_x { origin.x } else { origin.x + delta.x },
                    if object.lock_y { origin.y } else { origin.y + delta.y },
                );
                (object.position != target).then_some((*id, target))
            })
            .collect();
        for (id, target) in moves {
            self.graph.set_coordinates(id, target);
        }
        self.graph.request_render();
    }

    /// Abandons the drag and puts the dragged objects back
    pub fn cancel_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        for (id, origin) in drag.object_origins {
            self.graph.set_coordinates(id, origin);
        }
        self.graph.request_render();
    }

    /// Ends the drag and returns the moved markers as one patch list for
    /// `page_id`. Empty when nothing moved.
    pub fn finish_drag(&mut self, page_id: PageId) -> Vec<PositionPatch> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        drag.object_origins
            .iter()
            .filter_map(|(id, origin)| {
                let object = self.graph.get(*id)?;
                if object.position == *origin {
                    return None;
                }
                match object.kind {
                    VisualKind::Marcher { marcher_id } => Some(Position::new(
                        marcher_id,
                        page_id,
                        object.position.x,
                        object.position.y,
                    )),
                    _ => None,
                }
            })
            .collect()
    }
}
