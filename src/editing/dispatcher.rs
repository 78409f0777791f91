//! Action dispatch
//!
//! The single entry point for domain mutations. Key-downs are turned into
//! chord strings and looked up in a table built once from the registry;
//! toolbar buttons call `dispatch` directly, so both surfaces share one code
//! path per action.

use crate::core::errors::{DrillError, DrillResult};
use crate::core::state::{EditorContext, UiToggle};
use crate::data::field::FieldConfig;
use crate::data::model::{Page, PositionPatch};
use crate::data::store::PositionQuery;
use crate::editing::actions::{ActionId, ActionRegistry};
use crate::editing::chord::KeyEvent;
use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Padding around the field when the zoom is reset
const FIT_PADDING: f64 = 40.0;

/// What happened to a key-down
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Focus is in an editable control; the key belongs to it
    Ignored,
    /// No action is bound to this chord
    Unbound,
    /// An action ran (successfully or not); the host must suppress the
    /// key's default behavior
    Dispatched {
        action: ActionId,
        result: Result<(), DrillError>,
    },
}

impl KeyOutcome {
    pub fn prevent_default(&self) -> bool {
        matches!(self, KeyOutcome::Dispatched { .. })
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
    chords: HashMap<String, ActionId>,
}

impl ActionDispatcher {
    /// Builds the chord table. Two actions sharing a chord is a
    /// configuration error.
    pub fn new(registry: Arc<ActionRegistry>) -> DrillResult<Self> {
        let mut chords: HashMap<String, ActionId> = HashMap::new();
        for descriptor in registry.iter() {
            let Some(chord) = &descriptor.chord else {
                continue;
            };
            let canonical = chord.canonical();
            if let Some(first) = chords.get(&canonical) {
                return Err(DrillError::DuplicateChord {
                    chord: canonical,
                    first: first.name(),
                    second: descriptor.id.name(),
                });
            }
            chords.insert(canonical, descriptor.id);
        }
        debug!("Action dispatcher ready with {} chords", chords.len());
        Ok(Self { registry, chords })
    }

    pub fn registry(&self) -> &Arc<ActionRegistry> {
        &self.registry
    }

    pub fn lookup(&self, chord: &str) -> Option<ActionId> {
        self.chords.get(chord).copied()
    }

    pub fn handle_key_down(&self, event: &KeyEvent, ctx: &mut EditorContext) -> KeyOutcome {
        if event.focus.is_editable() {
            return KeyOutcome::Ignored;
        }
        let Some(action) = self.lookup(&event.chord_string()) else {
            return KeyOutcome::Unbound;
        };
        let result = self.dispatch(action, ctx);
        KeyOutcome::Dispatched { action, result }
    }

    /// Dispatch by the action's stable name, as UI bindings do
    pub fn dispatch_named(&self, name: &str, ctx: &mut EditorContext) -> DrillResult<()> {
        match ActionId::from_name(name) {
            Some(id) => self.dispatch(id, ctx),
            None => {
                let err = DrillError::UnknownAction(name.to_string());
                warn!("{err}");
                Err(err)
            }
        }
    }

    /// Runs one action to completion. Failures are logged and returned;
    /// they never leave a partial mutation behind.
    pub fn dispatch(&self, id: ActionId, ctx: &mut EditorContext) -> DrillResult<()> {
        if self.registry.get(id).is_none() {
            let err = DrillError::UnknownAction(id.name().to_string());
            warn!("{err}");
            return Err(err);
        }
        let result = run_action(id, ctx);
        match &result {
            Ok(()) => debug!("Dispatched {}", id.name()),
            Err(err) => warn!("Action {} failed: {err}", id.name()),
        }
        result
    }
}

fn run_action(id: ActionId, ctx: &mut EditorContext) -> DrillResult<()> {
    let page = ctx.current_page()?;
    let field = ctx.field()?.clone();

    let pages = ctx.pages()?;
    let previous = pages.previous(page.id).cloned();
    let next = pages.next(page.id).cloned();

    match id {
        ActionId::NextPage => go_to(ctx, next),
        ActionId::PreviousPage => go_to(ctx, previous),
        ActionId::FirstPage => go_to(ctx, pages.first().cloned()),
        ActionId::LastPage => go_to(ctx, pages.last().cloned()),
        ActionId::TogglePlay => toggle(ctx, UiToggle::Playing),
        ActionId::CopyPreviousPageToAll => copy_positions(ctx, &page, previous, false),
        ActionId::CopyPreviousPageToSelected => copy_positions(ctx, &page, previous, true),
        ActionId::CopyNextPageToAll => copy_positions(ctx, &page, next, false),
        ActionId::CopyNextPageToSelected => copy_positions(ctx, &page, next, true),
        ActionId::SnapToWholeStep => snap_selection(ctx, &page, &field),
        ActionId::ToggleLockX => toggle(ctx, UiToggle::LockX),
        ActionId::ToggleLockY => toggle(ctx, UiToggle::LockY),
        ActionId::TogglePreviousPaths => toggle(ctx, UiToggle::PreviousPaths),
        ActionId::ToggleNextPaths => toggle(ctx, UiToggle::NextPaths),
        ActionId::SelectAll => {
            let all: Vec<_> = ctx.marchers()?.iter().map(|marcher| marcher.id).collect();
            ctx.scene.select_marchers(&all, &ctx.ui, &mut ctx.selection);
            Ok(())
        }
        ActionId::ClearSelection => {
            ctx.scene.select_marchers(&[], &ctx.ui, &mut ctx.selection);
            Ok(())
        }
        ActionId::NudgeUp => nudge_selection(ctx, &page, &field, 0.0, -1.0),
        ActionId::NudgeDown => nudge_selection(ctx, &page, &field, 0.0, 1.0),
        ActionId::NudgeLeft => nudge_selection(ctx, &page, &field, -1.0, 0.0),
        ActionId::NudgeRight => nudge_selection(ctx, &page, &field, 1.0, 0.0),
        ActionId::ZoomIn | ActionId::ZoomOut => {
            let viewport = ctx.scene.viewport_mut();
            let center = viewport.screen_center();
            viewport.zoom_by_step(id == ActionId::ZoomIn, center);
            ctx.scene.request_render();
            Ok(())
        }
        ActionId::ResetZoom => {
            ctx.scene.viewport_mut().fit_world(field.bounds(), FIT_PADDING);
            ctx.scene.request_render();
            Ok(())
        }
    }
}

/// Navigation off either end of the show is a no-op
fn go_to(ctx: &mut EditorContext, page: Option<Page>) -> DrillResult<()> {
    match page {
        Some(page) => ctx.select_page(page.id),
        None => Ok(()),
    }
}

fn toggle(ctx: &mut EditorContext, toggle: UiToggle) -> DrillResult<()> {
    let value = ctx.ui.toggle(toggle);
    debug!("{toggle:?} is now {value}");
    ctx.after_toggle(toggle)
}

/// Copies every position of `source` onto `page`, or only the first
/// selected marcher's, as one batch
fn copy_positions(
    ctx: &mut EditorContext,
    page: &Page,
    source: Option<Page>,
    selected_only: bool,
) -> DrillResult<()> {
    let source = source.ok_or(DrillError::MissingPrecondition(
        "there is no page to copy positions from",
    ))?;
    let mut positions = ctx.store.fetch_positions(PositionQuery::Page(source.id))?;

    if selected_only {
        let marcher_id = *ctx
            .selection
            .marchers()
            .first()
            .ok_or(DrillError::MissingPrecondition("no marcher is selected"))?;
        positions.retain(|position| position.marcher_id == marcher_id);
        if positions.is_empty() {
            return Err(DrillError::MarcherNotFound {
                marcher_id,
                page_id: source.id,
            });
        }
    }

    let patches: Vec<PositionPatch> = positions
        .iter()
        .map(|position| position.on_page(page.id))
        .collect();
    let count = ctx.submit_patches(&patches)?;
    info!(
        "Copied {count} positions from '{}' to '{}'",
        source.name, page.name
    );
    Ok(())
}

/// Positions of the selected marchers on `page`
fn selected_positions(ctx: &EditorContext, page: &Page) -> DrillResult<Vec<PositionPatch>> {
    let selected = ctx.selection.marchers();
    if selected.is_empty() {
        return Err(DrillError::MissingPrecondition("no marcher is selected"));
    }
    let mut positions = ctx.store.fetch_positions(PositionQuery::Page(page.id))?;
    positions.retain(|position| selected.contains(&position.marcher_id));
    Ok(positions)
}

fn snap_selection(ctx: &mut EditorContext, page: &Page, field: &FieldConfig) -> DrillResult<()> {
    let (lock_x, lock_y) = (ctx.ui.lock_x, ctx.ui.lock_y);
    let patches: Vec<PositionPatch> = selected_positions(ctx, page)?
        .into_iter()
        .filter_map(|position| {
            let snapped = field.snap_to_whole_step(position.point(), lock_x, lock_y);
            (snapped != position.point())
                .then(|| PositionPatch::new(position.marcher_id, page.id, snapped.x, snapped.y))
        })
        .collect();
    ctx.submit_patches(&patches)?;
    Ok(())
}

/// Moves the selection one step; locked axes stay put
fn nudge_selection(
    ctx: &mut EditorContext,
    page: &Page,
    field: &FieldConfig,
    dx: f64,
    dy: f64,
) -> DrillResult<()> {
    let dx = if ctx.ui.lock_x { 0.0 } else { dx * field.pixels_per_step };
    let dy = if ctx.ui.lock_y { 0.0 } else { dy * field.pixels_per_step };
    if dx == 0.0 && dy == 0.0 {
        return Ok(());
    }
    let patches: Vec<PositionPatch> = selected_positions(ctx, page)?
        .into_iter()
        .map(|position| {
            PositionPatch::new(position.marcher_id, page.id, position.x + dx, position.y + dy)
        })
        .collect();
    ctx.submit_patches(&patches)?;
    Ok(())
}
