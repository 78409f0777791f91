//! The editor context
//!
//! One `EditorContext` is built at startup and handed to the dispatcher and
//! to the Bevy systems. It ties the store, the field, the selection, the UI
//! toggles and the scene together, and owns the refresh rules: after any
//! successful store update the caller re-fetches through `refresh_scene`.

use crate::core::errors::{DrillError, DrillResult};
use crate::core::state::{SelectionState, UiSettings, UiToggle};
use crate::data::field::FieldConfig;
use crate::data::model::{Marcher, Page, PageId, PageSequence, PositionPatch};
use crate::data::store::{PositionQuery, PositionStore};
use crate::geometry::step_size::{step_size_range, StepSizeRange};
use crate::rendering::scene::{NEXT_PAGE_TINT, PREVIOUS_PAGE_TINT};
use crate::rendering::scene_sync::SceneSync;
use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Resource)]
pub struct EditorContext {
    pub store: Arc<dyn PositionStore>,
    pub field: Option<FieldConfig>,
    pub selection: SelectionState,
    pub ui: UiSettings,
    pub scene: SceneSync,
    settings_path: Option<PathBuf>,
}

impl EditorContext {
    pub fn new(store: Arc<dyn PositionStore>, field: Option<FieldConfig>, scene: SceneSync) -> Self {
        Self {
            store,
            field,
            selection: SelectionState::default(),
            ui: UiSettings::default(),
            scene,
            settings_path: None,
        }
    }

    /// Starts from saved toggles; later toggles are written back to `path`
    pub fn with_ui_settings(mut self, ui: UiSettings, path: Option<PathBuf>) -> Self {
        self.ui = ui;
        self.settings_path = path;
        self
    }

    pub fn pages(&self) -> DrillResult<PageSequence> {
        self.store.pages()
    }

    pub fn marchers(&self) -> DrillResult<Vec<Marcher>> {
        self.store.marchers()
    }

    /// The selected page, which must still exist in the store
    pub fn current_page(&self) -> DrillResult<Page> {
        let page_id = self
            .selection
            .page()
            .ok_or(DrillError::MissingPrecondition("no page is selected"))?;
        self.pages()?
            .get(page_id)
            .cloned()
            .ok_or(DrillError::MissingPrecondition("selected page no longer exists"))
    }

    pub fn field(&self) -> DrillResult<&FieldConfig> {
        self.field
            .as_ref()
            .ok_or(DrillError::MissingPrecondition("no field configuration"))
    }

    /// Switches the selected page and rebuilds the scene for it
    pub fn select_page(&mut self, page_id: PageId) -> DrillResult<()> {
        let previous = self.selection.page();
        self.selection.set_page(Some(page_id));
        if let Err(err) = self.refresh_scene() {
            self.selection.set_page(previous);
            return Err(err);
        }
        Ok(())
    }

    /// Re-fetches the selected page and reconciles the scene with it,
    /// including overlays and the selection
    pub fn refresh_scene(&mut self) -> DrillResult<()> {
        let page = self.current_page()?;
        let Some(field) = self.field.as_ref() else {
            return Err(DrillError::MissingPrecondition("no field configuration"));
        };
        let marchers = self.store.marchers()?;
        let positions = self.store.fetch_positions(PositionQuery::Page(page.id))?;

        let report = self.scene.sync_page(&positions, &marchers, field);
        debug!(
            "[refresh_scene] page '{}': created={} updated={} removed={} skipped={}",
            page.name, report.created, report.updated, report.removed, report.skipped
        );

        self.refresh_overlays()?;

        let selected = self.selection.marchers().to_vec();
        self.scene
            .select_marchers(&selected, &self.ui, &mut self.selection);
        Ok(())
    }

    /// Rebuilds ghosts and pathways for the previous/next pages according
    /// to the path toggles
    pub fn refresh_overlays(&mut self) -> DrillResult<()> {
        self.scene.remove_static_markers();
        self.scene.remove_pathways();

        let page = self.current_page()?;
        let pages = self.pages()?;
        let marchers = self.store.marchers()?;
        let current = self.store.fetch_positions(PositionQuery::Page(page.id))?;

        if self.ui.show_previous_paths {
            if let Some(previous) = pages.previous(page.id) {
                let earlier = self.store.fetch_positions(PositionQuery::Page(previous.id))?;
                self.scene
                    .render_static_marchers(PREVIOUS_PAGE_TINT, &earlier, &marchers);
                self.scene.render_pathways(&earlier, &current, PREVIOUS_PAGE_TINT);
            }
        }
        if self.ui.show_next_paths {
            if let Some(next) = pages.next(page.id) {
                let later = self.store.fetch_positions(PositionQuery::Page(next.id))?;
                self.scene
                    .render_static_marchers(NEXT_PAGE_TINT, &later, &marchers);
                self.scene.render_pathways(&current, &later, NEXT_PAGE_TINT);
            }
        }
        self.scene.request_render();
        Ok(())
    }

    /// Submits a batch as a single store call, then refreshes the scene.
    /// A failed refresh after a successful write is reported as
    /// `RefreshAfterWrite`, so callers can tell it from a rejected batch.
    pub fn submit_patches(&mut self, patches: &[PositionPatch]) -> DrillResult<usize> {
        if patches.is_empty() {
            return Ok(0);
        }
        self.store.update_positions(patches)?;
        self.selection.invalidate();
        self.refresh_scene()
            .map_err(|err| DrillError::RefreshAfterWrite {
                saved: patches.len(),
                source: Box::new(err),
            })?;
        Ok(patches.len())
    }

    /// Explicit setter for a toggle; persists and re-renders like a
    /// dispatched toggle would
    pub fn set_toggle(&mut self, toggle: UiToggle, value: bool) -> DrillResult<()> {
        self.ui.set(toggle, value);
        self.after_toggle(toggle)
    }

    pub(crate) fn after_toggle(&mut self, toggle: UiToggle) -> DrillResult<()> {
        self.persist_settings();
        match toggle {
            UiToggle::LockX | UiToggle::LockY => {
                self.scene.apply_axis_locks(&self.ui);
                Ok(())
            }
            UiToggle::PreviousPaths | UiToggle::NextPaths => self.refresh_overlays(),
            UiToggle::Playing => {
                self.scene.request_render();
                Ok(())
            }
        }
    }

    /// Writes the toggles to the settings file, if there is one. Failure to
    /// save is logged and otherwise ignored.
    pub fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = self.ui.save_to_path(path) {
            warn!("Could not save UI settings: {err:#}");
        }
    }

    /// Step size extremes for travel into the selected page
    pub fn page_step_range(&self) -> DrillResult<Option<StepSizeRange>> {
        let page = self.current_page()?;
        let field = self.field()?;
        let Some(previous) = self.pages()?.previous(page.id).cloned() else {
            return Ok(None);
        };
        let start = self.store.fetch_positions(PositionQuery::Page(previous.id))?;
        let end = self.store.fetch_positions(PositionQuery::Page(page.id))?;
        Ok(step_size_range(&start, &end, &page, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MarcherId, Position};
    use crate::data::store::InMemoryPositionStore;
    use crate::rendering::scene::RetainedScene;
    use kurbo::Point;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Accepts writes, then fails every read that follows one
    struct WriteOnlyAfterUpdate {
        inner: InMemoryPositionStore,
        reads_broken: AtomicBool,
    }

    impl PositionStore for WriteOnlyAfterUpdate {
        fn marchers(&self) -> DrillResult<Vec<Marcher>> {
            self.inner.marchers()
        }

        fn pages(&self) -> DrillResult<PageSequence> {
            self.inner.pages()
        }

        fn fetch_positions(&self, query: PositionQuery) -> DrillResult<Vec<Position>> {
            if self.reads_broken.load(Ordering::SeqCst) {
                return Err(DrillError::Store("read timed out".to_string()));
            }
            self.inner.fetch_positions(query)
        }

        fn update_positions(&self, patches: &[PositionPatch]) -> DrillResult<()> {
            self.inner.update_positions(patches)?;
            self.reads_broken.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn context(store: Arc<dyn PositionStore>) -> EditorContext {
        EditorContext::new(
            store,
            Some(FieldConfig::default()),
            SceneSync::new(Box::new(RetainedScene::new())),
        )
    }

    #[test]
    fn failed_refresh_is_not_reported_as_a_failed_write() {
        let inner = InMemoryPositionStore::new(Point::ZERO);
        inner.add_marcher("T", 1).unwrap();
        let page = inner.add_page(0, "1").unwrap();
        let store = Arc::new(WriteOnlyAfterUpdate {
            inner,
            reads_broken: AtomicBool::new(false),
        });
        let mut ctx = context(store.clone());
        ctx.select_page(page).unwrap();

        let result = ctx.submit_patches(&[Position::new(MarcherId(0), page, 7.0, 9.0)]);

        assert!(matches!(
            result,
            Err(DrillError::RefreshAfterWrite { saved: 1, .. })
        ));
        store.reads_broken.store(false, Ordering::SeqCst);
        let saved = store.fetch_positions(PositionQuery::Page(page)).unwrap();
        assert_eq!(saved[0].point(), Point::new(7.0, 9.0));
    }

    #[test]
    fn rejected_batch_is_reported_as_is() {
        let store = InMemoryPositionStore::new(Point::ZERO);
        let page = store.add_page(0, "1").unwrap();
        let mut ctx = context(Arc::new(store));
        ctx.select_page(page).unwrap();

        let result = ctx.submit_patches(&[Position::new(MarcherId(5), page, 1.0, 1.0)]);

        assert!(matches!(result, Err(DrillError::InvalidPatch { .. })));
    }

    #[test]
    fn renamed_marcher_is_relabeled_on_refresh() {
        let store = Arc::new(InMemoryPositionStore::new(Point::new(40.0, 40.0)));
        let marcher = store.add_marcher("T", 1).unwrap();
        let page = store.add_page(0, "1").unwrap();
        let mut ctx = context(store.clone());
        ctx.select_page(page).unwrap();
        ctx.scene.graph_mut().take_render_request();

        store.set_marcher_label(marcher, "M", 4).unwrap();
        ctx.refresh_scene().unwrap();

        assert_eq!(ctx.scene.marker_for(marcher).unwrap().label, "M4");
        assert!(ctx.scene.graph_mut().take_render_request());
    }

    #[test]
    fn toggles_are_written_to_the_settings_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = InMemoryPositionStore::new(Point::ZERO);
        let page = store.add_page(0, "1").unwrap();
        let mut ctx = context(Arc::new(store))
            .with_ui_settings(UiSettings::default(), Some(path.clone()));
        ctx.select_page(page).unwrap();

        ctx.set_toggle(UiToggle::LockX, true).unwrap();

        let saved = UiSettings::load_from_path(&path).unwrap();
        assert!(saved.lock_x);
    }
}
