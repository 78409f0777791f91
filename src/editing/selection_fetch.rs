//! Background fetch of the selected marchers' positions
//!
//! Whenever the selection generation moves, a fetch for the new selection is
//! started on the IO task pool. Results are checked against the selection
//! that is current when they arrive; anything older is dropped.

use crate::core::errors::DrillResult;
use crate::core::state::{EditorContext, FetchTicket};
use crate::data::model::Position;
use crate::data::store::PositionQuery;
use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, IoTaskPool, Task};

pub struct SelectionFetchPlugin;

impl Plugin for SelectionFetchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionFetch>()
            .add_systems(Update, (start_selection_fetch, poll_selection_fetch).chain());
    }
}

struct PendingFetch {
    ticket: FetchTicket,
    task: Task<DrillResult<Vec<Position>>>,
}

#[derive(Resource, Default)]
pub struct SelectionFetch {
    /// Generation the last fetch was started for
    requested: Option<u64>,
    pending: Vec<PendingFetch>,
    /// Results dropped because the selection had moved on
    pub discarded: u64,
}

fn start_selection_fetch(ctx: Res<EditorContext>, mut fetch: ResMut<SelectionFetch>) {
    let generation = ctx.selection.generation();
    if fetch.requested == Some(generation) {
        return;
    }
    fetch.requested = Some(generation);
    let Some(ticket) = ctx.selection.begin_fetch() else {
        return;
    };

    let store = ctx.store.clone();
    let page = ticket.page;
    let task = IoTaskPool::get().spawn(async move {
        store.fetch_positions(PositionQuery::Page(page))
    });
    fetch.pending.push(PendingFetch { ticket, task });
}

fn poll_selection_fetch(mut ctx: ResMut<EditorContext>, mut fetch: ResMut<SelectionFetch>) {
    let fetch = &mut *fetch;
    let mut still_pending = Vec::with_capacity(fetch.pending.len());
    for mut pending in fetch.pending.drain(..) {
        let Some(result) = block_on(future::poll_once(&mut pending.task)) else {
            still_pending.push(pending);
            continue;
        };
        match result {
            Ok(positions) => {
                if ctx.selection.resolve_fetch(&pending.ticket, positions) {
                    ctx.scene.request_render();
                } else {
                    fetch.discarded += 1;
                    debug!(
                        "Discarding positions for stale selection generation {} ({} so far)",
                        pending.ticket.generation, fetch.discarded
                    );
                }
            }
            Err(err) => warn!("Selection fetch failed: {err}"),
        }
    }
    fetch.pending = still_pending;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::field::FieldConfig;
    use crate::data::model::MarcherId;
    use crate::data::store::InMemoryPositionStore;
    use crate::rendering::scene::RetainedScene;
    use crate::rendering::scene_sync::SceneSync;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::tasks::TaskPool;
    use kurbo::Point;
    use std::sync::Arc;

    fn app_with_marchers(count: u32) -> App {
        IoTaskPool::get_or_init(TaskPool::new);
        let store = InMemoryPositionStore::new(Point::new(10.0, 10.0));
        for order in 1..=count {
            store.add_marcher("F", order).unwrap();
        }
        let page = store.add_page(0, "1").unwrap();
        let mut ctx = EditorContext::new(
            Arc::new(store),
            Some(FieldConfig::default()),
            SceneSync::new(Box::new(RetainedScene::new())),
        );
        ctx.select_page(page).unwrap();

        let mut app = App::new();
        app.insert_resource(ctx).init_resource::<SelectionFetch>();
        app
    }

    fn select(app: &mut App, marchers: &[MarcherId]) {
        let mut ctx = app.world_mut().resource_mut::<EditorContext>();
        let ctx = &mut *ctx;
        ctx.scene.select_marchers(marchers, &ctx.ui, &mut ctx.selection);
    }

    fn poll_until_settled(app: &mut App) {
        for _ in 0..1000 {
            app.world_mut().run_system_once(poll_selection_fetch).unwrap();
            if app.world().resource::<SelectionFetch>().pending.is_empty() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        panic!("selection fetch never finished");
    }

    #[test]
    fn fetched_positions_land_on_the_selection() {
        let mut app = app_with_marchers(3);
        app.add_plugins(SelectionFetchPlugin);
        select(&mut app, &[MarcherId(1)]);

        app.update();
        poll_until_settled(&mut app);

        let ctx = app.world().resource::<EditorContext>();
        let positions = ctx.selection.selected_positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].marcher_id, MarcherId(1));
        assert_eq!(positions[0].point(), Point::new(10.0, 10.0));
        assert_eq!(app.world().resource::<SelectionFetch>().discarded, 0);
    }

    #[test]
    fn unchanged_selection_is_fetched_once() {
        let mut app = app_with_marchers(2);
        select(&mut app, &[MarcherId(0)]);

        app.world_mut().run_system_once(start_selection_fetch).unwrap();
        app.world_mut().run_system_once(start_selection_fetch).unwrap();

        assert_eq!(app.world().resource::<SelectionFetch>().pending.len(), 1);
        poll_until_settled(&mut app);
    }

    #[test]
    fn result_for_a_superseded_selection_is_discarded() {
        let mut app = app_with_marchers(2);
        select(&mut app, &[MarcherId(0)]);
        app.world_mut().run_system_once(start_selection_fetch).unwrap();

        // Selection moves on before the first fetch is polled
        select(&mut app, &[MarcherId(1)]);
        poll_until_settled(&mut app);

        let ctx = app.world().resource::<EditorContext>();
        assert!(ctx.selection.selected_positions().is_empty());
        assert_eq!(app.world().resource::<SelectionFetch>().discarded, 1);
    }

    #[test]
    fn empty_selection_starts_no_fetch() {
        let mut app = app_with_marchers(2);

        app.world_mut().run_system_once(start_selection_fetch).unwrap();

        let fetch = app.world().resource::<SelectionFetch>();
        assert!(fetch.pending.is_empty());
        assert!(fetch.requested.is_some());
    }
}
