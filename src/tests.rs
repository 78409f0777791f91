//! Tests that cross module boundaries: store, scene sync, dispatcher and
//! selection working together

use crate::core::app::seed_show;
use crate::core::state::{EditorContext, UiToggle};
use crate::data::field::FieldConfig;
use crate::data::model::{MarcherId, PageId, Position};
use crate::data::store::{InMemoryPositionStore, PositionQuery, PositionStore};
use crate::editing::actions::{ActionId, ActionRegistry};
use crate::editing::chord::{FocusTarget, KeyEvent};
use crate::editing::dispatcher::{ActionDispatcher, KeyOutcome};
use crate::geometry::step_size::StepSize;
use crate::rendering::scene::{RetainedScene, VisualKind};
use crate::rendering::scene_sync::SceneSync;
use kurbo::Point;
use std::sync::Arc;

fn editor(store: InMemoryPositionStore) -> EditorContext {
    EditorContext::new(
        Arc::new(store),
        Some(FieldConfig::default()),
        SceneSync::new(Box::new(RetainedScene::new())),
    )
}

fn dispatcher() -> ActionDispatcher {
    ActionDispatcher::new(Arc::new(ActionRegistry::standard())).unwrap()
}

#[test]
fn submitted_patches_come_back_from_a_page_fetch() {
    let store = InMemoryPositionStore::new(Point::ZERO);
    let m1 = store.add_marcher("T", 1).unwrap();
    let m2 = store.add_marcher("T", 2).unwrap();
    let p1 = store.add_page(0, "1").unwrap();

    store
        .update_positions(&[
            Position::new(m1, p1, 10.0, 20.0),
            Position::new(m2, p1, 30.0, 40.0),
        ])
        .unwrap();
    let mut fetched = store.fetch_positions(PositionQuery::Page(p1)).unwrap();
    fetched.sort_by_key(|p| p.marcher_id);

    assert_eq!(
        fetched,
        vec![
            Position::new(m1, p1, 10.0, 20.0),
            Position::new(m2, p1, 30.0, 40.0),
        ]
    );
}

#[test]
fn seeded_show_has_a_position_for_everyone_on_every_page() {
    let field = FieldConfig::default();
    let store = seed_show(&field, 20, 3).unwrap();

    let pages = store.pages().unwrap();
    assert_eq!(pages.len(), 3);
    for page in pages.iter() {
        let positions = store.fetch_positions(PositionQuery::Page(page.id)).unwrap();
        assert_eq!(positions.len(), 20);
        assert!(positions
            .iter()
            .all(|p| field.bounds().contains(p.point())));
    }
}

#[test]
fn seeded_show_moves_between_pages() {
    let field = FieldConfig::default();
    let store = seed_show(&field, 8, 2).unwrap();
    let mut ctx = editor(store);
    let second = ctx.pages().unwrap().last().unwrap().id;
    ctx.select_page(second).unwrap();

    let range = ctx.page_step_range().unwrap().unwrap();
    assert!(matches!(range.largest.1, StepSize::Numeric(_)));
}

#[test]
fn dragging_a_marker_writes_one_batch_to_the_store() {
    let store = InMemoryPositionStore::new(Point::new(400.0, 400.0));
    store.add_marcher("A", 1).unwrap();
    store.add_marcher("A", 2).unwrap();
    let page = store.add_page(0, "1").unwrap();
    store
        .update_positions(&[Position::new(MarcherId(1), page, 500.0, 400.0)])
        .unwrap();
    let mut ctx = editor(store);
    ctx.select_page(page).unwrap();

    let (scene, selection) = (&mut ctx.scene, &mut ctx.selection);
    scene.select_marchers(&[MarcherId(0), MarcherId(1)], &ctx.ui, selection);
    ctx.ui.lock_y = true;
    ctx.scene.apply_axis_locks(&ctx.ui);

    assert!(ctx.scene.begin_drag(Point::new(400.0, 400.0)));
    ctx.scene.drag_to(Point::new(420.0, 430.0));
    let patches = ctx.scene.finish_drag(page);
    assert_eq!(patches.len(), 2);
    ctx.submit_patches(&patches).unwrap();

    let stored = ctx
        .store
        .fetch_positions(PositionQuery::Page(page))
        .unwrap();
    assert_eq!(stored[0].point(), Point::new(420.0, 400.0));
    assert_eq!(stored[1].point(), Point::new(520.0, 400.0));
    // The selection survives the refresh
    assert_eq!(ctx.selection.marchers().len(), 2);
}

#[test]
fn keyboard_copy_is_gated_by_focus_and_lands_as_one_update() {
    let store = InMemoryPositionStore::new(Point::new(300.0, 300.0));
    for order in 1..=3 {
        store.add_marcher("S", order).unwrap();
    }
    store.add_page(0, "1").unwrap();
    let second = store.add_page(8, "2").unwrap();
    store
        .update_positions(&[Position::new(MarcherId(2), second, 0.0, 0.0)])
        .unwrap();
    let mut ctx = editor(store);
    ctx.select_page(second).unwrap();
    let dispatcher = dispatcher();

    let chord = KeyEvent::new("p").with_ctrl().with_shift();
    let typed = chord.clone().focused_on(FocusTarget::TextArea);
    assert_eq!(dispatcher.handle_key_down(&typed, &mut ctx), KeyOutcome::Ignored);
    let moved = ctx
        .store
        .fetch_positions(PositionQuery::Marcher(MarcherId(2)))
        .unwrap();
    assert_eq!(moved[1].point(), Point::ZERO);

    let outcome = dispatcher.handle_key_down(&chord, &mut ctx);
    assert!(outcome.prevent_default());
    let restored = ctx
        .store
        .fetch_positions(PositionQuery::Marcher(MarcherId(2)))
        .unwrap();
    assert_eq!(restored[1].point(), Point::new(300.0, 300.0));
    assert_eq!(
        ctx.scene.marker_for(MarcherId(2)).unwrap().position,
        Point::new(300.0, 300.0)
    );
}

#[test]
fn previous_paths_toggle_adds_and_removes_overlays() {
    let store = InMemoryPositionStore::new(Point::new(100.0, 100.0));
    store.add_marcher("C", 1).unwrap();
    store.add_page(0, "1").unwrap();
    let second = store.add_page(4, "2").unwrap();
    let mut ctx = editor(store);
    ctx.select_page(second).unwrap();

    let overlays = |ctx: &EditorContext| {
        ctx.scene
            .graph()
            .objects()
            .iter()
            .filter(|o| matches!(o.kind, VisualKind::Ghost { .. } | VisualKind::Pathway { .. }))
            .count()
    };

    ctx.set_toggle(UiToggle::PreviousPaths, true).unwrap();
    assert_eq!(overlays(&ctx), 2);
    ctx.set_toggle(UiToggle::PreviousPaths, false).unwrap();
    assert_eq!(overlays(&ctx), 0);
}

#[test]
fn fetch_for_an_abandoned_selection_is_dropped() {
    let store = InMemoryPositionStore::new(Point::new(10.0, 10.0));
    store.add_marcher("F", 1).unwrap();
    store.add_marcher("F", 2).unwrap();
    let page = store.add_page(0, "1").unwrap();
    let mut ctx = editor(store);
    ctx.select_page(page).unwrap();

    let (scene, selection) = (&mut ctx.scene, &mut ctx.selection);
    scene.select_marchers(&[MarcherId(0)], &ctx.ui, selection);
    let ticket = ctx.selection.begin_fetch().unwrap();
    let result = ctx
        .store
        .fetch_positions(PositionQuery::Page(ticket.page))
        .unwrap();

    // Selection changes while the fetch is in flight
    let (scene, selection) = (&mut ctx.scene, &mut ctx.selection);
    scene.select_marchers(&[MarcherId(1)], &ctx.ui, selection);

    assert!(!ctx.selection.resolve_fetch(&ticket, result));
    assert!(ctx.selection.selected_positions().is_empty());
}

#[test]
fn unknown_marcher_positions_do_not_break_a_sync() {
    let store = InMemoryPositionStore::new(Point::ZERO);
    let known = store.add_marcher("K", 1).unwrap();
    let page = store.add_page(0, "1").unwrap();
    let mut ctx = editor(store);
    ctx.select_page(page).unwrap();

    let marchers = ctx.marchers().unwrap();
    let report = ctx.scene.render_marchers(
        &[
            Position::new(known, page, 5.0, 5.0),
            Position::new(MarcherId(99), PageId(0), 1.0, 1.0),
        ],
        &marchers,
    );
    assert_eq!(report.skipped, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(ctx.scene.live_marker_count(), 1);
}

#[test]
fn zoom_actions_stay_in_range() {
    let store = InMemoryPositionStore::new(Point::ZERO);
    let page = store.add_page(0, "1").unwrap();
    let mut ctx = editor(store);
    ctx.select_page(page).unwrap();
    let dispatcher = dispatcher();

    for _ in 0..40 {
        dispatcher.dispatch(ActionId::ZoomIn, &mut ctx).unwrap();
    }
    assert_eq!(ctx.scene.viewport().zoom(), crate::core::settings::MAX_ZOOM);
    dispatcher.dispatch(ActionId::ResetZoom, &mut ctx).unwrap();
    assert!(ctx.scene.viewport().zoom() < 1.0);
}
