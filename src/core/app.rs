//! Application initialization and configuration

use crate::core::cli::CliArgs;
use crate::core::errors::{AppResult, DrillResult};
use crate::core::state::{EditorContext, UiSettings};
use crate::data::field::FieldConfig;
use crate::data::model::{MarcherId, PageId, Position};
use crate::data::store::{InMemoryPositionStore, PositionStore};
use crate::editing::{
    ActionDispatcher, ActionRegistry, InputPlugin, PlaybackPlugin, SelectionFetchPlugin,
};
use crate::rendering::{CameraPlugin, DrawPlugin, RetainedScene, SceneSync};
use crate::ui::theme::{BACKGROUND_COLOR, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::ui::{HudPlugin, ToolbarPlugin};
use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use std::sync::Arc;

/// Marchers per rank in the starting block
const BLOCK_WIDTH: u32 = 8;
/// Interval between marchers in the block, in steps
const BLOCK_INTERVAL: f64 = 2.0;
/// How far the block travels upfield on each page, in steps
const BLOCK_TRAVEL: f64 = 8.0;
/// Padding around the field when fitting it to the window
const FIT_PADDING: f64 = 40.0;

/// Creates a fully configured Bevy GUI application ready to run
pub fn create_app(cli_args: CliArgs) -> AppResult<App> {
    cli_args.validate()?;

    let field = match &cli_args.field_path {
        Some(path) => FieldConfig::load_from_path(path)?,
        None => FieldConfig::default(),
    };
    let store = seed_show(&field, cli_args.marchers, cli_args.pages)
        .context("Failed to create the starting show")?;
    let ui = load_ui_settings(&cli_args);

    let mut ctx = EditorContext::new(
        Arc::new(store),
        Some(field.clone()),
        SceneSync::new(Box::new(RetainedScene::new())),
    )
    .with_ui_settings(ui, Some(cli_args.settings_path.clone()));
    if let Some(first) = ctx.pages()?.first().cloned() {
        ctx.select_page(first.id)?;
    }
    ctx.scene
        .viewport_mut()
        .set_screen_size(kurbo::Size::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64));
    ctx.scene.viewport_mut().fit_world(field.bounds(), FIT_PADDING);

    let dispatcher = ActionDispatcher::new(Arc::new(ActionRegistry::standard()))?;

    let mut app = App::new();
    configure_app_settings(&mut app, cli_args, ctx, dispatcher);
    add_all_plugins(&mut app);
    Ok(app)
}

/// Sets up application resources and configuration
fn configure_app_settings(
    app: &mut App,
    cli_args: CliArgs,
    ctx: EditorContext,
    dispatcher: ActionDispatcher,
) {
    app.insert_resource(cli_args)
        .insert_resource(ctx)
        .insert_resource(dispatcher)
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(WinitSettings::desktop_app());
}

/// Adds all plugins to the application in logical groups
fn add_all_plugins(app: &mut App) {
    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: WINDOW_TITLE.into(),
            resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
            ..default()
        }),
        ..default()
    };
    // Logging is set up by `logger::init_custom_logger`
    app.add_plugins(
        DefaultPlugins
            .set(window_plugin)
            .build()
            .disable::<LogPlugin>(),
    );

    app.add_plugins((CameraPlugin, DrawPlugin));
    app.add_plugins((ToolbarPlugin, HudPlugin));
    app.add_plugins((InputPlugin, SelectionFetchPlugin, PlaybackPlugin));
}

/// Saved toggles, or the defaults when there are none yet
fn load_ui_settings(cli_args: &CliArgs) -> UiSettings {
    let path = &cli_args.settings_path;
    if !path.exists() {
        return UiSettings::default();
    }
    match UiSettings::load_from_path(path) {
        Ok(settings) => {
            info!("Loaded UI settings from {}", path.display());
            settings
        }
        Err(err) => {
            warn!("Ignoring UI settings: {err:#}");
            UiSettings::default()
        }
    }
}

/// A starting show: a block of `marchers` on the front sideline at center,
/// moving upfield by a fixed amount on every page
pub fn seed_show(
    field: &FieldConfig,
    marchers: u32,
    pages: u32,
) -> DrillResult<InMemoryPositionStore> {
    let store = InMemoryPositionStore::new(field.center_front());
    let ids: Vec<MarcherId> = (1..=marchers)
        .map(|order| store.add_marcher(instrument_prefix(order), order))
        .collect::<DrillResult<_>>()?;

    let ranks = marchers.div_ceil(BLOCK_WIDTH).max(1);
    let block_depth = (ranks - 1) as f64 * BLOCK_INTERVAL;
    let block_width = (BLOCK_WIDTH.min(marchers.max(1)) - 1) as f64 * BLOCK_INTERVAL;

    for index in 0..pages {
        let counts = if index == 0 { 0 } else { 16 };
        let page_id: PageId = store.add_page(counts, &(index + 1).to_string())?;
        let shift = index as f64 * BLOCK_TRAVEL * if index % 2 == 0 { 1.0 } else { -1.0 };

        let positions: Vec<Position> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let file = (i as u32 % BLOCK_WIDTH) as f64;
                let rank = (i as u32 / BLOCK_WIDTH) as f64;
                let point = field.steps_to_px(
                    file * BLOCK_INTERVAL - block_width / 2.0 + shift,
                    -(block_depth + 4.0) + rank * BLOCK_INTERVAL - index as f64 * 2.0,
                );
                Position::new(*id, page_id, point.x, point.y)
            })
            .collect();
        store.update_positions(&positions)?;
    }
    info!("Seeded a show with {marchers} marchers on {pages} pages");
    Ok(store)
}

/// Section letters for the seeded band, one section per rank
fn instrument_prefix(order: u32) -> &'static str {
    const SECTIONS: [&str; 6] = ["F", "C", "T", "M", "B", "P"];
    SECTIONS[((order - 1) / BLOCK_WIDTH) as usize % SECTIONS.len()]
}
