//! Show playback
//!
//! While the play toggle is on, the selected page advances once the counts
//! of the next page have elapsed. Playback stops by itself on the last page.

use crate::core::errors::DrillResult;
use crate::core::state::{EditorContext, UiToggle};
use bevy::prelude::*;

/// Playback tempo
pub const COUNTS_PER_SECOND: f64 = 2.0;

pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaybackClock>()
            .add_systems(Update, advance_playback);
    }
}

#[derive(Resource, Debug, Default)]
pub struct PlaybackClock {
    elapsed: f64,
}

impl PlaybackClock {
    /// Advances the clock by `delta` seconds and moves to the next page when
    /// its counts are used up. Returns whether the page changed.
    pub fn step(&mut self, ctx: &mut EditorContext, delta: f64) -> DrillResult<bool> {
        if !ctx.ui.is_playing {
            self.elapsed = 0.0;
            return Ok(false);
        }
        let page = ctx.current_page()?;
        let Some(next) = ctx.pages()?.next(page.id).cloned() else {
            info!("Playback reached the last page");
            self.elapsed = 0.0;
            ctx.set_toggle(UiToggle::Playing, false)?;
            return Ok(false);
        };

        self.elapsed += delta;
        let duration = next.counts as f64 / COUNTS_PER_SECOND;
        if self.elapsed < duration {
            return Ok(false);
        }
        self.elapsed -= duration;
        ctx.select_page(next.id)?;
        Ok(true)
    }
}

fn advance_playback(
    time: Res<Time>,
    mut clock: ResMut<PlaybackClock>,
    mut ctx: ResMut<EditorContext>,
) {
    if !ctx.ui.is_playing {
        return;
    }
    if let Err(err) = clock.step(&mut ctx, time.delta_secs_f64()) {
        warn!("Stopping playback: {err}");
        ctx.ui.is_playing = false;
        ctx.scene.request_render();
    }
}
