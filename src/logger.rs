use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Directives that keep the render stack quiet
const QUIET_TARGETS: [&str; 4] = [
    "wgpu_core=error",
    "wgpu_hal=error",
    "bevy_render=error",
    "naga=warn",
];

/// Custom logger initialization to exclude timestamps but keep colors.
///
/// Use DRILLCRAFT_LOG=info or DRILLCRAFT_LOG=debug to change the default
/// level; RUST_LOG directives are still honored on top of it.
pub fn init_custom_logger(debug: bool) {
    // Empty time formatter that doesn't print anything
    struct EmptyTime;
    impl FormatTime for EmptyTime {
        fn format_time(
            &self,
            _: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            Ok(())
        }
    }

    let default_level = std::env::var("DRILLCRAFT_LOG").unwrap_or_else(|_| {
        if debug { "debug" } else { "info" }.to_string()
    });

    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true); // Keep colors

    let filter = build_filter(&default_level);

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_filter(filter),
        )
        .try_init();
}

fn build_filter(default_level: &str) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    for target in QUIET_TARGETS {
        match target.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(err) => eprintln!("Bad log directive {target}: {err}"),
        }
    }
    filter
}
