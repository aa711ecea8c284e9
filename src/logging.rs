use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the process logger for the maze binary.
///
/// The base level is info, which covers level loads, texture readiness and
/// win/catch transitions. `--verbose` lowers it to debug so enemy tracking
/// changes and the once-a-second FPS line show up. A `RUST_LOG` filter
/// replaces both, e.g. `RUST_LOG=maze_caster::ai=debug` for AI only.
/// Lines carry millisecond timestamps so per-tick events can be ordered.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Only fails when a logger is already installed
    let _ = builder.try_init();
}
