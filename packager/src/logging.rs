//! Diagnostic logging setup.
//!
//! Progress lines are written directly by the pipeline; this module only wires
//! the `log` facade to a terminal logger on stderr for `-v` diagnostics.

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Map the `-v` count to a log level.
///
/// # Examples
///
/// ```
/// use simplelog::LevelFilter;
/// use vineflower_packager::logging::level_for_verbosity;
///
/// assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
/// assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
/// ```
#[must_use]
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger, quiet mode keeping errors only.
///
/// A logger that is already installed is left in place.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        level_for_verbosity(verbosity)
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str("vineflower_packager")
        .build();

    if TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        // A logger is already installed; keep it.
    }
}
