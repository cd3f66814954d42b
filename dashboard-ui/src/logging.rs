//! Browser logging
//!
//! `tracing` events reach the devtools console through `console_log`: with
//! no tracing subscriber installed, the `log` feature of `tracing` forwards
//! every event as a `log` record.

use log::LevelFilter;

use visits_dashboard::LoggingConfig;

/// Level for the configured name, `info` when it is not recognized
pub fn level_filter(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the console logger; later calls are no-ops
pub fn init(config: &LoggingConfig) {
    let Some(level) = level_filter(&config.level).to_level() else {
        return;
    };

    if console_log::init_with_level(level).is_err() {
        log::debug!("Console logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter(" WARN "), LevelFilter::Warn);
        assert_eq!(level_filter("off"), LevelFilter::Off);
        assert_eq!(level_filter("chatty"), LevelFilter::Info);
    }
}
