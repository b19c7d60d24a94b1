use log::{info, warn};
use simplelog::*;

/// Maps a config level name onto a filter; `None` for an unknown name.
pub fn level_filter(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// Terminal logger for the whole process. An unknown level falls back to info.
/// A second call keeps the logger already installed.
pub fn init_logger(level: &str) {
    let log_option = level_filter(level);
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        log_option.unwrap_or(LevelFilter::Info),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    match logger_instance {
        Ok(()) => {
            if log_option.is_none() {
                warn!("unknown log level '{}', using info", level);
            }
            info!("logger started with level {}", log_option.unwrap_or(LevelFilter::Info));
        }
        Err(_) => warn!("logger already initialised"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_filter("debug"), Some(LevelFilter::Debug));
        assert_eq!(level_filter("INFO"), Some(LevelFilter::Info));
        assert_eq!(level_filter("warn"), Some(LevelFilter::Warn));
        assert_eq!(level_filter("error"), Some(LevelFilter::Error));
        assert_eq!(level_filter("verbose"), None);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger("verbose");
        init_logger("debug");
    }
}
