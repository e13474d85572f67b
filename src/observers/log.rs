//! # Default logging sink.
//!
//! Backoff and give-up transitions are reported through `tracing` under the
//! well-known target `"reattempt"`. With no subscriber installed this is a
//! no-op; installing one (e.g. `tracing-subscriber`) is the explicit,
//! process-wide reconfiguration point. The engine itself never mutates
//! global logging state.
//!
//! Defaults mirror the conventional severities: backoff at `INFO`, give-up
//! at `ERROR`. Both are adjustable per policy, and `.logging(false)` disables
//! the wiring entirely.

use std::fmt::Display;
use std::time::Duration;

use tracing::Level;

/// Well-known tracing target for all engine-emitted events.
pub(crate) const TARGET: &str = "reattempt";

/// Per-policy logging switches.
#[derive(Clone, Debug)]
pub(crate) struct LogConfig {
    pub enabled: bool,
    pub backoff_level: Level,
    pub giveup_level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backoff_level: Level::INFO,
            giveup_level: Level::ERROR,
        }
    }
}

/// `tracing::event!` requires a const level; bridge a runtime level with a match.
macro_rules! dyn_event {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => ::tracing::event!(target: TARGET, Level::ERROR, $($field)*),
            Level::WARN => ::tracing::event!(target: TARGET, Level::WARN, $($field)*),
            Level::INFO => ::tracing::event!(target: TARGET, Level::INFO, $($field)*),
            Level::DEBUG => ::tracing::event!(target: TARGET, Level::DEBUG, $($field)*),
            Level::TRACE => ::tracing::event!(target: TARGET, Level::TRACE, $($field)*),
        }
    };
}

impl LogConfig {
    pub fn backoff(&self, name: &str, tries: u32, wait: Duration, trigger: Option<&dyn Display>) {
        if !self.enabled {
            return;
        }
        let trigger = trigger.map(ToString::to_string).unwrap_or_default();
        dyn_event!(
            self.backoff_level,
            name,
            tries,
            wait_ms = wait.as_millis() as u64,
            trigger = %trigger,
            "backing off"
        );
    }

    pub fn giveup(&self, name: &str, tries: u32, elapsed: Duration, trigger: Option<&dyn Display>) {
        if !self.enabled {
            return;
        }
        let trigger = trigger.map(ToString::to_string).unwrap_or_default();
        dyn_event!(
            self.giveup_level,
            name,
            tries,
            elapsed_ms = elapsed.as_millis() as u64,
            trigger = %trigger,
            "giving up"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = LogConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.backoff_level, Level::INFO);
        assert_eq!(cfg.giveup_level, Level::ERROR);
    }

    #[test]
    fn test_disabled_config_is_silent_noop() {
        let cfg = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        // No subscriber installed; must not panic either way.
        cfg.backoff("t", 1, Duration::from_millis(5), None);
        cfg.giveup("t", 2, Duration::from_millis(9), Some(&"boom"));
    }
}
