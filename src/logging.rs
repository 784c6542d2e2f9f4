//! Logger setup.
//!
//! The engine itself only talks to the `log` facade. Hosts that do not install
//! their own logger can call [`init_logging`] to get `env_logger` output at the
//! configured level. `RUST_LOG` still overrides the level when set.

use crate::config::{InteractionConfig, LogLevel};

/// Install `env_logger` with the level from `config`.
///
/// Returns `false` if a logger was already installed; calling this more than
/// once is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(config: &InteractionConfig) -> bool {
    init_with_level(config.log_level)
}

/// Install `env_logger` with an explicit level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_with_level(level: LogLevel) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.to_level_filter());
    builder.parse_default_env();
    match builder.try_init() {
        Ok(()) => {
            log::debug!("Logging initialized at level {}", level.name());
            true
        }
        Err(_) => false,
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_with_level(LogLevel::Debug);
        assert!(!init_with_level(LogLevel::Trace));
    }
}
