//! Optional stderr logging for the plugins.

use log::SetLoggerError;

/// Environment variable holding the log filter, in `env_logger` syntax.
pub const LOG_ENV: &str = "MAP_METRICS_LOG";

/// Attempt to init an env_logger writing to stderr, filtered by
/// [`LOG_ENV`] (default `warn`).
/// Does nothing if the "builtin_env_logger" feature is disabled, or fails
/// harmlessly if the host process already installed a logger.
pub fn try_init() -> Result<(), SetLoggerError> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "builtin_env_logger")] {
            env_logger::try_init_from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
        } else {
            Ok(())
        }
    }
}
