use std::env;
use std::path::{Path, PathBuf};

use map_metrics_sys::gpfs::DEV_SS0;

/// Environment variable overriding the shared segment device path.
pub const DEVICE_ENV: &str = "MAP_GPFS_DEVICE";

/// Configure where the plugin reads GPFS counters from.
///
/// ```no_run
/// use map_gpfs::{GpfsConfig, SharedSegment};
///
/// let config = GpfsConfig::default().set_device("/dev/ss0");
/// let segment = SharedSegment::open(&config)?;
/// #
/// # Ok::<(), map_metrics::error::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpfsConfig {
    device: PathBuf,
}

impl GpfsConfig {
    /// Defaults, overridden by [`DEVICE_ENV`] when it is set.
    pub fn from_env() -> Self {
        match env::var_os(DEVICE_ENV) {
            Some(path) if !path.is_empty() => Self::default().set_device(path),
            _ => Self::default(),
        }
    }

    /// Read counters from `device` instead of `/dev/ss0`.
    pub fn set_device(self, device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }
}

impl Default for GpfsConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEV_SS0),
        }
    }
}
