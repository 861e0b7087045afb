use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use libc::{c_int, timespec};
use log::info;

use crate::error::{new_error, new_error_with_message, Error, ErrorKind};
use crate::host::{self, metric_id_t, plugin_id_t, FAILURE, SUCCESS};
use crate::logger;
use crate::tick::SampleTick;

/// Process-wide home of a plugin instance.
///
/// The plugin ABI passes no user data to the metric accessors, so each
/// plugin library keeps its one instance in a `static PluginSlot`. The
/// instance is created by `allinea_plugin_initialize` and dropped by
/// `allinea_plugin_cleanup`; a later initialise starts from scratch.
///
/// Accessors only ever `try_lock` the slot, so a sampler that interrupts a
/// holder of the lock fails one sample instead of deadlocking.
pub struct PluginSlot<P> {
    inner: Mutex<Option<P>>,
}

impl<P> PluginSlot<P> {
    /// An empty slot, usable as a `static` initialiser.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<P>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `plugin`, dropping any previous instance.
    pub fn install(&self, plugin: P) {
        *self.lock() = Some(plugin);
    }

    /// Take the instance out of the slot.
    pub fn remove(&self) -> Option<P> {
        self.lock().take()
    }

    /// True between a successful initialise and the next cleanup.
    pub fn is_installed(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `f` against the installed instance without blocking.
    pub fn with<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut P) -> Result<T, Error>,
    {
        let mut guard = match self.inner.try_lock() {
            Ok(g) => g,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(new_error(ErrorKind::Busy)),
        };

        match guard.as_mut() {
            Some(p) => f(p),
            None => Err(new_error(ErrorKind::NotInitialized)),
        }
    }

    /// Body of an `allinea_plugin_initialize` export.
    ///
    /// Sets up logging, resolves the host callbacks, then builds and stores
    /// the plugin. Construction errors are reported to the host.
    pub fn initialize<F>(&self, plugin_id: plugin_id_t, name: &str, build: F) -> c_int
    where
        F: FnOnce() -> Result<P, Error>,
    {
        let _ = logger::try_init();
        host::preload();

        // Never leave the previous instance around if the new one fails
        drop(self.remove());

        let result = build().map(|p| {
            self.install(p);
            info!("{} plugin initialised (id {})", name, plugin_id);
        });
        host::plugin_status(plugin_id, result)
    }

    /// Body of an `allinea_plugin_cleanup` export.
    ///
    /// `teardown` gets the removed instance, if initialisation succeeded.
    pub fn cleanup<F>(&self, plugin_id: plugin_id_t, name: &str, teardown: F) -> c_int
    where
        F: FnOnce(P) -> Result<(), Error>,
    {
        let result = match self.remove() {
            Some(p) => teardown(p),
            None => Ok(()),
        };
        info!("{} plugin cleaned up (id {})", name, plugin_id);
        host::plugin_status(plugin_id, result)
    }

    /// Body of a metric accessor export.
    ///
    /// Converts the host's sample time, runs `get` against the instance and
    /// writes the result to `out`. A plugin that never initialised reports 0
    /// for every metric.
    ///
    /// # Safety
    ///
    /// `sample_time` and `out` must each be null or valid for the access.
    pub unsafe fn sample<T, F>(
        &self,
        metric_id: metric_id_t,
        sample_time: *const timespec,
        out: *mut T,
        get: F,
    ) -> c_int
    where
        T: Default,
        F: FnOnce(&mut P, SampleTick) -> Result<T, Error>,
    {
        if sample_time.is_null() || out.is_null() {
            let e = new_error_with_message(ErrorKind::InvalidArgument, "null sample time or output pointer");
            host::set_metric_error(metric_id, FAILURE, &e.to_string());
            return FAILURE;
        }
        let tick = SampleTick::from(&*sample_time);

        match self.with(|p| get(p, tick)) {
            Ok(v) => {
                out.write(v);
                SUCCESS
            }
            Err(e) => match e.kind() {
                ErrorKind::NotInitialized => {
                    out.write(T::default());
                    SUCCESS
                }
                ErrorKind::Busy => FAILURE,
                _ => {
                    host::set_metric_error(metric_id, host::error_code(&e), &e.to_string());
                    FAILURE
                }
            },
        }
    }
}

impl<P> Default for PluginSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        value: u64,
    }

    fn ts(sec: i64) -> timespec {
        timespec {
            tv_sec: sec as _,
            tv_nsec: 0,
        }
    }

    #[test]
    fn test_uninitialised_reads_zero() {
        let slot: PluginSlot<Fake> = PluginSlot::new();
        let mut out = 99u64;

        let rc = unsafe { slot.sample(1, &ts(1), &mut out, |p, _| Ok(p.value)) };
        assert_eq!(rc, SUCCESS);
        assert_eq!(out, 0);
    }

    #[test]
    fn test_sample_writes_value() {
        let slot = PluginSlot::new();
        assert_eq!(slot.initialize(1, "fake", || Ok(Fake { value: 7 })), SUCCESS);
        assert!(slot.is_installed());

        let mut out = 0u64;
        let rc = unsafe {
            slot.sample(1, &ts(3), &mut out, |p, tick| {
                assert_eq!(tick, SampleTick::new(3, 0));
                Ok(p.value)
            })
        };
        assert_eq!(rc, SUCCESS);
        assert_eq!(out, 7);

        assert_eq!(slot.cleanup(1, "fake", |_| Ok(())), SUCCESS);
        assert!(!slot.is_installed());
    }

    #[test]
    fn test_failed_initialise_leaves_slot_empty() {
        let slot = PluginSlot::new();
        slot.install(Fake { value: 1 });

        let rc = slot.initialize(1, "fake", || {
            Err::<Fake, _>(new_error_with_message(ErrorKind::SourceUnavailable, "nope"))
        });
        assert_eq!(rc, FAILURE);
        assert!(!slot.is_installed());
    }

    #[test]
    fn test_read_error_fails_sample() {
        let slot = PluginSlot::new();
        slot.install(Fake { value: 1 });

        let mut out = 5.0f64;
        let rc = unsafe {
            slot.sample(2, &ts(1), &mut out, |_, _| {
                Err::<f64, _>(new_error(ErrorKind::ReadFailed))
            })
        };
        assert_eq!(rc, FAILURE);
        assert_eq!(out, 5.0);
    }

    #[test]
    fn test_null_pointers_fail() {
        let slot = PluginSlot::new();
        slot.install(Fake { value: 1 });

        let mut out = 0u64;
        let rc = unsafe { slot.sample(1, std::ptr::null(), &mut out, |p, _| Ok(p.value)) };
        assert_eq!(rc, FAILURE);

        let rc = unsafe { slot.sample(1, &ts(1), std::ptr::null_mut::<u64>(), |p, _| Ok(p.value)) };
        assert_eq!(rc, FAILURE);
    }

    #[test]
    fn test_contended_slot_is_busy() {
        let slot = PluginSlot::new();
        slot.install(Fake { value: 1 });

        let nested = slot.with(|_| slot.with(|p| Ok(p.value)));
        assert_eq!(nested.unwrap_err().kind(), &ErrorKind::Busy);
    }

    #[test]
    fn test_cleanup_failure_is_reported() {
        let slot = PluginSlot::new();
        slot.install(Fake { value: 1 });

        let rc = slot.cleanup(1, "fake", |_| {
            Err(new_error_with_message(ErrorKind::Library, "stop failed"))
        });
        assert_eq!(rc, FAILURE);
        assert!(!slot.is_installed());
    }
}
