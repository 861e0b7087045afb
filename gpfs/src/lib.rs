//! Arm MAP metric plugin reporting GPFS filesystem activity.
//!
//! Counters come from the GPFS shared segment device (`/dev/ss0`, see
//! [`GpfsConfig`]). For each VFS counter the plugin publishes the increase
//! during the current sample and the total since the plugin was
//! initialised, plus the average number of cycles per I/O operation.
//!
//! If the device cannot be opened the plugin fails to initialise and every
//! metric reads as zero.

#![allow(non_snake_case)]

use libc::{c_int, c_void, timespec};
use map_metrics::host::{metric_id_t, plugin_id_t};
use map_metrics::PluginSlot;

mod config;
pub use self::config::{GpfsConfig, DEVICE_ENV};

mod plugin;
pub use self::plugin::{GpfsCounter, GpfsPlugin};

mod segment;
pub use self::segment::{totals, SharedSegment};

static PLUGIN: PluginSlot<GpfsPlugin<SharedSegment>> = PluginSlot::new();

/// Called by MAP when the plugin is loaded, outside of any signal handler.
#[no_mangle]
pub extern "C" fn allinea_plugin_initialize(plugin_id: plugin_id_t, _unused: *mut c_void) -> c_int {
    PLUGIN.initialize(plugin_id, "gpfs", || {
        let config = GpfsConfig::from_env();
        SharedSegment::open(&config).map(GpfsPlugin::new)
    })
}

/// Called by MAP when the plugin is unloaded. Closes the device.
#[no_mangle]
pub extern "C" fn allinea_plugin_cleanup(plugin_id: plugin_id_t, _unused: *mut c_void) -> c_int {
    PLUGIN.cleanup(plugin_id, "gpfs", |_| Ok(()))
}

macro_rules! gpfs_counter_metrics {
    ($($name:ident => $method:ident($counter:ident);)*) => {
        $(
            /// # Safety
            ///
            /// Called by MAP with valid `sample_time` and `out` pointers.
            #[no_mangle]
            pub unsafe extern "C" fn $name(
                metric_id: metric_id_t,
                sample_time: *mut timespec,
                out: *mut u64,
            ) -> c_int {
                PLUGIN.sample(metric_id, sample_time, out, |p, tick| {
                    p.$method(tick, GpfsCounter::$counter)
                })
            }
        )*
    };
}

gpfs_counter_metrics! {
    allinea_gpfsIOCycles => delta(IoCycles);
    allinea_gpfsIOCyclesTotal => total(IoCycles);
    allinea_gpfsINodeLookups => delta(InodeLookups);
    allinea_gpfsINodeLookupsTotal => total(InodeLookups);
    allinea_gpfsOpens => delta(Opens);
    allinea_gpfsOpensTotal => total(Opens);
    allinea_gpfsReads => delta(Reads);
    allinea_gpfsReadsTotal => total(Reads);
    allinea_gpfsWrites => delta(Writes);
    allinea_gpfsWritesTotal => total(Writes);
    allinea_gpfsIOPs => delta(Iops);
    allinea_gpfsIOPsTotal => total(Iops);
}

/// # Safety
///
/// Called by MAP with valid `sample_time` and `out` pointers.
#[no_mangle]
pub unsafe extern "C" fn allinea_gpfsCyclesPerIOP(
    metric_id: metric_id_t,
    sample_time: *mut timespec,
    out: *mut f64,
) -> c_int {
    PLUGIN.sample(metric_id, sample_time, out, |p, tick| p.cycles_per_iop(tick))
}
