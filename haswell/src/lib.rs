//! Arm MAP metric plugin breaking down Haswell stall cycles.
//!
//! Six core events are counted through PAPI (see [`HaswellEvent`]) and
//! reported per sample as fractions of active cycles: productive, stalled,
//! memory bound, bandwidth bound, latency bound and stalled for other
//! reasons.
//!
//! Build with the `papi` feature to link against libpapi. Without it the
//! plugin still builds but fails to initialise, and every metric reads as
//! zero.

use libc::{c_int, c_void, timespec};
use map_metrics::host::{metric_id_t, plugin_id_t};
use map_metrics::PluginSlot;

mod config;
pub use self::config::{HaswellConfig, EVENTS_ENV};

mod events;
pub use self::events::HaswellEvent;

mod papi;
pub use self::papi::PapiEventSet;

mod plugin;
pub use self::plugin::HaswellPlugin;

#[cfg(not(feature = "papi"))]
mod stubs;

static PLUGIN: PluginSlot<HaswellPlugin<PapiEventSet>> = PluginSlot::new();

/// Initialise PAPI and start the event set. Called by MAP before the
/// program starts, outside of any signal handler.
#[no_mangle]
pub extern "C" fn allinea_plugin_initialize(plugin_id: plugin_id_t, _unused: *mut c_void) -> c_int {
    PLUGIN.initialize(plugin_id, "haswell", || {
        PapiEventSet::start(&HaswellConfig::from_env()).map(HaswellPlugin::new)
    })
}

/// Stop and destroy the event set. Called by MAP after the program ends.
#[no_mangle]
pub extern "C" fn allinea_plugin_cleanup(plugin_id: plugin_id_t, _unused: *mut c_void) -> c_int {
    PLUGIN.cleanup(plugin_id, "haswell", |p| p.into_source().shutdown())
}

/// # Safety
///
/// Called by MAP with valid `sample_time` and `out` pointers.
#[no_mangle]
pub unsafe extern "C" fn haswell_membound_active_cycles(
    metric_id: metric_id_t,
    sample_time: *mut timespec,
    out: *mut u64,
) -> c_int {
    PLUGIN.sample(metric_id, sample_time, out, |p, tick| p.active_cycles(tick))
}

macro_rules! haswell_ratio_metrics {
    ($($name:ident => $method:ident;)*) => {
        $(
            /// # Safety
            ///
            /// Called by MAP with valid `sample_time` and `out` pointers.
            #[no_mangle]
            pub unsafe extern "C" fn $name(
                metric_id: metric_id_t,
                sample_time: *mut timespec,
                out: *mut f64,
            ) -> c_int {
                PLUGIN.sample(metric_id, sample_time, out, |p, tick| p.$method(tick))
            }
        )*
    };
}

haswell_ratio_metrics! {
    haswell_membound_productive_cycles => productive_cycles;
    haswell_membound_stall_cycles => stall_cycles;
    haswell_membound_memory_bound => memory_bound;
    haswell_membound_bandwidth_bound => bandwidth_bound;
    haswell_membound_latency_bound => latency_bound;
    haswell_membound_other_stall_reason => other_stall_reason;
}
