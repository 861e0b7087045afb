//! Arm MAP metric plugin reporting MUSCLE2 coupling activity.
//!
//! For sends, receives and barriers the plugin reports the number of calls
//! (and bytes, for sends and receives) per sample, the average seconds per
//! call during the sample, and the total seconds spent in calls since the
//! plugin was initialised.
//!
//! Build with the `muscle2` feature to link against libmuscle2.

use libc::{c_int, c_void, timespec};
use map_metrics::host::{metric_id_t, plugin_id_t};
use map_metrics::PluginSlot;

mod counters;
pub use self::counters::{CallKind, MuscleCounter};

mod library;
pub use self::library::{ActiveCall, MuscleLibrary, MuscleSource};

mod plugin;
pub use self::plugin::Muscle2Plugin;

#[cfg(not(feature = "muscle2"))]
mod stubs;

static PLUGIN: PluginSlot<Muscle2Plugin<MuscleLibrary>> = PluginSlot::new();

/// Reset the MUSCLE2 counters. Called by MAP when the plugin is loaded,
/// outside of any signal handler.
#[no_mangle]
pub extern "C" fn allinea_plugin_initialize(plugin_id: plugin_id_t, _unused: *mut c_void) -> c_int {
    PLUGIN.initialize(plugin_id, "muscle2", || MuscleLibrary::open().map(Muscle2Plugin::new))
}

/// Called by MAP when the plugin is unloaded.
#[no_mangle]
pub extern "C" fn allinea_plugin_cleanup(plugin_id: plugin_id_t, _unused: *mut c_void) -> c_int {
    PLUGIN.cleanup(plugin_id, "muscle2", |_| Ok(()))
}

macro_rules! muscle2_metrics {
    ($($name:ident: $ty:ty => $method:ident($arg:expr);)*) => {
        $(
            /// # Safety
            ///
            /// Called by MAP with valid `sample_time` and `out` pointers.
            #[no_mangle]
            pub unsafe extern "C" fn $name(
                metric_id: metric_id_t,
                sample_time: *mut timespec,
                out: *mut $ty,
            ) -> c_int {
                PLUGIN.sample(metric_id, sample_time, out, |p, tick| p.$method(tick, $arg))
            }
        )*
    };
}

muscle2_metrics! {
    allinea_muscle2_get_bytes_sent: u64 => count(MuscleCounter::SendSize);
    allinea_muscle2_get_send_calls: u64 => count(MuscleCounter::SendCalls);
    allinea_muscle2_get_send_duration: f64 => seconds_per_call(CallKind::Send);
    allinea_muscle2_get_send_duration_cumulative: f64 => cumulative_seconds(CallKind::Send);
    allinea_muscle2_get_bytes_received: u64 => count(MuscleCounter::ReceiveSize);
    allinea_muscle2_get_receive_calls: u64 => count(MuscleCounter::ReceiveCalls);
    allinea_muscle2_get_receive_duration: f64 => seconds_per_call(CallKind::Receive);
    allinea_muscle2_get_receive_duration_cumulative: f64 => cumulative_seconds(CallKind::Receive);
    allinea_muscle2_get_barrier_calls: u64 => count(MuscleCounter::BarrierCalls);
    allinea_muscle2_get_barrier_duration: f64 => seconds_per_call(CallKind::Barrier);
    allinea_muscle2_get_barrier_duration_cumulative: f64 => cumulative_seconds(CallKind::Barrier);
}
