//! Scalar types of the MAP custom metric plugin ABI
//! (`allinea_metric_plugin_types.h`).

use libc::{c_char, c_int};

/// Opaque handle the profiler assigns to a loaded plugin.
pub type plugin_id_t = c_int;

/// Opaque handle the profiler assigns to each metric a plugin publishes.
pub type metric_id_t = c_int;

/// Symbol name of the host's plugin error reporting function.
pub const SET_PLUGIN_ERROR_MESSAGEF: &[u8] = b"allinea_set_plugin_error_messagef\0";

/// Symbol name of the host's metric error reporting function.
pub const SET_METRIC_ERROR_MESSAGEF: &[u8] = b"allinea_set_metric_error_messagef\0";

/// `int allinea_set_plugin_error_messagef(plugin_id_t, int, const char *, ...)`
pub type set_plugin_error_messagef_t =
    unsafe extern "C" fn(plugin_id: plugin_id_t, error_code: c_int, format: *const c_char, ...) -> c_int;

/// `int allinea_set_metric_error_messagef(metric_id_t, int, const char *, ...)`
pub type set_metric_error_messagef_t =
    unsafe extern "C" fn(metric_id: metric_id_t, error_code: c_int, format: *const c_char, ...) -> c_int;
