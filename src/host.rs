//! Glue for the profiler side of the plugin ABI.
//!
//! The host exports `allinea_set_plugin_error_messagef` and
//! `allinea_set_metric_error_messagef` from its own image. They are looked up
//! at runtime rather than linked, so the plugins load (and their tests run)
//! in processes that are not the profiler. Messages that cannot be delivered
//! are logged instead.

use std::ffi::CString;

use libc::{c_int, c_void};
use log::error;
use map_metrics_sys::host::{
    set_metric_error_messagef_t, set_plugin_error_messagef_t, SET_METRIC_ERROR_MESSAGEF,
    SET_PLUGIN_ERROR_MESSAGEF,
};

pub use map_metrics_sys::host::{metric_id_t, plugin_id_t};

use crate::error::{Error, ErrorKind};

/// Return value of a successful plugin call.
pub const SUCCESS: c_int = 0;

/// Return value of a failed plugin call.
pub const FAILURE: c_int = -1;

/// Error code used for initialisation failures without a library code.
pub const ERROR_INITIALIZATION_FAILED: c_int = 100;

struct HostApi {
    plugin_error: Option<set_plugin_error_messagef_t>,
    metric_error: Option<set_metric_error_messagef_t>,
}

lazy_static! {
    static ref HOST: HostApi = HostApi::resolve();
}

impl HostApi {
    fn resolve() -> Self {
        // SAFETY: the symbols, when present, have the signatures declared in
        // map_metrics_sys::host.
        unsafe {
            let plugin_error = lookup(SET_PLUGIN_ERROR_MESSAGEF)
                .map(|p| std::mem::transmute::<*mut c_void, set_plugin_error_messagef_t>(p));
            let metric_error = lookup(SET_METRIC_ERROR_MESSAGEF)
                .map(|p| std::mem::transmute::<*mut c_void, set_metric_error_messagef_t>(p));
            HostApi {
                plugin_error,
                metric_error,
            }
        }
    }
}

unsafe fn lookup(name: &[u8]) -> Option<*mut c_void> {
    let p = libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr().cast());
    if p.is_null() {
        None
    } else {
        Some(p)
    }
}

/// Resolve the host functions now, outside of any signal context.
pub fn preload() {
    lazy_static::initialize(&HOST);
}

/// Report a plugin-level error message to the profiler.
pub fn set_plugin_error(plugin_id: plugin_id_t, code: c_int, message: &str) {
    let msg = c_message(message);
    match HOST.plugin_error {
        Some(f) => unsafe {
            f(plugin_id, code, b"%s\0".as_ptr().cast(), msg.as_ptr());
        },
        None => error!("plugin {} error {}: {}", plugin_id, code, message),
    }
}

/// Report a metric-level error message to the profiler.
pub fn set_metric_error(metric_id: metric_id_t, code: c_int, message: &str) {
    let msg = c_message(message);
    match HOST.metric_error {
        Some(f) => unsafe {
            f(metric_id, code, b"%s\0".as_ptr().cast(), msg.as_ptr());
        },
        None => error!("metric {} error {}: {}", metric_id, code, message),
    }
}

fn c_message(message: &str) -> CString {
    CString::new(message.replace('\0', " ")).unwrap_or_default()
}

/// Error code to hand to the host for `err`.
pub fn error_code(err: &Error) -> c_int {
    match err.kind() {
        ErrorKind::SourceUnavailable => ERROR_INITIALIZATION_FAILED,
        _ => err.code().unwrap_or(FAILURE),
    }
}

/// Translate the result of `initialize`/`cleanup` into the ABI return value,
/// reporting any error message to the host.
pub fn plugin_status(plugin_id: plugin_id_t, result: Result<(), Error>) -> c_int {
    match result {
        Ok(()) => SUCCESS,
        Err(e) => {
            set_plugin_error(plugin_id, error_code(&e), &e.to_string());
            FAILURE
        }
    }
}
