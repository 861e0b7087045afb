//! Subset of `papi.h` used by the Haswell plugin.

use libc::c_int;
#[cfg(feature = "papi")]
use libc::{c_char, c_longlong, c_ulong};

include!(concat!(env!("OUT_DIR"), "/papi_version.rs"));

pub const PAPI_OK: c_int = 0;
pub const PAPI_NULL: c_int = -1;
pub const PAPI_EINVAL: c_int = -1;
pub const PAPI_ENOSUPP: c_int = -16;

pub const PAPI_NOT_INITED: c_int = 0;
pub const PAPI_LOW_LEVEL_INITED: c_int = 1;
pub const PAPI_HIGH_LEVEL_INITED: c_int = 2;
pub const PAPI_THREAD_LEVEL_INITED: c_int = 4;

#[cfg(feature = "papi")]
extern "C" {
    pub fn PAPI_library_init(version: c_int) -> c_int;
    pub fn PAPI_is_initialized() -> c_int;
    pub fn PAPI_thread_init(id_fn: Option<unsafe extern "C" fn() -> c_ulong>) -> c_int;
    pub fn PAPI_num_cmp_hwctrs(cidx: c_int) -> c_int;
    pub fn PAPI_event_name_to_code(in_: *const c_char, out: *mut c_int) -> c_int;
    pub fn PAPI_create_eventset(event_set: *mut c_int) -> c_int;
    pub fn PAPI_add_events(event_set: c_int, events: *mut c_int, number: c_int) -> c_int;
    pub fn PAPI_start(event_set: c_int) -> c_int;
    pub fn PAPI_accum(event_set: c_int, values: *mut c_longlong) -> c_int;
    pub fn PAPI_stop(event_set: c_int, values: *mut c_longlong) -> c_int;
    pub fn PAPI_cleanup_eventset(event_set: c_int) -> c_int;
    pub fn PAPI_destroy_eventset(event_set: *mut c_int) -> c_int;
    pub fn PAPI_strerror(code: c_int) -> *mut c_char;
}
