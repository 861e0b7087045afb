#![allow(non_snake_case)]

//! Stand-ins for libpapi when the `papi` feature is disabled. Every call
//! reports `PAPI_ENOSUPP`, so the plugin fails to initialise cleanly.

use libc::{c_char, c_int, c_longlong, c_ulong};
use map_metrics_sys::papi::PAPI_ENOSUPP;

pub unsafe extern "C" fn PAPI_library_init(_version: c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_is_initialized() -> c_int {
    0
}

pub unsafe extern "C" fn PAPI_thread_init(_id_fn: Option<unsafe extern "C" fn() -> c_ulong>) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_num_cmp_hwctrs(_cidx: c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_event_name_to_code(_in: *const c_char, _out: *mut c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_create_eventset(_event_set: *mut c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_add_events(_event_set: c_int, _events: *mut c_int, _number: c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_start(_event_set: c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_accum(_event_set: c_int, _values: *mut c_longlong) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_stop(_event_set: c_int, _values: *mut c_longlong) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_cleanup_eventset(_event_set: c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_destroy_eventset(_event_set: *mut c_int) -> c_int {
    PAPI_ENOSUPP
}

pub unsafe extern "C" fn PAPI_strerror(_code: c_int) -> *mut c_char {
    b"PAPI support not compiled in\0".as_ptr() as *mut c_char
}
