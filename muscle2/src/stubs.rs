#![allow(non_snake_case)]

//! Stand-ins for libmuscle2 when the `muscle2` feature is disabled. No
//! counter can be read, so the plugin fails to initialise cleanly.

use libc::{c_int, timespec};
use map_metrics_sys::muscle2::muscle_perf_counter_t;

pub unsafe extern "C" fn MUSCLE_Perf_Reset_Counters() {}

pub unsafe extern "C" fn MUSCLE_Perf_Get_Counter(_id: muscle_perf_counter_t, _value: *mut u64) -> c_int {
    -1
}

pub unsafe extern "C" fn MUSCLE_Perf_In_Call(_start_time: *mut timespec, _id: *mut muscle_perf_counter_t) -> bool {
    false
}
