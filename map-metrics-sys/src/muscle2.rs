//! Subset of `muscle_perf.h`, the MUSCLE2 performance counter API.

use libc::c_int;
#[cfg(feature = "muscle2")]
use libc::timespec;

/// `muscle_perf_counter_t`
pub type muscle_perf_counter_t = c_int;

pub const MUSCLE_PERF_COUNTER_SEND_CALLS: muscle_perf_counter_t = 0;
pub const MUSCLE_PERF_COUNTER_SEND_DURATION: muscle_perf_counter_t = 1;
pub const MUSCLE_PERF_COUNTER_SEND_SIZE: muscle_perf_counter_t = 2;
pub const MUSCLE_PERF_COUNTER_RECEIVE_CALLS: muscle_perf_counter_t = 3;
pub const MUSCLE_PERF_COUNTER_RECEIVE_DURATION: muscle_perf_counter_t = 4;
pub const MUSCLE_PERF_COUNTER_RECEIVE_SIZE: muscle_perf_counter_t = 5;
pub const MUSCLE_PERF_COUNTER_BARRIER_CALLS: muscle_perf_counter_t = 6;
pub const MUSCLE_PERF_COUNTER_BARRIER_DURATION: muscle_perf_counter_t = 7;
pub const MUSCLE_PERF_COUNTER_LAST: muscle_perf_counter_t = 8;

#[cfg(feature = "muscle2")]
extern "C" {
    pub fn MUSCLE_Perf_Reset_Counters();
    pub fn MUSCLE_Perf_Get_Counter(id: muscle_perf_counter_t, value: *mut u64) -> c_int;
    pub fn MUSCLE_Perf_In_Call(start_time: *mut timespec, id: *mut muscle_perf_counter_t) -> bool;
}
