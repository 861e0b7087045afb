//! Exported functions, built without libmuscle2.
#![cfg(not(feature = "muscle2"))]

use std::ptr;

use libc::timespec;
use map_muscle2::*;

#[test]
fn test_lifecycle_without_library() {
    let mut ts = timespec {
        tv_sec: 1,
        tv_nsec: 0,
    };

    assert_eq!(allinea_plugin_initialize(7, ptr::null_mut()), -1);

    // An uninitialised plugin reports zero
    let mut calls: u64 = 99;
    let mut duration: f64 = 99.0;
    unsafe {
        assert_eq!(allinea_muscle2_get_send_calls(1, &mut ts, &mut calls), 0);
        assert_eq!(allinea_muscle2_get_barrier_duration(2, &mut ts, &mut duration), 0);
    }
    assert_eq!(calls, 0);
    assert_eq!(duration, 0.0);

    unsafe {
        assert_eq!(allinea_muscle2_get_bytes_sent(3, ptr::null_mut(), &mut calls), -1);
        assert_eq!(allinea_muscle2_get_bytes_received(4, &mut ts, ptr::null_mut()), -1);
    }

    assert_eq!(allinea_plugin_cleanup(7, ptr::null_mut()), 0);
}
