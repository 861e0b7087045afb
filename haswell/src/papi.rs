use std::ffi::{CStr, CString};

use libc::{c_int, c_longlong, c_ulong};
use log::{debug, warn};
use map_metrics::error::{new_error_with_message, new_library_error, Error, ErrorKind};
use map_metrics::CounterSource;
use map_metrics_sys::papi::{
    PAPI_LOW_LEVEL_INITED, PAPI_NULL, PAPI_OK, PAPI_THREAD_LEVEL_INITED, PAPI_VER_CURRENT,
};

#[cfg(feature = "papi")]
use map_metrics_sys::papi::*;

#[cfg(not(feature = "papi"))]
use crate::stubs::*;

use crate::config::HaswellConfig;
use crate::events::HaswellEvent;

const N: usize = HaswellEvent::COUNT;

/// A started PAPI event set counting the [`HaswellEvent`]s.
///
/// `PAPI_accum` zeroes the hardware counters on every read, so the event set
/// keeps its own running totals and reads as monotonic counters.
///
/// Dropping the event set stops and destroys it; use [`shutdown`] to see
/// any errors from doing so.
///
/// [`shutdown`]: PapiEventSet::shutdown
#[derive(Debug)]
pub struct PapiEventSet {
    event_set: c_int,
    totals: [u64; N],
}

impl PapiEventSet {
    /// Initialise PAPI with thread support and start counting the events
    /// named in `config`.
    pub fn start(config: &HaswellConfig) -> Result<Self, Error> {
        init_library()?;

        let mut codes = event_codes(config)?;

        let mut set = PapiEventSet {
            event_set: PAPI_NULL,
            totals: [0; N],
        };

        let rc = unsafe { PAPI_create_eventset(&mut set.event_set) };
        if rc != PAPI_OK {
            return Err(papi_error(rc, "Could not create event set"));
        }

        let rc = unsafe { PAPI_add_events(set.event_set, codes.as_mut_ptr(), N as c_int) };
        if rc > 0 {
            // A positive return is the number of events added before failing
            let name = config.events().get(rc as usize - 1).map(String::as_str).unwrap_or("?");
            return Err(new_library_error(
                rc,
                format!(
                    "Error adding events to the event set. First error detected adding event \"{}\"",
                    name
                ),
            ));
        } else if rc != PAPI_OK {
            return Err(papi_error(rc, "Error adding events to the event set"));
        }

        let rc = unsafe { PAPI_start(set.event_set) };
        if rc != PAPI_OK {
            return Err(papi_error(rc, "Could not get PAPI_start"));
        }

        debug!("PAPI event set {} started: {:?}", set.event_set, config.events());
        Ok(set)
    }

    /// Stop counting and release the event set.
    pub fn shutdown(mut self) -> Result<(), Error> {
        self.release()
    }

    fn release(&mut self) -> Result<(), Error> {
        if self.event_set == PAPI_NULL {
            return Ok(());
        }

        let mut values: [c_longlong; N] = [0; N];
        let rc = unsafe { PAPI_stop(self.event_set, values.as_mut_ptr()) };
        if rc != PAPI_OK {
            // The event set may never have been started; still clean it up
            warn!("PAPI_stop: {}", strerror(rc));
        }

        let rc = unsafe { PAPI_cleanup_eventset(self.event_set) };
        if rc != PAPI_OK {
            return Err(papi_error(rc, "Error in PAPI_cleanup_eventset"));
        }

        let rc = unsafe { PAPI_destroy_eventset(&mut self.event_set) };
        if rc != PAPI_OK {
            return Err(papi_error(rc, "Error in PAPI_destroy_eventset"));
        }

        self.event_set = PAPI_NULL;
        Ok(())
    }
}

impl CounterSource<N> for PapiEventSet {
    fn read(&mut self) -> Result<[u64; N], Error> {
        let mut values: [c_longlong; N] = [0; N];
        let rc = unsafe { PAPI_accum(self.event_set, values.as_mut_ptr()) };
        if rc != PAPI_OK {
            return Err(papi_error(rc, "Error updating metric values"));
        }

        accumulate(&mut self.totals, &values);
        Ok(self.totals)
    }
}

impl Drop for PapiEventSet {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("releasing PAPI event set: {}", e);
        }
    }
}

/// Add one `PAPI_accum` read into the running totals. Negative counts are
/// treated as zero.
fn accumulate(totals: &mut [u64; N], values: &[c_longlong; N]) {
    for (total, v) in totals.iter_mut().zip(values.iter()) {
        *total = total.saturating_add((*v).max(0) as u64);
    }
}

fn init_library() -> Result<(), Error> {
    let rc = unsafe { PAPI_library_init(PAPI_VER_CURRENT) };
    if rc > 0 && rc != PAPI_VER_CURRENT {
        return Err(papi_error(rc, "PAPI library version mismatch"));
    }
    if rc < 0 {
        return Err(papi_error(rc, "Could not initialise PAPI library"));
    }

    let rc = unsafe { PAPI_is_initialized() };
    if rc != PAPI_LOW_LEVEL_INITED {
        return Err(papi_error(rc, "PAPI incorrectly initialised"));
    }

    // The profiled program may be multithreaded
    let id_fn: unsafe extern "C" fn() -> c_ulong = thread_id;
    let rc = unsafe { PAPI_thread_init(Some(id_fn)) };
    if rc != PAPI_OK {
        return Err(papi_error(
            rc,
            "Could not enable thread support (error in PAPI_thread_init)",
        ));
    }

    let rc = unsafe { PAPI_is_initialized() };
    if rc != PAPI_THREAD_LEVEL_INITED + PAPI_LOW_LEVEL_INITED {
        return Err(papi_error(rc, "PAPI not initialised with thread support"));
    }

    let counters = unsafe { PAPI_num_cmp_hwctrs(0) };
    if counters < 0 {
        return Err(new_library_error(
            counters,
            "This installation does not support PAPI",
        ));
    } else if counters == 0 {
        return Err(new_error_with_message(
            ErrorKind::SourceUnavailable,
            "This machine does not provide hardware counters",
        ));
    }

    Ok(())
}

fn event_codes(config: &HaswellConfig) -> Result<[c_int; N], Error> {
    let mut codes = [PAPI_NULL; N];

    for (code, name) in codes.iter_mut().zip(config.events()) {
        let c_name = CString::new(name.as_str()).map_err(|_| {
            new_error_with_message(ErrorKind::SourceUnavailable, format!("invalid event name {:?}", name))
        })?;

        let rc = unsafe { PAPI_event_name_to_code(c_name.as_ptr(), code) };
        if rc != PAPI_OK {
            return Err(papi_error(rc, &format!("Unknown event \"{}\"", name)));
        }
    }

    Ok(codes)
}

unsafe extern "C" fn thread_id() -> c_ulong {
    libc::syscall(libc::SYS_gettid) as c_ulong
}

fn strerror(rc: c_int) -> String {
    let p = unsafe { PAPI_strerror(rc) };
    if p.is_null() {
        return format!("PAPI error {}", rc);
    }
    unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned()
}

fn papi_error(rc: c_int, context: &str) -> Error {
    new_library_error(rc, format!("{}. PAPI error: {}", context, strerror(rc)))
}
