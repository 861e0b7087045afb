use libc::timespec;
use log::debug;
use map_metrics::error::{new_error_with_message, Error, ErrorKind};
use map_metrics::{CounterSource, SampleTick};
use map_metrics_sys::muscle2::muscle_perf_counter_t;

#[cfg(feature = "muscle2")]
use map_metrics_sys::muscle2::*;

#[cfg(not(feature = "muscle2"))]
use crate::stubs::*;

use crate::counters::{CallKind, MuscleCounter};

/// A MUSCLE2 call in progress at the time of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCall {
    pub kind: CallKind,
    pub started: SampleTick,
}

/// Source of MUSCLE2 counters.
///
/// Besides the counters themselves, MUSCLE2 can say whether the program is
/// inside a call right now. A call's duration is only added to its counter
/// when the call returns.
pub trait MuscleSource: CounterSource<{ MuscleCounter::COUNT }> {
    /// The call in progress, if any.
    fn active_call(&mut self) -> Option<ActiveCall>;
}

/// The counters kept by the linked MUSCLE2 library.
#[derive(Debug)]
pub struct MuscleLibrary {
    _private: (),
}

impl MuscleLibrary {
    /// Zero the library's counters and check they can be read.
    pub fn open() -> Result<Self, Error> {
        unsafe { MUSCLE_Perf_Reset_Counters() };

        let mut value = 0;
        if unsafe { MUSCLE_Perf_Get_Counter(MuscleCounter::SendCalls.id(), &mut value) } != 0 {
            return Err(new_error_with_message(
                ErrorKind::SourceUnavailable,
                "MUSCLE2 performance counters are not available",
            ));
        }

        debug!("MUSCLE2 counters reset");
        Ok(MuscleLibrary { _private: () })
    }
}

impl CounterSource<{ MuscleCounter::COUNT }> for MuscleLibrary {
    fn read(&mut self) -> Result<[u64; MuscleCounter::COUNT], Error> {
        let mut out = [0; MuscleCounter::COUNT];
        for (value, counter) in out.iter_mut().zip(MuscleCounter::ALL) {
            if unsafe { MUSCLE_Perf_Get_Counter(counter.id(), value) } != 0 {
                return Err(new_error_with_message(
                    ErrorKind::ReadFailed,
                    format!("MUSCLE_Perf_Get_Counter({:?})", counter),
                ));
            }
        }
        Ok(out)
    }
}

impl MuscleSource for MuscleLibrary {
    fn active_call(&mut self) -> Option<ActiveCall> {
        let mut start = timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let mut id: muscle_perf_counter_t = 0;

        if !unsafe { MUSCLE_Perf_In_Call(&mut start, &mut id) } {
            return None;
        }

        CallKind::from_duration_id(id).map(|kind| ActiveCall {
            kind,
            started: SampleTick::from(start),
        })
    }
}
