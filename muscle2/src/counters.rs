use map_metrics_sys::muscle2::*;

/// MUSCLE2 performance counters, in snapshot order. Durations are in
/// nanoseconds, sizes in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuscleCounter {
    SendCalls,
    SendDuration,
    SendSize,
    ReceiveCalls,
    ReceiveDuration,
    ReceiveSize,
    BarrierCalls,
    BarrierDuration,
}

impl MuscleCounter {
    /// Number of counters in a snapshot.
    pub const COUNT: usize = 8;

    pub const ALL: [MuscleCounter; MuscleCounter::COUNT] = [
        MuscleCounter::SendCalls,
        MuscleCounter::SendDuration,
        MuscleCounter::SendSize,
        MuscleCounter::ReceiveCalls,
        MuscleCounter::ReceiveDuration,
        MuscleCounter::ReceiveSize,
        MuscleCounter::BarrierCalls,
        MuscleCounter::BarrierDuration,
    ];

    /// The library's identifier for this counter.
    pub fn id(self) -> muscle_perf_counter_t {
        match self {
            MuscleCounter::SendCalls => MUSCLE_PERF_COUNTER_SEND_CALLS,
            MuscleCounter::SendDuration => MUSCLE_PERF_COUNTER_SEND_DURATION,
            MuscleCounter::SendSize => MUSCLE_PERF_COUNTER_SEND_SIZE,
            MuscleCounter::ReceiveCalls => MUSCLE_PERF_COUNTER_RECEIVE_CALLS,
            MuscleCounter::ReceiveDuration => MUSCLE_PERF_COUNTER_RECEIVE_DURATION,
            MuscleCounter::ReceiveSize => MUSCLE_PERF_COUNTER_RECEIVE_SIZE,
            MuscleCounter::BarrierCalls => MUSCLE_PERF_COUNTER_BARRIER_CALLS,
            MuscleCounter::BarrierDuration => MUSCLE_PERF_COUNTER_BARRIER_DURATION,
        }
    }
}

impl From<MuscleCounter> for usize {
    fn from(c: MuscleCounter) -> usize {
        c as usize
    }
}

/// A kind of MUSCLE2 call that is counted and timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Send,
    Receive,
    Barrier,
}

impl CallKind {
    pub fn calls(self) -> MuscleCounter {
        match self {
            CallKind::Send => MuscleCounter::SendCalls,
            CallKind::Receive => MuscleCounter::ReceiveCalls,
            CallKind::Barrier => MuscleCounter::BarrierCalls,
        }
    }

    pub fn duration(self) -> MuscleCounter {
        match self {
            CallKind::Send => MuscleCounter::SendDuration,
            CallKind::Receive => MuscleCounter::ReceiveDuration,
            CallKind::Barrier => MuscleCounter::BarrierDuration,
        }
    }

    /// The call kind the library reports as in progress via its duration
    /// counter identifier.
    pub fn from_duration_id(id: muscle_perf_counter_t) -> Option<CallKind> {
        [CallKind::Send, CallKind::Receive, CallKind::Barrier]
            .into_iter()
            .find(|k| k.duration().id() == id)
    }
}
