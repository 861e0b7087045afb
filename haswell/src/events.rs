/// The hardware events the plugin programs into its PAPI event set, in
/// event set order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaswellEvent {
    /// Core cycles while the thread is not halted (active cycles).
    ClkUnhalted,
    /// Cycles in which no micro-ops were executed.
    CyclesNoExecute,
    /// Cycles stalled on a full store buffer.
    ResourceStallsSb,
    /// Execution stalls while an L1D miss is outstanding.
    StallsL1dPending,
    /// Cycles an L1D miss could not allocate a fill buffer.
    L1dPendMissFbFull,
    /// Cycles the offcore super queue was full.
    OffcoreRequestsBufferSqFull,
}

impl HaswellEvent {
    /// Number of events in the event set.
    pub const COUNT: usize = 6;

    /// Native PAPI event names, indexed by `HaswellEvent as usize`.
    pub const DEFAULT_NAMES: [&'static str; HaswellEvent::COUNT] = [
        "CPU_CLK_UNHALTED",
        "CYCLE_ACTIVITY:CYCLES_NO_EXECUTE",
        "RESOURCE_STALLS:SB",
        "CYCLE_ACTIVITY:STALLS_L1D_PENDING",
        "L1D_PEND_MISS:FB_FULL",
        "OFFCORE_REQUESTS_BUFFER:SQ_FULL",
    ];
}

impl From<HaswellEvent> for usize {
    fn from(e: HaswellEvent) -> usize {
        e as usize
    }
}
