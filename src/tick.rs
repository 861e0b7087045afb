use libc::timespec;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// The instant the host sampler took a sample.
///
/// Every accessor called for one sample receives the same timestamp, which is
/// what lets a plugin read its counter source once and answer all of them
/// from the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SampleTick {
    sec: i64,
    nsec: i64,
}

impl SampleTick {
    pub const fn new(sec: i64, nsec: i64) -> Self {
        Self { sec, nsec }
    }

    pub fn sec(&self) -> i64 {
        self.sec
    }

    pub fn nsec(&self) -> i64 {
        self.nsec
    }

    /// Nanoseconds from `earlier` to `self`, zero if `earlier` is later.
    pub fn nanos_since(&self, earlier: &SampleTick) -> u64 {
        self.as_nanos().saturating_sub(earlier.as_nanos())
    }

    /// Seconds from `earlier` to `self`, zero if `earlier` is later.
    pub fn secs_since(&self, earlier: &SampleTick) -> f64 {
        nanos_to_secs(self.nanos_since(earlier) as f64)
    }

    fn as_nanos(&self) -> u64 {
        let sec = u64::try_from(self.sec).unwrap_or(0);
        let nsec = u64::try_from(self.nsec).unwrap_or(0);
        sec.saturating_mul(NANOS_PER_SEC).saturating_add(nsec)
    }
}

impl From<timespec> for SampleTick {
    fn from(ts: timespec) -> Self {
        Self {
            sec: ts.tv_sec as i64,
            nsec: ts.tv_nsec as i64,
        }
    }
}

impl From<&timespec> for SampleTick {
    fn from(ts: &timespec) -> Self {
        Self::from(*ts)
    }
}

/// Convert a nanosecond count to seconds.
pub fn nanos_to_secs(nanos: f64) -> f64 {
    nanos / NANOS_PER_SEC as f64
}
