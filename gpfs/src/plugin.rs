use map_metrics::error::Error;
use map_metrics::{ratio, CounterSource, Sample, SampleTick, Tracker};

/// The counters the GPFS plugin derives from one shared segment read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpfsCounter {
    /// Cycles spent in all VFS calls.
    IoCycles,
    /// Number of VFS calls of any kind.
    Iops,
    /// Inode lookups.
    InodeLookups,
    /// Opens.
    Opens,
    /// Reads, including mmap and async reads.
    Reads,
    /// Writes, including mmap and async writes.
    Writes,
}

impl GpfsCounter {
    /// Number of counters in a snapshot.
    pub const COUNT: usize = 6;
}

impl From<GpfsCounter> for usize {
    fn from(c: GpfsCounter) -> usize {
        c as usize
    }
}

/// GPFS plugin state: the counter source and its tracker.
#[derive(Debug)]
pub struct GpfsPlugin<S> {
    source: S,
    tracker: Tracker<{ GpfsCounter::COUNT }>,
}

impl<S: CounterSource<{ GpfsCounter::COUNT }>> GpfsPlugin<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            tracker: Tracker::new(),
        }
    }

    /// Counter values for the sample taken at `tick`.
    pub fn sample(&mut self, tick: SampleTick) -> Result<Sample<{ GpfsCounter::COUNT }>, Error> {
        self.tracker.observe_source(tick, &mut self.source)
    }

    /// Increase of `counter` during the sample at `tick`.
    pub fn delta(&mut self, tick: SampleTick, counter: GpfsCounter) -> Result<u64, Error> {
        Ok(self.sample(tick)?.delta(counter))
    }

    /// Increase of `counter` since the plugin was initialised.
    pub fn total(&mut self, tick: SampleTick, counter: GpfsCounter) -> Result<u64, Error> {
        Ok(self.sample(tick)?.cumulative(counter))
    }

    /// Average cycles per VFS call during the sample at `tick`.
    pub fn cycles_per_iop(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        Ok(ratio(s.delta(GpfsCounter::IoCycles), s.delta(GpfsCounter::Iops)))
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
