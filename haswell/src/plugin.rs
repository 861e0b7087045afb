use map_metrics::error::Error;
use map_metrics::{ratio, CounterSource, Sample, SampleTick, Tracker};

use crate::events::HaswellEvent::{self, *};

type Events = Sample<{ HaswellEvent::COUNT }>;

/// Haswell plugin state: the event source and its tracker.
///
/// Every ratio is relative to the active cycles of the sample, and reads as
/// zero for a sample with no active cycles.
#[derive(Debug)]
pub struct HaswellPlugin<S> {
    source: S,
    tracker: Tracker<{ HaswellEvent::COUNT }>,
}

impl<S: CounterSource<{ HaswellEvent::COUNT }>> HaswellPlugin<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            tracker: Tracker::new(),
        }
    }

    /// Event counts during the sample taken at `tick`.
    pub fn sample(&mut self, tick: SampleTick) -> Result<Events, Error> {
        self.tracker.observe_source(tick, &mut self.source)
    }

    /// Active (unhalted) cycles during the sample.
    pub fn active_cycles(&mut self, tick: SampleTick) -> Result<u64, Error> {
        Ok(self.sample(tick)?.delta(ClkUnhalted))
    }

    /// Fraction of active cycles in which micro-ops executed.
    pub fn productive_cycles(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        let clk = s.delta(ClkUnhalted);
        Ok(ratio(clk.saturating_sub(s.delta(CyclesNoExecute)), clk))
    }

    /// Fraction of active cycles in which nothing executed.
    pub fn stall_cycles(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        Ok(of_active(&s, s.delta(CyclesNoExecute)))
    }

    /// Fraction of active cycles stalled on the memory subsystem.
    pub fn memory_bound(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        Ok(of_active(&s, memory_bound(&s)))
    }

    /// Fraction of active cycles stalled on memory bandwidth.
    pub fn bandwidth_bound(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        Ok(of_active(&s, bandwidth_bound(&s)))
    }

    /// Fraction of active cycles stalled on memory latency.
    pub fn latency_bound(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        Ok(of_active(&s, memory_bound(&s).saturating_sub(bandwidth_bound(&s))))
    }

    /// Fraction of active cycles stalled for reasons other than memory.
    pub fn other_stall_reason(&mut self, tick: SampleTick) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        Ok(of_active(&s, s.delta(CyclesNoExecute).saturating_sub(memory_bound(&s))))
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

fn of_active(s: &Events, cycles: u64) -> f64 {
    ratio(cycles, s.delta(ClkUnhalted))
}

fn memory_bound(s: &Events) -> u64 {
    s.delta(ResourceStallsSb).max(s.delta(StallsL1dPending))
}

fn bandwidth_bound(s: &Events) -> u64 {
    s.delta(ResourceStallsSb)
        .max(s.delta(L1dPendMissFbFull).saturating_add(s.delta(OffcoreRequestsBufferSqFull)))
}
