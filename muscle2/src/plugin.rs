use map_metrics::error::Error;
use map_metrics::{nanos_to_secs, ratio, Sample, SampleTick, Tracker};

use crate::counters::{CallKind, MuscleCounter};
use crate::library::{ActiveCall, MuscleSource};

/// MUSCLE2 plugin state: the counter source, its tracker, and the call that
/// was in progress at the last sample.
#[derive(Debug)]
pub struct Muscle2Plugin<S> {
    source: S,
    tracker: Tracker<{ MuscleCounter::COUNT }>,
    active: Option<ActiveCall>,
}

impl<S: MuscleSource> Muscle2Plugin<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            tracker: Tracker::new(),
            active: None,
        }
    }

    /// Counter values for the sample taken at `tick`.
    ///
    /// The in-progress call is captured with the counters, once per sample,
    /// and kept only if the tracker accepts the counters.
    pub fn sample(&mut self, tick: SampleTick) -> Result<Sample<{ MuscleCounter::COUNT }>, Error> {
        let Self {
            source,
            tracker,
            active,
        } = self;

        let mut read_call = None;
        let s = tracker.observe_with(tick, || {
            read_call = Some(source.active_call());
            source.read()
        })?;

        if let Some(call) = read_call {
            *active = call;
        }
        Ok(s)
    }

    /// Increase of `counter` during the sample.
    pub fn count(&mut self, tick: SampleTick, counter: MuscleCounter) -> Result<u64, Error> {
        Ok(self.sample(tick)?.delta(counter))
    }

    /// Average seconds per `kind` call completed during the sample.
    ///
    /// While a call of that kind is in progress this is instead the time it
    /// has been running, so a long call shows up as a growing value rather
    /// than a single spike when it returns.
    pub fn seconds_per_call(&mut self, tick: SampleTick, kind: CallKind) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        if let Some(elapsed) = self.in_progress(tick, kind) {
            return Ok(elapsed);
        }

        Ok(nanos_to_secs(ratio(s.delta(kind.duration()), s.delta(kind.calls()))))
    }

    /// Seconds spent in `kind` calls since the plugin was initialised,
    /// including the running time of a call in progress.
    pub fn cumulative_seconds(&mut self, tick: SampleTick, kind: CallKind) -> Result<f64, Error> {
        let s = self.sample(tick)?;
        let running = self.in_progress(tick, kind).unwrap_or(0.0);

        Ok(nanos_to_secs(s.cumulative(kind.duration()) as f64) + running)
    }

    fn in_progress(&self, tick: SampleTick, kind: CallKind) -> Option<f64> {
        self.active
            .filter(|call| call.kind == kind)
            .map(|call| tick.secs_since(&call.started))
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
