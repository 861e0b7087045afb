use log::{debug, warn};

use crate::error::{new_error_with_message, Error, ErrorKind};
use crate::source::CounterSource;
use crate::tick::SampleTick;

/// The values a [`Tracker`] produced for one sample.
///
/// `delta` is the increase since the previous distinct sample, `cumulative`
/// is the increase since the first observation after the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample<const N: usize> {
    deltas: [u64; N],
    cumulatives: [u64; N],
}

impl<const N: usize> Sample<N> {
    const ZERO: Self = Self {
        deltas: [0; N],
        cumulatives: [0; N],
    };

    /// Increase of counter `key` since the previous sample.
    pub fn delta(&self, key: impl Into<usize>) -> u64 {
        self.deltas[key.into()]
    }

    /// Increase of counter `key` since tracking started.
    pub fn cumulative(&self, key: impl Into<usize>) -> u64 {
        self.cumulatives[key.into()]
    }

    pub fn deltas(&self) -> &[u64; N] {
        &self.deltas
    }

    pub fn cumulatives(&self) -> &[u64; N] {
        &self.cumulatives
    }
}

impl<const N: usize> Default for Sample<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

#[derive(Debug, Clone, Copy)]
enum State<const N: usize> {
    Uninitialized,
    Tracking { baseline: [u64; N], last: Sample<N> },
}

/// Turns a stream of raw counter snapshots into per-sample deltas and
/// running totals, reading the source at most once per sample.
///
/// The first observation only records a baseline and reports zero for
/// everything, so counters that were already running when the plugin loaded
/// (a filesystem shared by many processes, a PMU with cycles from boot) do
/// not show up as one huge spike.
///
/// ```
/// use map_metrics::{SampleTick, Tracker};
///
/// let mut tracker = Tracker::<1>::new();
///
/// let s = tracker.observe(SampleTick::new(1, 0), [1_000])?;
/// assert_eq!(s.delta(0usize), 0);
///
/// let s = tracker.observe(SampleTick::new(2, 0), [1_340])?;
/// assert_eq!(s.delta(0usize), 340);
/// assert_eq!(s.cumulative(0usize), 340);
/// #
/// # Ok::<(), map_metrics::error::Error>(())
/// ```
///
/// The tracker does no locking of its own, callers that share one between
/// threads have to serialise access.
#[derive(Debug, Clone)]
pub struct Tracker<const N: usize> {
    state: State<N>,
    last_tick: Option<SampleTick>,
}

impl<const N: usize> Tracker<N> {
    pub const fn new() -> Self {
        Self {
            state: State::Uninitialized,
            last_tick: None,
        }
    }

    /// True once a baseline has been recorded.
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, State::Tracking { .. })
    }

    /// The sample the current values belong to.
    pub fn last_tick(&self) -> Option<SampleTick> {
        self.last_tick
    }

    /// The values produced for the most recent successful sample.
    pub fn last(&self) -> Option<Sample<N>> {
        match self.state {
            State::Uninitialized => None,
            State::Tracking { last, .. } => Some(last),
        }
    }

    /// Record an already-read snapshot for `tick`.
    ///
    /// If `tick` was already observed, `raw` is ignored and the values
    /// computed for that tick are returned again.
    pub fn observe(&mut self, tick: SampleTick, raw: [u64; N]) -> Result<Sample<N>, Error> {
        self.observe_with(tick, || Ok(raw))
    }

    /// Read `source` for `tick` unless this tick has been seen already.
    pub fn observe_source<S>(&mut self, tick: SampleTick, source: &mut S) -> Result<Sample<N>, Error>
    where
        S: CounterSource<N> + ?Sized,
    {
        self.observe_with(tick, || source.read())
    }

    /// Call `read` for `tick` unless this tick has been seen already.
    ///
    /// A failing read, or a snapshot that moved backwards, commits nothing:
    /// the baseline, the running totals and the last seen tick are kept so
    /// the same tick can be retried.
    pub fn observe_with<F>(&mut self, tick: SampleTick, read: F) -> Result<Sample<N>, Error>
    where
        F: FnOnce() -> Result<[u64; N], Error>,
    {
        if self.last_tick == Some(tick) {
            if let State::Tracking { last, .. } = self.state {
                return Ok(last);
            }
        }

        let raw = read().map_err(|e| {
            warn!("counter read failed at {:?}: {}", tick, e);
            e
        })?;

        let next = match self.state {
            State::Uninitialized => {
                debug!("baseline recorded at {:?}: {:?}", tick, raw);
                State::Tracking {
                    baseline: raw,
                    last: Sample::ZERO,
                }
            }
            State::Tracking { baseline, last } => State::Tracking {
                baseline,
                last: advance(&baseline, &last, &raw)?,
            },
        };

        self.state = next;
        self.last_tick = Some(tick);

        Ok(self.last().unwrap_or_default())
    }

    /// Forget the baseline and all derived values.
    ///
    /// The next observation records a fresh baseline.
    pub fn reset(&mut self) {
        self.state = State::Uninitialized;
        self.last_tick = None;
    }
}

impl<const N: usize> Default for Tracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn advance<const N: usize>(
    baseline: &[u64; N],
    last: &Sample<N>,
    raw: &[u64; N],
) -> Result<Sample<N>, Error> {
    let mut next = Sample::ZERO;

    for i in 0..N {
        let cumulative = raw[i]
            .checked_sub(baseline[i])
            .filter(|c| *c >= last.cumulatives[i])
            .ok_or_else(|| {
                new_error_with_message(
                    ErrorKind::CounterRegressed,
                    format!(
                        "counter {} read {} (baseline {}, previous total {})",
                        i, raw[i], baseline[i], last.cumulatives[i]
                    ),
                )
            })?;

        next.cumulatives[i] = cumulative;
        next.deltas[i] = cumulative - last.cumulatives[i];
    }

    Ok(next)
}

/// `numerator / denominator`, or 0 when the denominator is 0.
///
/// Sampled hardware counters legitimately read zero on idle samples, so an
/// empty denominator is a zero ratio rather than an error.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
