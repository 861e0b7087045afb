#![warn(missing_docs)]

//! `map-metrics` holds the pieces shared by the Arm MAP custom metric
//! plugins in this repository: GPFS I/O counters, Haswell memory-bound
//! ratios from PAPI, and MUSCLE2 coupling timings.
//!
//! MAP samples a running program at a cadence of its own choosing. At each
//! sample it calls every metric accessor a plugin exports, passing all of
//! them the same sample timestamp. The plugins here read their counter
//! source once per timestamp and answer every accessor from that one
//! snapshot, via the [`Tracker`]:
//!
//! * the first snapshot becomes the baseline and reports zero,
//! * later snapshots report the increase since the previous sample (the
//!   delta) and since the baseline (the cumulative value),
//! * ratios between deltas are zero when the denominator is zero.
//!
//! The rest of the crate is glue for the plugin ABI: [`PluginSlot`] holds
//! the process-wide plugin instance behind the exported C functions, and
//! [`host`] delivers error messages back to the profiler.

#[macro_use]
extern crate lazy_static;

#[allow(missing_docs)]
pub mod error;
pub mod host;
pub mod logger;

mod slot;
pub use self::slot::PluginSlot;

mod source;
pub use self::source::CounterSource;

#[allow(missing_docs)]
mod tick;
pub use self::tick::{nanos_to_secs, SampleTick};

#[allow(missing_docs)]
mod tracker;
pub use self::tracker::{ratio, Sample, Tracker};
