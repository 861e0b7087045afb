//! Raw declarations for the C interfaces the MAP metric plugins sit between.
//!
//! The `host` module describes what the profiler hands to a plugin. The other
//! modules describe the counter sources the plugins read from. Function
//! declarations for `libpapi` and `libmuscle2` are only compiled in when the
//! `papi` / `muscle2` features are enabled, as those features also make the
//! build script link the libraries.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

pub mod gpfs;
pub mod host;
pub mod muscle2;
pub mod papi;
