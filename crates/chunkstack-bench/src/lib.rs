//! Workload generators for benchmarking and examples.
//!
//! - [`workload::sawtooth`]: push/pop churn that repeatedly fills and drains
//! - [`workload::Grid`] and [`workload::count_regions`]: flood fill driven by
//!   an explicit work list
//!
//! Every generator takes a seed and is fully deterministic, so bench runs
//! are comparable across machines.

#![forbid(unsafe_code)]

pub mod workload;

pub use workload::{count_regions, run_ops, sawtooth, Grid, Op, WorkList};
