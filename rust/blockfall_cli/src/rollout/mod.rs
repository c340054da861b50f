// src/rollout/mod.rs
#![forbid(unsafe_code)]

pub mod runner;
pub mod sinks;
pub mod stats;

pub use runner::{PolicyKind, Runner, RunnerConfig};
pub use sinks::{GameTableSink, JsonLinesSink, RolloutSink};
