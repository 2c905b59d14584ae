// src/exec/mod.rs

//! Supervised process execution.
//!
//! Every external command this crate runs (platform preparation steps,
//! `steamcmd` login and build) goes through [`run`], which enforces a total
//! deadline and an output-inactivity limit and captures the combined
//! stdout/stderr as lines.
//!
//! - [`process`] holds the invocation/result types.
//! - [`activity`] is the last-activity cell shared by the two workers.
//! - [`supervisor`] spawns the child, the output reader and the inactivity
//!   monitor, and decides how the invocation ended.

pub mod activity;
pub mod process;
pub mod supervisor;

pub use activity::ActivityClock;
pub use process::{
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, ProcessResult, ProcessSpec, TIMED_OUT_STATUS,
    Termination, Timeouts,
};
pub use supervisor::run;
