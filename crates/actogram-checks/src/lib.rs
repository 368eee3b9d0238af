//! Actogram Checks - Plausibility checks for activity profiles
//!
//! This crate provides the rule-based consumers of the sparse timeline
//! representation:
//! - Sleep plausibility checks (overall share, over-long sleep and awake
//!   stretches)
//! - Threshold filters for day profiles (completeness, run counts, run
//!   durations)
//! - Check result reporting across whole profile batches

pub mod filter;
pub mod report;
pub mod sleep;

pub use filter::*;
pub use report::*;
pub use sleep::*;
