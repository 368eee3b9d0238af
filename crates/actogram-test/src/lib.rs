//! Actogram Test Harness - Profile generation and pipeline validation
//!
//! This crate provides:
//! - A deterministic random generator for valid sparse profiles
//! - End-to-end pipeline helpers mirroring the production chain
//!   (normalize, remap, resample, day-split, grid export)
//! - Criterion benchmarks for the engine operations

pub mod generator;
pub mod pipeline;

pub use generator::*;
pub use pipeline::*;
