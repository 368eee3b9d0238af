//! Actogram Timeline - Sparse activity timeline engine
//!
//! This crate implements the run-length encoded representation of
//! person-day activity sequences and its transformations:
//! - offset normalization and duration derivation
//! - majority-vote resampling to coarser resolutions
//! - day-splitting at a recurring wall-clock boundary
//! - label remapping with adjacent-run merging
//! - conversion between sparse runs and dense per-tick rows

pub mod grid;
pub mod run;
pub mod timeline;

pub use grid::*;
pub use run::*;
pub use timeline::*;
