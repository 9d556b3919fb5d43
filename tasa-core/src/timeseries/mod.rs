//! Time-series utilities for the transform-and-merge pipeline.
//!
//! - `transform`: unit transforms over positional lags and the resample-units-formula pipeline
//! - `formula`: whitelisted arithmetic over one placeholder
//! - `resample`: calendar-aligned bucketing
//! - `merge`: outer join with collision renames, future cut and forward-fill
//! - `project`: release-history rows from one merged column
//! - `recession`: NBER bands and visible chart window

/// Whitelisted formula parser and evaluator.
pub mod formula;
/// Outer join of labeled series into a `MergedTable`.
pub mod merge;
/// Release-history projection.
pub mod project;
/// Recession bands and chart window helpers.
pub mod recession;
/// Calendar-aligned resampling.
pub mod resample;
/// Unit transforms.
pub mod transform;
