//! Row-band segmentation of tall screenshots
//!
//! Classifies rows as blank, smooths away thin blank gaps and extracts the
//! content spans to be cropped out.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, SliceResult};
pub use steps::extract::RowRange;
