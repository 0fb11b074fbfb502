use crate::error::SliceError;
use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;

use super::steps;
use super::steps::extract::RowRange;

/// Timing information for a single slicing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of slicing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct SliceResult {
    /// Content spans to crop, ascending
    pub ranges: Vec<RowRange>,
    /// Image height the ranges refer to
    pub rows: u32,
    /// Blank rows as classified
    pub blank_rows: usize,
    /// Blank rows left after smoothing
    pub blank_rows_smoothed: usize,
    /// Total slicing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Slicing pipeline: classify, smooth, extract
pub struct Pipeline {
    min_true_run: usize,
}

impl Pipeline {
    pub fn new(min_true_run: usize) -> Self {
        Self { min_true_run }
    }

    pub fn min_true_run(&self) -> usize {
        self.min_true_run
    }

    /// Compute the content ranges of an image
    pub fn process(&self, image: &DynamicImage) -> Result<SliceResult, SliceError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let blank = self.run_step("classify", &mut steps_timing, || {
            steps::classify::apply(image)
        })?;
        let blank_rows = count_true(&blank);
        tracing::debug!(rows = blank.len(), blank_rows, "classified rows");

        let smoothed = self.run_step("smooth", &mut steps_timing, || {
            Ok(steps::smooth::apply(&blank, self.min_true_run))
        })?;
        let blank_rows_smoothed = count_true(&smoothed);
        tracing::debug!(
            min_true_run = self.min_true_run,
            absorbed = blank_rows - blank_rows_smoothed,
            "smoothed short blank runs"
        );

        let ranges = self.run_step("extract", &mut steps_timing, || {
            Ok(steps::extract::apply(&smoothed))
        })?;
        tracing::debug!(ranges = ranges.len(), "extracted content ranges");

        Ok(SliceResult {
            ranges,
            rows: image.height(),
            blank_rows,
            blank_rows_smoothed,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, SliceError>
    where
        F: FnOnce() -> Result<T, SliceError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(steps::smooth::DEFAULT_MIN_TRUE_RUN)
    }
}

fn count_true(rows: &[bool]) -> usize {
    rows.iter().filter(|&&b| b).count()
}
