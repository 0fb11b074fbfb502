//! Cropping content ranges out of the page and writing them as PNG files

use crate::error::SliceError;
use crate::slicing::RowRange;
use image::{DynamicImage, ImageBuffer, ImageFormat, Pixel};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Rows added above and below every range
const PADDING: i64 = 1;

/// How padding rows that fall outside the image are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Drop padding rows outside the image
    #[default]
    Clamp,
    /// Fill padding rows outside the image with zero-valued pixels
    Pad,
}

impl EdgePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Pad => "pad",
        }
    }
}

/// One written crop
#[derive(Debug, Clone, Serialize)]
pub struct ExportedSlice {
    pub index: usize,
    pub range: RowRange,
    /// First source row of the crop; negative when padded past the top
    pub top: i64,
    pub height: u32,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub slices: Vec<ExportedSlice>,
}

impl ExportReport {
    pub fn count(&self) -> usize {
        self.slices.len()
    }
}

/// File name of the `index`-th crop
pub fn slice_file_name(index: usize) -> String {
    format!("cropped_image_{index}.png")
}

/// Writes crops of one page into an output directory
pub struct Exporter {
    output_dir: PathBuf,
    policy: EdgePolicy,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>, policy: EdgePolicy) -> Self {
        Self {
            output_dir: output_dir.into(),
            policy,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if missing. Returns `true` if it was created.
    pub fn prepare(&self) -> Result<bool, SliceError> {
        if self.output_dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.output_dir).map_err(|source| SliceError::OutputDirError {
            path: self.output_dir.clone(),
            source,
        })?;
        tracing::debug!(path = %self.output_dir.display(), "created output directory");
        Ok(true)
    }

    /// Crop and write every range in order, numbering files from zero.
    /// The output directory is created first if needed.
    ///
    /// Stops at the first failure; files already written stay on disk.
    pub fn export(
        &self,
        image: &DynamicImage,
        ranges: &[RowRange],
    ) -> Result<ExportReport, SliceError> {
        self.prepare()?;
        let mut report = ExportReport::default();

        for (index, &range) in ranges.iter().enumerate() {
            let (top, bottom) = crop_bounds(range, image.height(), self.policy)?;
            let height = (bottom - top + 1) as u32;
            let cropped = crop_rows(image, top, height);

            let path = self.output_dir.join(slice_file_name(index));
            png_compatible(cropped)
                .save_with_format(&path, ImageFormat::Png)
                .map_err(|source| SliceError::OutputWrite {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(
                index,
                start = range.start,
                rows = range.height(),
                top,
                height,
                "wrote slice"
            );

            report.slices.push(ExportedSlice {
                index,
                range,
                top,
                height,
                path,
            });
        }

        tracing::info!(
            count = report.count(),
            dir = %self.output_dir.display(),
            edge = self.policy.as_str(),
            "export finished"
        );
        Ok(report)
    }
}

/// Inclusive source rows `(top, bottom)` of the padded crop for `range`
pub fn crop_bounds(
    range: RowRange,
    height: u32,
    policy: EdgePolicy,
) -> Result<(i64, i64), SliceError> {
    if range.end < range.start || range.end >= height {
        return Err(SliceError::InvalidRegion {
            start: range.start,
            end: range.end,
            height,
        });
    }

    let top = range.start as i64 - PADDING;
    let bottom = range.end as i64 + PADDING;
    Ok(match policy {
        EdgePolicy::Clamp => (top.max(0), bottom.min(height as i64 - 1)),
        EdgePolicy::Pad => (top, bottom),
    })
}

/// Full-width crop of `height` rows starting at source row `top`.
/// Rows outside the image come out zero-filled.
fn crop_rows(image: &DynamicImage, top: i64, height: u32) -> DynamicImage {
    if top >= 0 && top + height as i64 <= image.height() as i64 {
        return image.crop_imm(0, top as u32, image.width(), height);
    }

    match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(pad_rows(buf, top, height)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(pad_rows(buf, top, height)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(pad_rows(buf, top, height)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(pad_rows(buf, top, height)),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(pad_rows(buf, top, height)),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(pad_rows(buf, top, height)),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(pad_rows(buf, top, height)),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(pad_rows(buf, top, height)),
        DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(pad_rows(buf, top, height)),
        DynamicImage::ImageRgba32F(buf) => {
            DynamicImage::ImageRgba32F(pad_rows(buf, top, height))
        }
        other => DynamicImage::ImageRgba8(pad_rows(&other.to_rgba8(), top, height)),
    }
}

fn pad_rows<P: Pixel>(
    buf: &ImageBuffer<P, Vec<P::Subpixel>>,
    top: i64,
    height: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let mut out = ImageBuffer::new(buf.width(), height);
    for y in 0..height {
        let src = top + y as i64;
        if src < 0 || src >= buf.height() as i64 {
            continue;
        }
        for x in 0..buf.width() {
            out.put_pixel(x, y, *buf.get_pixel(x, src as u32));
        }
    }
    out
}

/// PNG has no float samples; those are written as 16-bit
fn png_compatible(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
        other => other,
    }
}
