use crate::error::SliceError;
use image::{DynamicImage, ImageBuffer, Pixel};

/// Reference intensity a blank row must hit on every pixel
pub const BLANK_REFERENCE: f64 = 255.0;

/// Classify every row of the image as blank (`true`) or not.
///
/// Each pixel is reduced to the unweighted mean of all its channels, alpha
/// included, and compared to [`BLANK_REFERENCE`] exactly. 16-bit buffers are
/// reduced to 8 bits first (same channels), so 16-bit white counts as blank.
pub fn apply(image: &DynamicImage) -> Result<Vec<bool>, SliceError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(SliceError::UnsupportedImageShape(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let rows = match image {
        DynamicImage::ImageLuma8(buf) => blank_rows(buf),
        DynamicImage::ImageLumaA8(buf) => blank_rows(buf),
        DynamicImage::ImageRgb8(buf) => blank_rows(buf),
        DynamicImage::ImageRgba8(buf) => blank_rows(buf),
        DynamicImage::ImageLuma16(_) => blank_rows(&image.to_luma8()),
        DynamicImage::ImageLumaA16(_) => blank_rows(&image.to_luma_alpha8()),
        DynamicImage::ImageRgb16(_) => blank_rows(&image.to_rgb8()),
        DynamicImage::ImageRgba16(_) => blank_rows(&image.to_rgba8()),
        DynamicImage::ImageRgb32F(buf) => blank_rows(buf),
        DynamicImage::ImageRgba32F(buf) => blank_rows(buf),
        other => {
            return Err(SliceError::UnsupportedImageShape(format!(
                "unsupported pixel layout {:?}",
                other.color()
            )))
        }
    };

    Ok(rows)
}

fn blank_rows<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>) -> Vec<bool>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    buf.rows()
        .map(|mut row| row.all(|pixel| pixel_mean(pixel) == BLANK_REFERENCE))
        .collect()
}

fn pixel_mean<P>(pixel: &P) -> f64
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let channels = pixel.channels();
    let sum: f64 = channels.iter().map(|&c| c.into()).sum();
    sum / channels.len() as f64
}
