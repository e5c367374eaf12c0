use crate::WatermarkConfig;
use crate::fonts::WatermarkFont;
use image::{ColorType, DynamicImage, RgbImage, RgbaImage};
use std::path::Path;

mod error;
pub mod overlay;
pub mod text;

pub use error::WatermarkError;

/// Color mode family of a decoded image, recorded before processing so the
/// output can be converted back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgba,
    Rgb,
    Gray,
    GrayAlpha,
}

impl ColorMode {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::L8 | ColorType::L16 => ColorMode::Gray,
            ColorType::La8 | ColorType::La16 => ColorMode::GrayAlpha,
            _ => ColorMode::Rgba,
        }
    }
}

/// Whether a watermark was actually applied to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkStatus {
    Applied,
    Skipped,
}

/// Decode a source file and run it through the watermark pipeline.
pub fn process_file(
    config: &WatermarkConfig,
    font: &WatermarkFont,
    input_path: &Path,
) -> Result<(DynamicImage, WatermarkStatus), WatermarkError> {
    let image = image::open(input_path).map_err(|source| WatermarkError::Decode {
        path: input_path.to_path_buf(),
        source,
    })?;

    Ok(apply_watermark(config, font, image))
}

/// Apply the configured watermark, preserving the source color mode.
///
/// The image is copied into an RGBA working buffer, dispatched to the text
/// or image compositor, then converted back to its original mode. With
/// neither text nor image configured the image passes through unchanged.
pub fn apply_watermark(
    config: &WatermarkConfig,
    font: &WatermarkFont,
    image: DynamicImage,
) -> (DynamicImage, WatermarkStatus) {
    let original_mode = ColorMode::of(&image);
    let mut working = image.to_rgba8();

    let status = if let Some(text_str) = config.text.as_deref() {
        text::apply(&mut working, config, font, text_str);
        WatermarkStatus::Applied
    } else if let Some(asset_path) = config.image_path.as_deref() {
        overlay::apply(&mut working, config, asset_path);
        WatermarkStatus::Applied
    } else {
        WatermarkStatus::Skipped
    };

    (restore_mode(working, original_mode), status)
}

fn restore_mode(working: RgbaImage, mode: ColorMode) -> DynamicImage {
    match mode {
        ColorMode::Rgba => DynamicImage::ImageRgba8(working),
        ColorMode::Rgb => DynamicImage::ImageRgb8(flatten_onto_white(&working)),
        // Alpha is discarded for grayscale output; accepted limitation
        ColorMode::Gray => DynamicImage::ImageLuma8(DynamicImage::ImageRgba8(working).to_luma8()),
        ColorMode::GrayAlpha => {
            DynamicImage::ImageLumaA8(DynamicImage::ImageRgba8(working).to_luma_alpha8())
        }
    }
}

/// Composite onto an opaque white background using the working image's own
/// alpha as mask.
fn flatten_onto_white(working: &RgbaImage) -> RgbImage {
    let mut flattened = RgbImage::new(working.width(), working.height());
    for (dst, src) in flattened.pixels_mut().zip(working.pixels()) {
        let alpha = src[3] as f32 / 255.0;
        for channel in 0..3 {
            dst[channel] =
                (src[channel] as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        }
    }
    flattened
}
