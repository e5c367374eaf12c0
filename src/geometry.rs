use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Named watermark position, mapped to normalized axis factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Parse an anchor name, falling back to bottom-right for anything
    /// unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "top-left" => Anchor::TopLeft,
            "top-center" => Anchor::TopCenter,
            "top-right" => Anchor::TopRight,
            "center-left" => Anchor::CenterLeft,
            "center" => Anchor::Center,
            "center-right" => Anchor::CenterRight,
            "bottom-left" => Anchor::BottomLeft,
            "bottom-center" => Anchor::BottomCenter,
            "bottom-right" => Anchor::BottomRight,
            other => {
                warn!("unrecognized anchor '{}', using bottom-right", other);
                Anchor::BottomRight
            }
        }
    }

    /// Normalized (x, y) placement factors, each 0, 0.5 or 1.
    pub fn factors(self) -> (f32, f32) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::CenterLeft => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::CenterRight => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }
}

// Unrecognized anchor names in a config file degrade to the default
// instead of failing the whole run.
impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Anchor::from_name(&name))
    }
}

/// Relative watermark size, as a factor of the image's smaller dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    Small,
    Medium,
    Large,
}

impl SizeMode {
    pub fn factor(self) -> f32 {
        match self {
            SizeMode::Small => 0.05,
            SizeMode::Medium => 0.10,
            SizeMode::Large => 0.15,
        }
    }
}

/// Compute the watermark's dominant dimension in pixels.
///
/// An explicit pixel size wins; otherwise the size mode's factor is applied
/// to the image's smaller dimension.
pub fn watermark_size(image_width: u32, image_height: u32, size: SizeMode, pixel_size: u32) -> u32 {
    if pixel_size > 0 {
        return pixel_size;
    }

    let min_dimension = image_width.min(image_height);
    (min_dimension as f32 * size.factor()).floor() as u32
}

/// Compute the anchored top-left position for a watermark of the given
/// dimensions.
///
/// Edge-anchored axes are pushed inward by a margin of 5% of the image's
/// smaller dimension, so corner placements never touch the image edge.
/// Coordinates may be negative when the watermark is larger than the image.
pub fn watermark_position(
    image_width: u32,
    image_height: u32,
    watermark_width: u32,
    watermark_height: u32,
    anchor: Anchor,
) -> (i64, i64) {
    let min_dimension = image_width.min(image_height) as f32;
    let (fx, fy) = anchor.factors();

    (
        axis_position(image_width, watermark_width, fx, min_dimension),
        axis_position(image_height, watermark_height, fy, min_dimension),
    )
}

fn axis_position(dimension: u32, watermark: u32, factor: f32, min_dimension: f32) -> i64 {
    // Centered axes get a smaller margin, though it only takes effect on
    // edge-anchored axes below.
    let margin_factor = if factor == 0.5 { 0.025 } else { 0.05 };
    let margin = (min_dimension * margin_factor).round() as i64;

    let free_space = dimension as i64 - watermark as i64;
    if factor == 0.0 {
        margin
    } else if factor == 1.0 {
        free_space - margin
    } else {
        (free_space as f32 * factor).round() as i64
    }
}
