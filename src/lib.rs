use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod batch;
pub mod color;
pub mod fonts;
pub mod geometry;
pub mod watermark;

pub use batch::BatchSummary;
pub use geometry::{Anchor, SizeMode};
pub use watermark::WatermarkError;

/// Text watermark used when neither text nor an image is configured.
pub const DEFAULT_TEXT: &str = "@ghostmark";

/// Immutable configuration for a watermarking run.
///
/// Built once from defaults, an optional TOML file and command-line
/// overrides, then passed read-only into every component. Exactly one of
/// `text` and `image_path` is active; `pixel_size` of 0 means relative
/// sizing via `size`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub text: Option<String>,
    pub image_path: Option<PathBuf>,
    pub anchor: Anchor,
    pub opacity: f32,
    pub size: SizeMode,
    pub pixel_size: u32,
    pub text_color: String,
    pub prefix: String,
    pub font_path: Option<PathBuf>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("input"),
            output_folder: PathBuf::from("output"),
            text: None,
            image_path: None,
            anchor: Anchor::BottomRight,
            opacity: 0.8,
            size: SizeMode::Small,
            pixel_size: 0,
            text_color: "#000000".to_string(),
            prefix: String::new(),
            font_path: None,
        }
    }
}

impl WatermarkConfig {
    /// Fill in the default text watermark when nothing is configured and
    /// clamp opacity into range.
    pub fn normalize(&mut self) {
        if self.text.is_none() && self.image_path.is_none() {
            self.text = Some(DEFAULT_TEXT.to_string());
        }
        self.opacity = self.opacity.clamp(0.0, 1.0);
    }
}
