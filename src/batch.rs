use crate::WatermarkConfig;
use crate::fonts::{self, WatermarkFont};
use crate::watermark::{self, WatermarkError, WatermarkStatus};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// File extensions handled by the batch driver, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif", "webp"];

/// Per-run tally reported back to the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub errors: usize,
}

/// Watermark every supported image in the input folder and write the results
/// to the output folder.
///
/// Failures are caught at the per-file boundary: each file is attempted
/// exactly once and the run always continues to the next one.
pub fn run(config: &WatermarkConfig) -> Result<BatchSummary, WatermarkError> {
    std::fs::create_dir_all(&config.output_folder)?;

    let font = fonts::load_font(config.font_path.as_deref());

    let mut summary = BatchSummary::default();
    for input_path in collect_input_files(&config.input_folder) {
        let file_name = input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("processing {}", file_name);

        match process_one(config, &font, &input_path) {
            Ok((output_path, status)) => {
                if status == WatermarkStatus::Skipped {
                    debug!("no watermark configured for {}", file_name);
                }
                info!("saved {:?}", output_path);
                summary.processed += 1;
            }
            Err(e) => {
                error!("{}: {}", file_name, e);
                summary.errors += 1;
            }
        }
    }

    info!(
        "{} images processed successfully, {} errors",
        summary.processed, summary.errors
    );
    Ok(summary)
}

/// Enumerate supported image files directly inside the input folder, sorted
/// by name. Directory enumeration order is filesystem dependent, so the
/// explicit sort keeps processing order stable.
pub fn collect_input_files(input_folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path))
        .collect();
    files.sort();
    files
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn process_one(
    config: &WatermarkConfig,
    font: &WatermarkFont,
    input_path: &Path,
) -> Result<(PathBuf, WatermarkStatus), WatermarkError> {
    let (image, status) = watermark::process_file(config, font, input_path)?;

    let output_path = output_path_for(config, input_path);
    image
        .save(&output_path)
        .map_err(|source| WatermarkError::Encode {
            path: output_path.clone(),
            source,
        })?;

    Ok((output_path, status))
}

/// Output file path for an input file, applying the configured prefix.
pub fn output_path_for(config: &WatermarkConfig, input_path: &Path) -> PathBuf {
    let file_name = input_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");

    if config.prefix.is_empty() {
        config.output_folder.join(file_name)
    } else {
        config
            .output_folder
            .join(format!("{}_{}", config.prefix, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_extensions() {
        assert!(is_supported(Path::new("photo.jpg")));
        assert!(is_supported(Path::new("photo.JPEG")));
        assert!(is_supported(Path::new("scan.TIF")));
        assert!(is_supported(Path::new("anim.webp")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("archive.tar.gz")));
        assert!(!is_supported(Path::new("noextension")));
    }

    #[test]
    fn test_output_path_without_prefix() {
        let config = WatermarkConfig {
            output_folder: PathBuf::from("/out"),
            prefix: String::new(),
            ..WatermarkConfig::default()
        };
        assert_eq!(
            output_path_for(&config, Path::new("/in/photo.png")),
            PathBuf::from("/out/photo.png")
        );
    }

    #[test]
    fn test_output_path_with_prefix() {
        let config = WatermarkConfig {
            output_folder: PathBuf::from("/out"),
            prefix: "wm".to_string(),
            ..WatermarkConfig::default()
        };
        assert_eq!(
            output_path_for(&config, Path::new("/in/photo.png")),
            PathBuf::from("/out/wm_photo.png")
        );
    }
}
