use crate::WatermarkConfig;
use crate::geometry::{watermark_position, watermark_size};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::path::Path;
use tracing::warn;

/// Resize and paste an image watermark onto the working image.
///
/// Any failure to read or decode the watermark asset degrades to an
/// unwatermarked result; the file is still processed.
pub fn apply(base: &mut RgbaImage, config: &WatermarkConfig, asset_path: &Path) {
    let watermark = match image::open(asset_path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!("failed to load watermark image {:?}: {}", asset_path, e);
            return;
        }
    };

    let (base_width, base_height) = base.dimensions();
    let target = watermark_size(base_width, base_height, config.size, config.pixel_size);
    let (new_width, new_height) = scaled_dimensions(watermark.width(), watermark.height(), target);
    let mut watermark = imageops::resize(&watermark, new_width, new_height, FilterType::Lanczos3);

    if config.opacity < 1.0 {
        // Scale the existing alpha channel so pre-existing transparency in
        // the asset is preserved
        for pixel in watermark.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * config.opacity).round() as u8;
        }
    }

    let (x, y) = watermark_position(base_width, base_height, new_width, new_height, config.anchor);
    paste_with_alpha_mask(base, &watermark, x, y);
}

/// Map the dominant dimension to `target` and scale the other side
/// proportionally, never below one pixel.
fn scaled_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    let target = target.max(1);
    if width >= height {
        let scaled = (target as f32 * height as f32 / width as f32).round() as u32;
        (target, scaled.max(1))
    } else {
        let scaled = (target as f32 * width as f32 / height as f32).round() as u32;
        (scaled.max(1), target)
    }
}

/// Masked overwrite of the covered region: every channel, alpha included, is
/// interpolated toward the watermark by its per-pixel alpha. Opaque
/// watermark pixels replace the base outright rather than blending over it.
fn paste_with_alpha_mask(base: &mut RgbaImage, watermark: &RgbaImage, x: i64, y: i64) {
    let (base_width, base_height) = (base.width() as i64, base.height() as i64);
    let (wm_width, wm_height) = (watermark.width() as i64, watermark.height() as i64);

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + wm_width).min(base_width);
    let y_end = (y + wm_height).min(base_height);

    for by in y_start..y_end {
        for bx in x_start..x_end {
            let wm_pixel = watermark.get_pixel((bx - x) as u32, (by - y) as u32);
            let weight = wm_pixel[3] as f32 / 255.0;
            if weight == 0.0 {
                continue;
            }

            let base_pixel = base.get_pixel_mut(bx as u32, by as u32);
            for channel in 0..4 {
                let blended = wm_pixel[channel] as f32 * weight
                    + base_pixel[channel] as f32 * (1.0 - weight);
                base_pixel[channel] = blended.round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Anchor, SizeMode};
    use image::Rgba;
    use tempfile::TempDir;

    fn test_config(asset: &Path, opacity: f32) -> WatermarkConfig {
        WatermarkConfig {
            text: None,
            image_path: Some(asset.to_path_buf()),
            anchor: Anchor::BottomRight,
            opacity,
            size: SizeMode::Medium,
            ..WatermarkConfig::default()
        }
    }

    fn save_solid_asset(dir: &TempDir, name: &str, color: Rgba<u8>, w: u32, h: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        RgbaImage::from_pixel(w, h, color).save(&path).unwrap();
        path
    }

    #[test]
    fn test_scaled_dimensions_landscape() {
        // 200x100 asset, target 50: longer side maps to 50
        assert_eq!(scaled_dimensions(200, 100, 50), (50, 25));
    }

    #[test]
    fn test_scaled_dimensions_portrait() {
        assert_eq!(scaled_dimensions(100, 200, 50), (25, 50));
    }

    #[test]
    fn test_scaled_dimensions_never_zero() {
        assert_eq!(scaled_dimensions(1000, 1, 10), (10, 1));
        assert_eq!(scaled_dimensions(1, 1000, 10), (1, 10));
    }

    #[test]
    fn test_opaque_watermark_replaces_pixels_exactly() {
        let temp_dir = TempDir::new().unwrap();
        let red = Rgba([255, 0, 0, 255]);
        let asset = save_solid_asset(&temp_dir, "wm.png", red, 40, 40);

        let mut base = RgbaImage::from_pixel(400, 400, Rgba([0, 0, 255, 255]));
        apply(&mut base, &test_config(&asset, 1.0), &asset);

        // size medium on 400x400 -> 40px watermark, margin 20, so the
        // bottom-right block [340, 380) x [340, 380) is pure watermark
        assert_eq!(base.get_pixel(350, 350), &red);
        assert_eq!(base.get_pixel(379, 379), &red);
        // Outside the pasted region the base is untouched
        assert_eq!(base.get_pixel(10, 10), &Rgba([0, 0, 255, 255]));
        assert_eq!(base.get_pixel(399, 399), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_opacity_fades_watermark() {
        let temp_dir = TempDir::new().unwrap();
        let asset = save_solid_asset(&temp_dir, "wm.png", Rgba([255, 255, 255, 255]), 40, 40);

        let mut base = RgbaImage::from_pixel(400, 400, Rgba([0, 0, 0, 255]));
        apply(&mut base, &test_config(&asset, 0.5), &asset);

        let center = base.get_pixel(360, 360);
        // 50% of white over black
        assert!(center[0] > 100 && center[0] < 155, "got {:?}", center);
    }

    #[test]
    fn test_missing_asset_leaves_base_unchanged() {
        let missing = Path::new("/nonexistent/watermark.png");
        let mut base = RgbaImage::from_pixel(100, 100, Rgba([7, 7, 7, 255]));
        let before = base.clone();
        apply(&mut base, &test_config(missing, 1.0), missing);
        assert_eq!(base, before);
    }

    #[test]
    fn test_paste_clips_out_of_bounds_positions() {
        let watermark = RgbaImage::from_pixel(50, 50, Rgba([1, 2, 3, 255]));
        let mut base = RgbaImage::from_pixel(20, 20, Rgba([9, 9, 9, 255]));
        paste_with_alpha_mask(&mut base, &watermark, -10, -10);
        assert_eq!(base.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
        paste_with_alpha_mask(&mut base, &watermark, 15, 15);
        assert_eq!(base.get_pixel(19, 19), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_transparent_asset_pixels_do_not_overwrite() {
        let watermark = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 0]));
        let mut base = RgbaImage::from_pixel(20, 20, Rgba([5, 6, 7, 255]));
        let before = base.clone();
        paste_with_alpha_mask(&mut base, &watermark, 0, 0);
        assert_eq!(base, before);
    }
}
