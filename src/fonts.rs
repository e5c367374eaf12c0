use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A font usable for text watermarks.
///
/// Either a TrueType font loaded from disk, or the built-in bitmap font that
/// is always available as a last resort.
pub enum WatermarkFont {
    TrueType(FontVec),
    Bitmap,
}

impl WatermarkFont {
    /// Measure the rendered text's bounding box at the given pixel size.
    pub fn measure(&self, text: &str, px: u32) -> (u32, u32) {
        match self {
            WatermarkFont::TrueType(font) => text_size(PxScale::from(px as f32), font, text),
            WatermarkFont::Bitmap => bitmap::measure(text, px),
        }
    }

    /// Draw text onto the canvas with its top-left corner at (x, y).
    pub fn draw(&self, canvas: &mut RgbaImage, x: i64, y: i64, px: u32, color: Rgba<u8>, text: &str) {
        match self {
            WatermarkFont::TrueType(font) => draw_text_mut(
                canvas,
                color,
                x as i32,
                y as i32,
                PxScale::from(px as f32),
                font,
                text,
            ),
            WatermarkFont::Bitmap => bitmap::draw(canvas, x, y, px, color, text),
        }
    }
}

/// Load a font for text watermarks.
///
/// Tries the user-configured path first, then well-known system font
/// locations, and finally falls back to the built-in bitmap font. Never
/// fails.
pub fn load_font(custom: Option<&Path>) -> WatermarkFont {
    let mut candidates = Vec::new();
    if let Some(path) = custom {
        candidates.push(path.to_path_buf());
    }
    candidates.extend(system_font_candidates());

    for path in candidates {
        if let Some(font) = load_truetype(&path) {
            debug!("using font {:?}", path);
            return WatermarkFont::TrueType(font);
        }
    }

    warn!("no TrueType font available, using built-in bitmap font");
    WatermarkFont::Bitmap
}

fn system_font_candidates() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "windows") {
        &["C:\\Windows\\Fonts\\arial.ttf"]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial.ttf",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
    };

    paths.iter().map(PathBuf::from).collect()
}

fn load_truetype(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    // Index 0 also handles .ttc collections
    FontVec::try_from_vec_and_index(data, 0).ok()
}

/// Minimal 5x7 bitmap font, scaled by integer pixel replication.
mod bitmap {
    use image::{Rgba, RgbaImage};

    const ROWS: u32 = 7;
    const COLS: u32 = 5;
    /// Glyph cell width plus one column of spacing.
    const ADVANCE: u32 = COLS + 1;

    fn scale(px: u32) -> u32 {
        (px / ROWS).max(1)
    }

    pub fn measure(text: &str, px: u32) -> (u32, u32) {
        let s = scale(px);
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return (0, ROWS * s);
        }
        // Trailing inter-glyph gap is not part of the box
        ((chars * ADVANCE - 1) * s, ROWS * s)
    }

    pub fn draw(canvas: &mut RgbaImage, x: i64, y: i64, px: u32, color: Rgba<u8>, text: &str) {
        let s = scale(px) as i64;
        let (width, height) = (canvas.width() as i64, canvas.height() as i64);

        for (index, c) in text.chars().enumerate() {
            let rows = glyph(c);
            let glyph_x = x + index as i64 * ADVANCE as i64 * s;

            for (row, bits) in rows.iter().enumerate() {
                let bits = *bits as u32;
                for col in 0..COLS {
                    if bits & (1 << (COLS - 1 - col)) == 0 {
                        continue;
                    }
                    // Fill an s-by-s block for this font pixel
                    let block_x = glyph_x + col as i64 * s;
                    let block_y = y + row as i64 * s;
                    for dy in 0..s {
                        for dx in 0..s {
                            let (px_x, px_y) = (block_x + dx, block_y + dy);
                            if px_x >= 0 && px_y >= 0 && px_x < width && px_y < height {
                                canvas.put_pixel(px_x as u32, px_y as u32, color);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Glyph rows, top to bottom, low 5 bits used, bit 4 is the left column.
    /// Lowercase letters map to uppercase; anything unknown renders as a box.
    fn glyph(c: char) -> [u8; 7] {
        match c.to_ascii_uppercase() {
            ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
            '"' => [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00],
            '#' => [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
            '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
            '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
            ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
            '*' => [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00],
            '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
            ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
            '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
            '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
            '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
            ';' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08],
            '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
            '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
            '@' => [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E],
            'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
            _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_font_always_succeeds() {
        // With no custom path this resolves to either a system font or the
        // built-in bitmap font; both must be usable.
        let font = load_font(None);
        let (w, h) = font.measure("TEST", 70);
        assert!(w > 0);
        assert!(h > 0);
    }

    #[test]
    fn test_missing_custom_font_falls_through() {
        let font = load_font(Some(Path::new("/nonexistent/font.ttf")));
        let (w, _) = font.measure("x", 14);
        assert!(w > 0);
    }

    #[test]
    fn test_bitmap_measure_scales_with_size() {
        let (w1, h1) = WatermarkFont::Bitmap.measure("AB", 7);
        let (w2, h2) = WatermarkFont::Bitmap.measure("AB", 70);
        assert_eq!((w1, h1), (11, 7));
        assert_eq!((w2, h2), (110, 70));
    }

    #[test]
    fn test_bitmap_measure_empty_text() {
        let (w, h) = WatermarkFont::Bitmap.measure("", 21);
        assert_eq!(w, 0);
        assert_eq!(h, 21);
    }

    #[test]
    fn test_bitmap_draw_writes_exact_color() {
        let mut canvas = RgbaImage::new(50, 20);
        let color = Rgba([10, 200, 30, 255]);
        WatermarkFont::Bitmap.draw(&mut canvas, 2, 2, 7, color, "T");

        // Top bar of 'T' spans the full glyph width
        assert_eq!(canvas.get_pixel(2, 2), &color);
        assert_eq!(canvas.get_pixel(6, 2), &color);
        // Untouched pixels stay transparent
        assert_eq!(canvas.get_pixel(49, 19), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_bitmap_draw_clips_at_canvas_edges() {
        let mut canvas = RgbaImage::new(10, 10);
        WatermarkFont::Bitmap.draw(&mut canvas, -3, -3, 14, Rgba([255, 255, 255, 255]), "WW");
        // Must not panic; some pixels may land inside
    }
}
