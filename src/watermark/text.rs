use crate::WatermarkConfig;
use crate::color::resolve_color;
use crate::fonts::WatermarkFont;
use crate::geometry::{watermark_position, watermark_size};
use image::{Rgba, RgbaImage, imageops};

/// Render a text watermark onto a transparent layer and alpha-composite it
/// over the working image.
pub fn apply(base: &mut RgbaImage, config: &WatermarkConfig, font: &WatermarkFont, text: &str) {
    let (width, height) = base.dimensions();

    let glyph_px = watermark_size(width, height, config.size, config.pixel_size);
    let (text_width, text_height) = font.measure(text, glyph_px);
    let (x, y) = watermark_position(width, height, text_width, text_height, config.anchor);

    let (r, g, b) = resolve_color(&config.text_color);
    let alpha = (255.0 * config.opacity).round() as u8;

    let mut layer = RgbaImage::new(width, height);
    font.draw(&mut layer, x, y, glyph_px, Rgba([r, g, b, alpha]), text);

    // Porter-Duff "over"; a zero-alpha layer leaves the image untouched
    imageops::overlay(base, &layer, 0, 0);
}
