//! Image access and region sampling.

use image::{GenericImageView, Pixel};

use crate::geometry::Point;

/// Full scale of a normalised sample.
pub const SAMPLE_SCALE: i32 = 0x10000;

/// Read access to an RGB image.
///
/// Implemented for every `image` crate view with 8-bit channels
/// (`RgbImage`, `RgbaImage`, `GrayImage`, `DynamicImage`, ...).
pub trait ImageSource {
    /// Pixel bounds as (min_x, min_y, max_x, max_y), max exclusive.
    fn pixel_bounds(&self) -> (i32, i32, i32, i32);

    /// Colour at (x, y). Only called for points inside `pixel_bounds`.
    fn rgb_at(&self, x: i32, y: i32) -> [u8; 3];
}

impl<I> ImageSource for I
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    fn pixel_bounds(&self) -> (i32, i32, i32, i32) {
        let (w, h) = self.dimensions();
        (0, 0, w as i32, h as i32)
    }

    fn rgb_at(&self, x: i32, y: i32) -> [u8; 3] {
        self.get_pixel(x as u32, y as u32).to_rgb().0
    }
}

/// 16-bit luma (ITU-R BT.601 weights) of an 8-bit RGB colour.
pub fn luminance16([r, g, b]: [u8; 3]) -> u32 {
    let r = r as u32 * 0x101;
    let g = g as u32 * 0x101;
    let b = b as u32 * 0x101;
    (19595 * r + 38470 * g + 7471 * b + (1 << 15)) >> 16
}

fn luminance_at<I: ImageSource + ?Sized>(img: &I, p: Point) -> u32 {
    let (min_x, min_y, max_x, max_y) = img.pixel_bounds();
    if p.x < min_x || p.y < min_y || p.x >= max_x || p.y >= max_y {
        // Outside the image reads as black
        return 0;
    }
    luminance16(img.rgb_at(p.x, p.y))
}

/// Mean brightness of `points`, scaled to 0..=0x10000.
///
/// Unless `inverse` is set the value is inverted so darker regions give
/// larger numbers, as lit LCD segments are darker than their background.
/// An empty list samples as 0.
pub fn sample_region<I: ImageSource + ?Sized>(img: &I, points: &[Point], inverse: bool) -> i32 {
    if points.is_empty() {
        return 0;
    }
    let total: u64 = points.iter().map(|&p| luminance_at(img, p) as u64).sum();
    let mean = (total / points.len() as u64) as i32;
    if inverse {
        mean
    } else {
        SAMPLE_SCALE - mean
    }
}
