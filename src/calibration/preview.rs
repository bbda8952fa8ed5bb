//! Preview rendering for checking digit placement.
//!
//! Draws every digit's outline, segment sample points, off reference points
//! and decimal point block on a copy of the input image.

use image::{Rgb, RgbImage};
use std::path::Path;

use crate::error::Result;
use crate::geometry::{BBox, Point};
use crate::lcd::{DigitScan, LcdDecoder};

pub const COLOR_OUTLINE: Rgb<u8> = Rgb([0, 0, 255]); // Blue
pub const COLOR_SEGMENT: Rgb<u8> = Rgb([0, 200, 0]); // Green
pub const COLOR_SEGMENT_ON: Rgb<u8> = Rgb([255, 0, 0]); // Red
pub const COLOR_OFF: Rgb<u8> = Rgb([255, 255, 0]); // Yellow
pub const COLOR_DP: Rgb<u8> = Rgb([255, 128, 0]); // Orange

/// Renders the decoder's sample regions onto `image`.
///
/// With `scans` from a decode, segments found lit are drawn in
/// `COLOR_SEGMENT_ON`.
pub fn render_preview(image: &RgbImage, decoder: &LcdDecoder, scans: Option<&[DigitScan]>) -> RgbImage {
    let mut img = image.clone();

    for digit in decoder.digits() {
        let mask = scans
            .and_then(|s| s.get(digit.index))
            .map_or(0, |scan| scan.mask);

        for p in &digit.off {
            put(&mut img, *p, COLOR_OFF);
        }
        for p in &digit.dp {
            put(&mut img, *p, COLOR_DP);
        }
        for (i, seg) in digit.segments.iter().enumerate() {
            let color = if mask & (1 << i) != 0 {
                COLOR_SEGMENT_ON
            } else {
                COLOR_SEGMENT
            };
            for p in &seg.points {
                put(&mut img, *p, color);
            }
        }

        draw_quad(&mut img, &digit.bb, COLOR_OUTLINE);
        draw_crosshair(&mut img, digit.pos, COLOR_OUTLINE, 3);
    }

    img
}

/// Saves a preview image; the format follows the file extension.
pub fn save_preview(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)?;
    crate::log(&format!("Preview saved to {}", path.display()));
    Ok(())
}

fn put(img: &mut RgbImage, p: Point, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    if p.x >= 0 && p.y >= 0 && (p.x as u32) < w && (p.y as u32) < h {
        img.put_pixel(p.x as u32, p.y as u32, color);
    }
}

/// Draws a straight line, clipped to the image.
pub fn draw_line(img: &mut RgbImage, from: Point, to: Point, color: Rgb<u8>) {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = from;
    loop {
        put(img, p, color);
        if p == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}

/// Draws the outline of a quadrilateral.
pub fn draw_quad(img: &mut RgbImage, bb: &BBox, color: Rgb<u8>) {
    let c = bb.corners();
    for i in 0..4 {
        draw_line(img, c[i], c[(i + 1) % 4], color);
    }
}

/// Draws a crosshair centred on a point.
pub fn draw_crosshair(img: &mut RgbImage, at: Point, color: Rgb<u8>, arm_length: i32) {
    draw_line(img, at.offset(-arm_length, 0), at.offset(arm_length, 0), color);
    draw_line(img, at.offset(0, -arm_length), at.offset(0, arm_length), color);
}
