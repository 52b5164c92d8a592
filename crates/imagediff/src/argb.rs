//! Packed ARGB pixel buffers and the conversion to and from `image::RgbaImage`.
//!
//! A pixel is one `u32`: alpha in bits 24..32, red in 16..24, green in 8..16, blue in 0..8.

use image::{Rgba, RgbaImage};

use crate::DiffError;

#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Split a packed pixel into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(pixel: u32) -> [u8; 4] {
    [
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

/// Borrowed row-major ARGB pixels with their extent.
#[derive(Clone, Copy, Debug)]
pub struct ArgbImage<'a> {
    pixels: &'a [u32],
    width: usize,
    height: usize,
}

impl<'a> ArgbImage<'a> {
    pub fn new(pixels: &'a [u32], width: usize, height: usize) -> Result<Self, DiffError> {
        let expected = width
            .checked_mul(height)
            .ok_or(DiffError::BufferSize {
                width,
                height,
                expected: usize::MAX,
                actual: pixels.len(),
            })?;
        if pixels.len() != expected {
            return Err(DiffError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn pixels(&self) -> &'a [u32] {
        self.pixels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Owned ARGB pixels, used at the decode/encode boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgbBuffer {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl ArgbBuffer {
    /// A `width x height` buffer filled with one packed color.
    pub fn blank(width: usize, height: usize, fill: u32) -> Self {
        Self {
            pixels: vec![fill; width * height],
            width,
            height,
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|&Rgba([r, g, b, a])| pack_argb(a, r, g, b))
            .collect();
        Self {
            pixels,
            width: image.width() as usize,
            height: image.height() as usize,
        }
    }

    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let [a, r, g, b] = unpack_argb(self.pixels[y as usize * self.width + x as usize]);
            Rgba([r, g, b, a])
        })
    }

    pub fn view(&self) -> ArgbImage<'_> {
        ArgbImage {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}
