//! Silhouette masks for pixel-exact collision
//!
//! A mask is a width × height grid of opaque bits, one per sprite pixel.
//! Rows are packed into `u64` words. Masks are immutable once built; flipped
//! variants are views ([`Silhouette`]) rather than copies.

use glam::IVec2;
use thiserror::Error;

use crate::consts::ALPHA_THRESHOLD;

/// Errors from building a mask out of raw pixel data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("mask dimensions must be non-zero, got {width}x{height}")]
    Empty { width: u32, height: u32 },
}

/// Axis-aligned integer rectangle, `min` inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    pub fn translate(&self, offset: IVec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Overlapping region, `None` when the rectangles are disjoint
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min.x < max.x && min.y < max.y).then(|| Rect::new(min, max))
    }
}

/// Opaque-pixel bitmask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
    /// Bounding box of the opaque cells (unflipped)
    bounds: Option<Rect>,
}

impl Mask {
    /// Build a mask by evaluating `solid(x, y)` for every cell
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        let mut bits = vec![0u64; words_per_row * height as usize];
        let mut lo = IVec2::new(i32::MAX, i32::MAX);
        let mut hi = IVec2::new(i32::MIN, i32::MIN);

        for y in 0..height {
            let row = y as usize * words_per_row;
            for x in 0..width {
                if solid(x, y) {
                    bits[row + x as usize / 64] |= 1u64 << (x % 64);
                    let p = IVec2::new(x as i32, y as i32);
                    lo = lo.min(p);
                    hi = hi.max(p + IVec2::ONE);
                }
            }
        }

        let bounds = (lo.x <= hi.x).then(|| Rect::new(lo, hi));
        Self {
            width,
            height,
            words_per_row,
            bits,
            bounds,
        }
    }

    /// Build a mask from a row-major alpha channel; a pixel is solid when its
    /// alpha exceeds `threshold`
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(MaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self::from_fn(width, height, |x, y| {
            alpha[y as usize * width as usize + x as usize] > threshold
        }))
    }

    /// Build a mask from decoded RGBA8 pixels using the default threshold
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        let alpha: Vec<u8> = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::from_alpha(width, height, &alpha, ALPHA_THRESHOLD)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at (x, y) is opaque; out-of-range cells are clear
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let word = self.bits[y as usize * self.words_per_row + x as usize / 64];
        word & (1u64 << (x as u32 % 64)) != 0
    }

    /// Number of opaque cells
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    pub fn opaque_bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// View this mask, optionally mirrored
    pub fn view(&self, reflection: Reflection) -> Silhouette<'_> {
        Silhouette {
            mask: self,
            reflection,
        }
    }
}

/// Transform applied when reading a stored mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reflection {
    #[default]
    None,
    /// Mirror top-to-bottom
    Vertical,
}

/// A borrowed mask seen through a reflection
#[derive(Debug, Clone, Copy)]
pub struct Silhouette<'a> {
    mask: &'a Mask,
    reflection: Reflection,
}

impl<'a> Silhouette<'a> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.mask.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.mask.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        match self.reflection {
            Reflection::None => self.mask.get(x, y),
            Reflection::Vertical => self.mask.get(x, self.mask.height as i32 - 1 - y),
        }
    }

    /// Opaque bounds in view space
    pub fn opaque_bounds(&self) -> Option<Rect> {
        let b = self.mask.bounds?;
        Some(match self.reflection {
            Reflection::None => b,
            Reflection::Vertical => {
                let h = self.mask.height as i32;
                Rect::new(IVec2::new(b.min.x, h - b.max.y), IVec2::new(b.max.x, h - b.min.y))
            }
        })
    }
}
