//! Pixel collision masks
//!
//! A mask is a row-major bitset of solid pixels. Overlap tests first reject on
//! bounding boxes, then compare bits over the intersection only.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

const WORD_BITS: u32 = 64;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    words_per_row: u32,
    bits: Vec<u64>,
}

impl fmt::Debug for CollisionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("solid", &self.count())
            .finish()
    }
}

impl CollisionMask {
    /// An all-empty mask
    pub fn empty(width: u32, height: u32) -> Self {
        let words_per_row = width.div_ceil(WORD_BITS);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; (words_per_row * height) as usize],
        }
    }

    /// A fully solid rectangle
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    /// Build from text rows, `#` marks a solid pixel. Rows may be ragged;
    /// the mask is as wide as the longest row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count() as u32)
            .max()
            .unwrap_or(0);
        let mut mask = Self::empty(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                if c == '#' {
                    mask.set(x as u32, y as u32);
                }
            }
        }
        mask
    }

    /// Nearest-neighbour upscale by an integer factor
    pub fn scaled(&self, factor: u32) -> Self {
        if factor <= 1 {
            return self.clone();
        }
        Self::from_fn(self.width * factor, self.height * factor, |x, y| {
            self.get(x / factor, y / factor)
        })
    }

    /// Horizontal mirror, for sprites drawn facing the other way
    pub fn flipped_x(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| self.get(self.width - 1 - x, y))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> (usize, u64) {
        let word = y * self.words_per_row + x / WORD_BITS;
        (word as usize, 1u64 << (x % WORD_BITS))
    }

    fn set(&mut self, x: u32, y: u32) {
        let (word, bit) = self.index(x, y);
        self.bits[word] |= bit;
    }

    /// Solid test; out-of-range pixels are empty
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (word, bit) = self.index(x, y);
        self.bits[word] & bit != 0
    }

    /// Number of solid pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Whether `other`, with its top-left at `offset` relative to this mask's
    /// top-left, shares any solid pixel with this mask
    pub fn overlaps(&self, other: &CollisionMask, offset: (i32, i32)) -> bool {
        self.first_overlap(other, offset).is_some()
    }

    /// First shared solid pixel in this mask's coordinates
    pub fn first_overlap(&self, other: &CollisionMask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32) && other.get((x - dx) as u32, (y - dy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }
}

/// Pixel offset of `other_min` relative to `self_min` for `overlaps`
#[inline]
pub fn mask_offset(self_min: Vec2, other_min: Vec2) -> (i32, i32) {
    let d = (other_min - self_min).round();
    (d.x as i32, d.y as i32)
}
