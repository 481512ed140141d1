//! The fill rule: how adjacent pixel colors merge or whiten on a real display.
//!
//! Rendered pixels are palette indices here, so "the same color" is exact
//! index equality and the black/white special entries are just
//! [`BLACK`](crate::consts::BLACK) and [`WHITE`](crate::consts::WHITE).

use crate::consts::{BLACK, WHITE};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Which display the converted image targets.
///
/// A composite (NTSC) display bleeds color across a lone black pixel between
/// two same-colored pixels; an RGB monitor does not. The interference rule
/// (two adjacent non-black pixels turn white) applies to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Composite/NTSC display, color bleed emulated.
    #[default]
    Composite,
    /// RGB-direct monitor, no bleed.
    Rgb,
}

impl FillMode {
    const fn bleeds(self) -> bool {
        matches!(self, FillMode::Composite)
    }
}

/// Applies the fill rule to a fixed-size run of palette indices.
///
/// Every decision inspects the *original* `colors`, so each boundary's
/// rewrite is independent of rewrites earlier in the same pass:
///
/// - color-black-color becomes color-color-color ([`FillMode::Composite`]
///   only, and never at the very first boundary),
/// - two adjacent non-black colors both become white.
pub fn fill<const N: usize>(colors: [u8; N], mode: FillMode) -> [u8; N] {
    let mut result = colors;
    fill_into(&colors, &mut result, mode);
    result
}

/// [`fill`] over a runtime-sized line.
#[cfg(feature = "alloc")]
pub fn fill_line(colors: &[u8], mode: FillMode) -> Vec<u8> {
    let mut result = colors.to_vec();
    fill_into(colors, &mut result, mode);
    result
}

fn fill_into(colors: &[u8], result: &mut [u8], mode: FillMode) {
    for i in 1..colors.len() {
        if mode.bleeds() && i > 1 && colors[i - 1] == BLACK && colors[i - 2] == colors[i] {
            result[i - 1] = colors[i];
        } else if colors[i - 1] != BLACK && colors[i] != BLACK {
            result[i - 1] = WHITE;
            result[i] = WHITE;
        }
    }
}
