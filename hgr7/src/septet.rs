//! Septet rendering and the lookup table of all renderable 7-pixel groups.

use crate::{
    color::{Palette, Rgba},
    consts::{BLACK, HI_PAIR, LO_PAIR, PIXELS_PER_BYTE, SUBSET_LEN},
    fill::{fill, FillMode},
};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use itertools::iproduct;

/// Renders one screen byte into 7 palette indices, ignoring any interaction
/// with neighboring pixels.
///
/// `odd` is the byte-column parity; pixel parity alternates from there, so a
/// byte's pixels seamlessly continue the parity chain of the previous byte
/// (7 pixels per byte, byte parity flips per column). A clear bit renders
/// black; a set bit renders one of the two latch-selected pair colors. The
/// result never contains white, which only arises from adjacent-pixel
/// interference (see [`crate::fill`]).
pub fn render_raw(byte: u8, odd: bool) -> [u8; PIXELS_PER_BYTE] {
    let pair = if byte & 0x80 != 0 { HI_PAIR } else { LO_PAIR };

    let mut bits = byte;
    let mut odd = odd;
    let mut pixels = [BLACK; PIXELS_PER_BYTE];
    for pixel in &mut pixels {
        if bits & 1 != 0 {
            *pixel = pair[usize::from(odd)];
        }
        bits >>= 1;
        odd = !odd;
    }
    pixels
}

/// One renderable 7-pixel group: the pixels a single screen byte produces at
/// a given byte-column parity and neighbor-boundary context.
#[derive(Debug, Clone)]
pub struct Septet {
    /// Pixels colored independently, without neighbor interaction. Never
    /// contains the white entry.
    pub raw: [u8; PIXELS_PER_BYTE],
    /// Pixel colors after the fill rule ran over this septet plus one
    /// borrowed boundary pixel on each side, resolved through the palette.
    pub filled: [Rgba; PIXELS_PER_BYTE],
    /// The screen byte that produces these pixels.
    pub byte: u8,
}

/// All 8192 renderable septets, grouped into 8 subsets of 1024 candidates.
///
/// A subset is selected by the byte-column parity and the two most
/// significant bits of the previously encoded byte (whose pixel and latch
/// bits influence this byte's leftmost pixel). Within a subset, entries are
/// ordered by (byte value, following-boundary bits). Built once per palette
/// and immutable afterwards, so it is freely shareable across conversions.
#[cfg(feature = "alloc")]
pub struct LookupTable {
    entries: Vec<Septet>,
}

#[cfg(feature = "alloc")]
impl LookupTable {
    /// Enumerates every combination of byte-column parity (2), preceding
    /// boundary bits (4), byte value (256) and following boundary bits (4).
    ///
    /// For each, the septet is rendered raw, extended with one raw boundary
    /// pixel rendered from each neighbor's borrowed bits, and the 9-pixel
    /// window is passed through the fill rule; the interior 7 pixels become
    /// the entry's `filled` view.
    pub fn build(palette: &Palette, mode: FillMode) -> Self {
        let mut entries = Vec::with_capacity(8 * SUBSET_LEN);

        for (odd, prev, byte, next) in
            iproduct!([false, true], 0u8..4, 0u16..256, 0u8..4)
        {
            let byte = byte as u8;
            // Neighbor bytes sit at the opposite byte-column parity. The
            // preceding byte contributes its top two bits (last pixel plus
            // latch), the following byte its lowest pixel bit and latch.
            let prev_raw = render_raw(prev << 6, !odd);
            let this_raw = render_raw(byte, odd);
            let next_raw = render_raw((next & 1) | ((next & 2) << 6), !odd);

            let mut window = [BLACK; PIXELS_PER_BYTE + 2];
            window[0] = prev_raw[PIXELS_PER_BYTE - 1];
            window[1..=PIXELS_PER_BYTE].copy_from_slice(&this_raw);
            window[PIXELS_PER_BYTE + 1] = next_raw[0];

            let filled_window = fill(window, mode);
            let mut filled = [Rgba::ZERO; PIXELS_PER_BYTE];
            for (color, &index) in filled.iter_mut().zip(&filled_window[1..=PIXELS_PER_BYTE]) {
                *color = palette.color(index);
            }

            entries.push(Septet {
                raw: this_raw,
                filled,
                byte,
            });
        }

        Self { entries }
    }

    /// The 1024 candidate septets renderable at the given byte-column parity
    /// after a byte whose two most significant bits are `prev_bits`.
    pub fn candidates(&self, odd: bool, prev_bits: u8) -> &[Septet] {
        let subset = usize::from(odd) * 4 + usize::from(prev_bits & 0b11);
        &self.entries[subset * SUBSET_LEN..(subset + 1) * SUBSET_LEN]
    }

    /// All entries, subset-major.
    pub fn entries(&self) -> &[Septet] {
        &self.entries
    }
}
