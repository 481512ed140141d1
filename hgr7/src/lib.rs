//! Converter from arbitrary RGBA bitmaps to the Apple ][ hi-res (HGR) graphics
//! mode, emulating the color artifacts of the real hardware.
//!
//! In HGR, each byte of screen memory drives 7 adjacent pixels. The display
//! derives pixel color from the bit pattern, the pixel's horizontal parity and
//! a per-byte palette-select latch, so the same byte renders differently at
//! even and odd byte columns, and the edge pixels of a byte are influenced by
//! the neighboring bytes.
//!
//! # Byte format
//!
//! ```plain
//! .- HGR byte ---------------------.
//! |  7  |  6  5  4  3  2  1  0    |
//! |-----+-------------------------|
//! | pal | p6 p5 p4 p3 p2 p1 p0    |
//! `--------------------------------`
//! ```
//!
//! - bit 7: palette-select latch. Clear picks the "low" color pair
//!   ([`LO_PAIR`](consts::LO_PAIR)), set picks the "high" pair
//!   ([`HI_PAIR`](consts::HI_PAIR)).
//! - bits 0..=6: one bit per pixel, least significant bit leftmost on screen.
//!   A clear bit renders background black; a set bit renders one of the two
//!   pair colors, selected by the pixel's horizontal parity.
//!
//! # Color artifacts
//!
//! Two adjacent set pixels carry different chroma phases and interfere: the
//! hardware shows both as white. A composite (NTSC) display additionally
//! bleeds color across a single black pixel sitting between two same-colored
//! pixels. Both effects are modeled by the fill rule in [`fill`], selectable
//! via [`fill::FillMode`].
//!
//! # Pipeline
//!
//! [`septet::LookupTable::build`] enumerates every renderable 7-pixel group:
//! 8192 combinations of byte value, neighbor boundary bits and byte-column
//! parity. [`convert::convert`] then walks the image line by line, matching
//! each group of 7 source pixels against the table under a perceptual
//! luma-weighted metric and diffusing the residual quantization error into
//! the next scanline.
//!
//! The converter output is both the quantized pixel colors (for previewing)
//! and the raw screen bytes, which [`fil`] can arrange into the interleaved
//! HGR memory layout of a FIL disk image.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod color;
#[cfg(feature = "alloc")]
pub mod convert;
#[cfg(feature = "std")]
pub mod fil;
pub mod fill;
pub mod septet;

pub use color::{Palette, Rgba};
#[cfg(feature = "alloc")]
pub use convert::{convert, Converted};
pub use fill::FillMode;

pub mod consts {
    //! Palette index conventions.
    //!
    //! The 16-entry palette is ordered the way the original Agat/Apple ][
    //! tooling orders it. Two positions carry rule significance: index 0 is
    //! background black (an unset pixel bit), index 15 is white. White never
    //! appears in a raw render; it only arises from the interference of two
    //! adjacent non-black pixels.

    /// Background black, rendered by every clear pixel bit.
    pub const BLACK: u8 = 0;

    /// White, produced only by adjacent-pixel interference.
    pub const WHITE: u8 = 15;

    /// Color pair used when the palette-select latch (bit 7) is clear,
    /// indexed by pixel parity: `LO_PAIR[0]` at even pixels, `LO_PAIR[1]`
    /// at odd pixels.
    pub const LO_PAIR: [u8; 2] = [10, 5];

    /// Color pair used when the palette-select latch (bit 7) is set.
    pub const HI_PAIR: [u8; 2] = [6, 9];

    /// Pixels rendered by one screen byte.
    pub const PIXELS_PER_BYTE: usize = 7;

    /// Entries in one candidate subset of the lookup table: 256 byte values
    /// times 4 following-boundary-bit patterns.
    pub const SUBSET_LEN: usize = 1024;
}
