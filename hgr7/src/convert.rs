//! The line-by-line conversion loop: perceptual matching against the lookup
//! table plus one-directional error diffusion into the next scanline.

use crate::{
    color::{distance, Palette, Rgba},
    consts::PIXELS_PER_BYTE,
    fill::{fill_line, FillMode},
    septet::{LookupTable, Septet},
};
use alloc::{vec, vec::Vec};
use core::f32::consts::FRAC_1_SQRT_2;
use snafu::{ensure, Snafu};

/// Weight of the pixel straight below when diffusing error, `1 / (1 + √2)`.
/// The two diagonal neighbors each get [`DIAG_WEIGHT`]; the three weights
/// sum to one, so no error mass is created or lost away from line edges.
pub const STRAIGHT_WEIGHT: f32 = 1.0 / (1.0 + 2.0 * FRAC_1_SQRT_2);
/// Weight of each diagonal neighbor on the next line, `(1/√2) / (1 + √2)`.
pub const DIAG_WEIGHT: f32 = FRAC_1_SQRT_2 / (1.0 + 2.0 * FRAC_1_SQRT_2);

#[derive(Debug, Snafu)]
pub enum ConvertError {
    #[snafu(display("image width {width} is not a multiple of 7"))]
    WidthNotMultipleOf7 { width: usize },
    #[snafu(display(
        "specified image dimensions don't match the number of pixels: {width} * {height} == {} pixels, but {pixel_count} pixels were given",
        width * height
    ))]
    InvalidDimensions {
        width: usize,
        height: usize,
        pixel_count: usize,
    },
    #[snafu(display("pixel {index} has a channel outside 0..=255"))]
    ChannelOutOfRange { index: usize },
}

/// The result of a conversion: what the display will show, and the bytes
/// that make it show that.
#[derive(Debug, Clone)]
pub struct Converted {
    /// Quantized output pixels, one `width`-sized line per source line.
    pub lines: Vec<Vec<Rgba>>,
    /// Encoded screen bytes, `width / 7` per line, ready for
    /// [`crate::fil`] to arrange into display memory.
    pub bytes: Vec<Vec<u8>>,
}

/// Finds the candidate whose fill-adjusted pixels are perceptually closest
/// to `target` (sum of [`distance`] over the 7 pixels). Exhaustive scan;
/// the first candidate encountered wins ties.
fn match_septet<'t>(target: &[Rgba], candidates: &'t [Septet]) -> &'t Septet {
    let mut best = &candidates[0];
    let mut best_distance = f32::INFINITY;

    for septet in candidates {
        let d: f32 = target
            .iter()
            .zip(&septet.filled)
            .map(|(&t, &f)| distance(t, f))
            .sum();
        if d < best_distance {
            best_distance = d;
            best = septet;
        }
    }
    best
}

/// Converts one scanline, 7 pixels at a time.
///
/// Each group's candidate subset depends on the previously chosen byte and
/// the alternating byte-column parity, so the groups form a hard sequential
/// chain. The chosen bytes are appended to `bytes`. After all groups, the
/// fill rule runs once more over the whole assembled line: a group's right
/// edge depends on the next group's byte, which the per-group lookup could
/// not see yet. This can move the result away from the table's per-group
/// optimum; that is the reference behavior, not an accident.
fn convert_line(
    line: &[Rgba],
    table: &LookupTable,
    palette: &Palette,
    mode: FillMode,
    bytes: &mut Vec<u8>,
) -> Vec<Rgba> {
    let mut raw = Vec::with_capacity(line.len());
    let mut prev_byte = 0u8;
    let mut odd = false;

    for target in line.chunks_exact(PIXELS_PER_BYTE) {
        let matched = match_septet(target, table.candidates(odd, prev_byte >> 6));
        raw.extend_from_slice(&matched.raw);
        bytes.push(matched.byte);
        prev_byte = matched.byte;
        odd = !odd;
    }

    fill_line(&raw, mode)
        .into_iter()
        .map(|index| palette.color(index))
        .collect()
}

/// Spreads each pixel's quantization error over 3 pixels of the next line:
/// straight down weighted [`STRAIGHT_WEIGHT`], the two diagonals
/// [`DIAG_WEIGHT`] each. Out-of-range neighbors contribute nothing. Error
/// never travels sideways within a line or upwards.
pub fn diffuse(errors: &[Rgba]) -> Vec<Rgba> {
    let at = |i: usize| errors.get(i).copied().unwrap_or(Rgba::ZERO);

    (0..errors.len())
        .map(|i| {
            let left = if i > 0 { at(i - 1) } else { Rgba::ZERO };
            left * DIAG_WEIGHT + at(i) * STRAIGHT_WEIGHT + at(i + 1) * DIAG_WEIGHT
        })
        .collect()
}

/// Converts a row-major RGBA bitmap into its HGR rendition.
///
/// Lines are processed top to bottom; each line's residual quantization
/// error is diffused into the next, so the loop is intrinsically
/// sequential along the vertical axis. The lookup table is built once up
/// front and only read afterwards.
///
/// Source channels must be integers in `0..=255` and `width` must be a
/// multiple of 7; violations fail fast before any processing.
pub fn convert(
    pixels: &[Rgba],
    width: usize,
    height: usize,
    palette: &Palette,
    mode: FillMode,
) -> Result<Converted, ConvertError> {
    ensure!(width % 7 == 0, WidthNotMultipleOf7Snafu { width });
    ensure!(
        width * height == pixels.len(),
        InvalidDimensionsSnafu {
            width,
            height,
            pixel_count: pixels.len()
        }
    );
    if let Some(index) = pixels.iter().position(|p| !p.in_range()) {
        return Err(ConvertError::ChannelOutOfRange { index });
    }

    if pixels.is_empty() {
        return Ok(Converted {
            lines: vec![Vec::new(); height],
            bytes: vec![Vec::new(); height],
        });
    }

    let table = LookupTable::build(palette, mode);

    let mut lines = Vec::with_capacity(height);
    let mut bytes = Vec::with_capacity(height);
    let mut error = vec![Rgba::ZERO; width];

    for source in pixels.chunks_exact(width) {
        let adjusted: Vec<Rgba> = source
            .iter()
            .zip(&error)
            .map(|(&pixel, &carried)| pixel + carried)
            .collect();

        let mut line_bytes = Vec::with_capacity(width / PIXELS_PER_BYTE);
        let converted = convert_line(&adjusted, &table, palette, mode, &mut line_bytes);

        let residual: Vec<Rgba> = adjusted
            .iter()
            .zip(&converted)
            .map(|(&wanted, &got)| wanted - got)
            .collect();
        error = diffuse(&residual);

        lines.push(converted);
        bytes.push(line_bytes);
    }

    Ok(Converted { lines, bytes })
}
