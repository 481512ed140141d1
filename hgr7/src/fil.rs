//! Packing encoded screen bytes into an Agat FIL memory image.
//!
//! HGR screen memory is not linear: the 192 scanlines are interleaved by
//! raster line, character line and one of three 40-byte "superblocks", so
//! that `line = superblock * 64 + char_line * 8 + raster_line` lives at
//! `raster_line * 1024 + char_line * 128 + superblock * 40`. A FIL file is
//! the 44-byte catalog header followed by the full 8 KiB screen.

use snafu::{ensure, ResultExt, Snafu};
use std::io::Write;

/// HGR screen geometry: 280 pixels (40 bytes) by 192 lines.
pub const SCREEN_WIDTH: usize = 280;
pub const SCREEN_HEIGHT: usize = 192;
pub const BYTES_PER_LINE: usize = SCREEN_WIDTH / 7;
/// Size of the packed screen, without the FIL header.
pub const SCREEN_SIZE: usize = 0x2000;

/// FIL catalog header: the name "APPLE" (high-ASCII, space-padded) and the
/// load address / length metadata of an HGR screen dump.
pub const FIL_HEADER: [u8; 44] = [
    0xc1, 0xd0, 0xd0, 0xcc, 0xc5, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0,
    0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0, 0xa0,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x84, 0x00, 0x20, 0xff, 0x1f,
];

#[derive(Debug, Snafu)]
pub enum FilError {
    #[snafu(display("expected {SCREEN_HEIGHT} lines of screen bytes, got {count}"))]
    InvalidLineCount { count: usize },
    #[snafu(display("line {line} has {len} bytes, expected {BYTES_PER_LINE}"))]
    InvalidLineWidth { line: usize, len: usize },
    WriteIo { source: std::io::Error },
}

/// Arranges per-line screen bytes into the interleaved 8 KiB screen layout.
pub fn pack_screen(lines: &[Vec<u8>]) -> Result<Vec<u8>, FilError> {
    ensure!(
        lines.len() == SCREEN_HEIGHT,
        InvalidLineCountSnafu { count: lines.len() }
    );
    if let Some((line, bytes)) = lines.iter().enumerate().find(|(_, b)| b.len() != BYTES_PER_LINE)
    {
        return Err(FilError::InvalidLineWidth {
            line,
            len: bytes.len(),
        });
    }

    let mut screen = vec![0u8; SCREEN_SIZE];
    for raster_line in 0..8 {
        let raster_offset = raster_line * 128 * 8;
        for char_line in 0..8 {
            let char_offset = raster_offset + char_line * 128;
            for superblock in 0..3 {
                let offset = char_offset + superblock * BYTES_PER_LINE;
                let line = superblock * 64 + char_line * 8 + raster_line;
                screen[offset..offset + BYTES_PER_LINE].copy_from_slice(&lines[line]);
            }
        }
    }
    Ok(screen)
}

/// Writes a complete FIL file: the catalog header followed by the packed
/// screen.
pub fn write_fil<W: Write>(lines: &[Vec<u8>], mut w: W) -> Result<(), FilError> {
    let screen = pack_screen(lines)?;
    w.write_all(&FIL_HEADER).context(WriteIoSnafu)?;
    w.write_all(&screen).context(WriteIoSnafu)
}
