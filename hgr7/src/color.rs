use crate::consts::BLACK;
use core::ops::{Add, Mul, Sub};
use snafu::{ensure, Snafu};

/// Luma weight of the red channel (ITU-R BT.601).
pub const K_R: f32 = 0.299;
/// Luma weight of the blue channel.
pub const K_B: f32 = 0.114;
/// Luma weight of the green channel.
pub const K_G: f32 = 1.0 - K_R - K_B;

/// An RGBA color with real-valued channels.
///
/// Palette entries and final output pixels hold integer values in `0..=255`.
/// During error diffusion the channels accumulate signed quantization error
/// and may leave that range; [`Rgba::to_rgba8`] clamps back on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const ZERO: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color from 8-bit RGB components.
    pub const fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32, g as f32, b as f32, 255.0)
    }

    /// Rounds to 8-bit components, saturating out-of-range channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r + 0.5) as u8,
            (self.g + 0.5) as u8,
            (self.b + 0.5) as u8,
            (self.a + 0.5) as u8,
        ]
    }

    /// Whether all channels are within the representable `0..=255` range.
    pub fn in_range(self) -> bool {
        let ok = |v: f32| (0.0..=255.0).contains(&v);
        ok(self.r) && ok(self.g) && ok(self.b) && ok(self.a)
    }
}

impl Add for Rgba {
    type Output = Rgba;

    fn add(self, rhs: Rgba) -> Rgba {
        Rgba::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl Sub for Rgba {
    type Output = Rgba;

    fn sub(self, rhs: Rgba) -> Rgba {
        Rgba::new(
            self.r - rhs.r,
            self.g - rhs.g,
            self.b - rhs.b,
            self.a - rhs.a,
        )
    }
}

impl Mul<f32> for Rgba {
    type Output = Rgba;

    fn mul(self, rhs: f32) -> Rgba {
        Rgba::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

/// Perceptual squared distance between two colors, weighted by the BT.601
/// luma coefficients. Symmetric, zero for identical colors. Alpha is ignored.
pub fn distance(c1: Rgba, c2: Rgba) -> f32 {
    let dr = (c1.r - c2.r) * K_R;
    let dg = (c1.g - c2.g) * K_G;
    let db = (c1.b - c2.b) * K_B;
    dr * dr + dg * dg + db * db
}

#[derive(Debug, Snafu)]
pub enum PaletteError {
    #[snafu(display("palette must have exactly 16 entries, got {len}"))]
    InvalidLength { len: usize },
    #[snafu(display("palette line {line}: expected 3 tab-separated decimal components"))]
    InvalidEntry { line: usize },
}

/// An ordered set of 16 display colors.
///
/// Index 0 is background black and index 15 is white; see [`crate::consts`]
/// for the full ordering convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [Rgba; 16],
}

impl Palette {
    pub const fn new(colors: [Rgba; 16]) -> Self {
        Self { colors }
    }

    pub fn from_slice(colors: &[Rgba]) -> Result<Self, PaletteError> {
        ensure!(colors.len() == 16, InvalidLengthSnafu { len: colors.len() });
        let mut entries = [Rgba::ZERO; 16];
        entries.copy_from_slice(colors);
        Ok(Self::new(entries))
    }

    /// Parses a palette definition: 16 lines of tab-separated decimal
    /// `R G B` components, one entry per line. Alpha is fixed at 255.
    pub fn parse(text: &str) -> Result<Self, PaletteError> {
        let len = text.lines().filter(|l| !l.trim().is_empty()).count();
        ensure!(len == 16, InvalidLengthSnafu { len });

        let mut entries = [Rgba::ZERO; 16];
        let lines = text.lines().filter(|l| !l.trim().is_empty());
        for ((i, line), entry) in lines.enumerate().zip(&mut entries) {
            let mut components = line.split('\t').map(|c| c.trim().parse::<u8>());
            let mut next = || {
                components
                    .next()
                    .and_then(Result::ok)
                    .ok_or(PaletteError::InvalidEntry { line: i + 1 })
            };
            let rgb = [next()?, next()?, next()?];
            ensure!(components.next().is_none(), InvalidEntrySnafu { line: i + 1 });

            *entry = Rgba::from_rgb8(rgb);
        }

        Ok(Self::new(entries))
    }

    /// The color at a palette index.
    pub fn color(&self, index: u8) -> Rgba {
        self.colors[usize::from(index)]
    }

    /// The background (black) entry.
    pub fn background(&self) -> Rgba {
        self.colors[usize::from(BLACK)]
    }

    pub fn colors(&self) -> &[Rgba; 16] {
        &self.colors
    }
}
