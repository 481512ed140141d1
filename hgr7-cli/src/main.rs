use argh::FromArgs;
use hgr7::{convert, fil, FillMode, Palette, Rgba};
use image::{ImageFormat, RgbaImage};
use std::{fs::File, io::BufWriter};

/// Apple ][ hi-res image converter. Writes a quantized PNG preview and an
/// HGR memory image (FIL) next to each other.
#[derive(FromArgs)]
struct Cli {
    /// palette file: 16 lines of tab-separated decimal R G B. Defaults to
    /// the built-in Apple ][ palette.
    #[argh(option)]
    palette: Option<String>,

    /// target an RGB monitor instead of a composite TV (disables the color
    /// bleed emulation)
    #[argh(switch)]
    rgb: bool,

    /// skip writing the .fil memory image (only useful for non-280x192
    /// input)
    #[argh(switch)]
    no_fil: bool,

    /// the input image (png, jpg, bmp)
    #[argh(positional)]
    input: String,
    /// output path prefix; writes `<prefix>.png` and `<prefix>.fil`
    #[argh(positional)]
    output: String,
}

const DEFAULT_PALETTE: &str = include_str!("../apple2.pal");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        palette,
        rgb,
        no_fil,
        input,
        output,
    } = argh::from_env();

    let palette = match palette {
        Some(path) => Palette::parse(&std::fs::read_to_string(path)?)?,
        None => Palette::parse(DEFAULT_PALETTE)?,
    };
    let mode = if rgb {
        FillMode::Rgb
    } else {
        FillMode::Composite
    };

    let image = image::io::Reader::open(&input)?
        .with_guessed_format()?
        .decode()?
        .into_rgba8();
    let width = image.width() as usize;
    let height = image.height() as usize;

    println!("Converting {width}x{height} image");

    let pixels: Vec<Rgba> = image
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            Rgba::new(r as f32, g as f32, b as f32, a as f32)
        })
        .collect();

    let converted = convert(&pixels, width, height, &palette, mode)?;

    let mut rgba_raw = Vec::with_capacity(width * height * 4);
    for line in &converted.lines {
        for &pixel in line {
            rgba_raw.extend_from_slice(&pixel.to_rgba8());
        }
    }

    let png_path = format!("{output}.png");
    RgbaImage::from_vec(width as u32, height as u32, rgba_raw)
        .ok_or("failed to create output image")?
        .save_with_format(&png_path, ImageFormat::Png)?;
    println!("Written preview to `{png_path}`");

    if !no_fil {
        let fil_path = format!("{output}.fil");
        fil::write_fil(&converted.bytes, BufWriter::new(File::create(&fil_path)?))?;
        println!("Written memory image to `{fil_path}`");
    }

    Ok(())
}
