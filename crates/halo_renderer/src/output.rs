//! Netpbm image output.

use crate::renderer::{color_to_rgb8, ImageBuffer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Pixel encoding for PPM output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PpmFormat {
    /// `P6`, raw bytes
    #[default]
    Binary,
    /// `P3`, one pixel per text line
    Ascii,
}

/// Write an image as binary PPM (`P6`), top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> io::Result<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width, image.height)?;
    writer.write_all(&image.to_rgb8())
}

/// Write an image as ASCII PPM (`P3`), top row first.
pub fn write_ppm_ascii<W: Write>(image: &ImageBuffer, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(writer, "{r} {g} {b}")?;
    }

    Ok(())
}

/// Save an image to `path`.
pub fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>, format: PpmFormat) -> io::Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        PpmFormat::Binary => write_ppm(image, &mut writer)?,
        PpmFormat::Ascii => write_ppm_ascii(image, &mut writer)?,
    }
    writer.flush()?;

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn two_by_two() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 0, Color::new(0.0, 1.0, 0.0));
        image.set(0, 1, Color::new(0.0, 0.0, 1.0));
        image.set(1, 1, Color::ONE);
        image
    }

    #[test]
    fn test_binary_ppm() {
        let mut bytes = Vec::new();
        write_ppm(&two_by_two(), &mut bytes).unwrap();

        let header = b"P6\n2 2\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(
            &bytes[header.len()..],
            &[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]
        );
    }

    #[test]
    fn test_ascii_ppm() {
        let mut bytes = Vec::new();
        write_ppm_ascii(&two_by_two(), &mut bytes).unwrap();

        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["P3", "2 2", "255", "255 0 0", "0 255 0", "0 0 255", "255 255 255"]);
    }

    #[test]
    fn test_save_ppm_to_disk() {
        let name = format!("halo_output_test_{}.ppm", std::process::id());
        let path = std::env::temp_dir().join(name);
        save_ppm(&two_by_two(), &path, PpmFormat::Binary).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n2 2\n255\n"));
        assert_eq!(bytes.len(), 11 + 12);
    }
}
