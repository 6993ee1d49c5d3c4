use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::pixel::Pixel;
use crate::png::Png;
use crate::{Error, Result};

/// Channel cutoff above which a pixel counts as background white.
pub const WHITE_THRESHOLD: u8 = 200;

/// Rewrite every near-white pixel to transparent white, in place. Returns
/// how many pixels were rewritten.
pub fn key_out_white(png: &mut Png, threshold: u8) -> usize {
    let mut keyed = 0;
    for pixel in png.pixels_mut() {
        if pixel.is_near_white(threshold) {
            *pixel = Pixel::TRANSPARENT_WHITE;
            keyed += 1;
        }
    }
    keyed
}

/// Decode `input`, key out its near-white background and write the result
/// to `output` as an 8-bit RGBA PNG. The bytes land via a temporary file in
/// the output directory, so a failed run never leaves a truncated image
/// behind.
pub fn remove_white_background(input: &Path, output: &Path, threshold: u8) -> Result<()> {
    let bytes = fs::read(input).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::InputNotFound(input.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    let mut png = Png::decode(&bytes)?;

    let keyed = key_out_white(&mut png, threshold);
    log::info!(
        "keyed {keyed} of {} pixels at threshold {threshold}",
        png.pixels().len()
    );

    let encoded = png.encode();
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&encoded)?;
    file.persist(output).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(pixels: Vec<Pixel>) -> Png {
        let width = pixels.len() as u32;
        Png::from_pixels(width, 1, pixels).unwrap()
    }

    #[test]
    fn keys_only_pixels_over_the_cutoff() {
        let mut png = image(vec![
            Pixel::new(255, 255, 255, 255),
            Pixel::new(10, 10, 10, 255),
        ]);
        assert_eq!(key_out_white(&mut png, WHITE_THRESHOLD), 1);
        assert_eq!(
            png.pixels(),
            &[Pixel::TRANSPARENT_WHITE, Pixel::new(10, 10, 10, 255)]
        );
    }

    #[test]
    fn the_cutoff_itself_is_kept() {
        let mut png = image(vec![
            Pixel::new(200, 200, 200, 255),
            Pixel::new(201, 201, 201, 255),
        ]);
        assert_eq!(key_out_white(&mut png, WHITE_THRESHOLD), 1);
        assert_eq!(png.pixels()[0], Pixel::new(200, 200, 200, 255));
        assert_eq!(png.pixels()[1], Pixel::TRANSPARENT_WHITE);
    }

    #[test]
    fn mixed_channels_pass_through_untouched() {
        let original = Pixel::new(250, 250, 199, 128);
        let mut png = image(vec![original]);
        assert_eq!(key_out_white(&mut png, WHITE_THRESHOLD), 0);
        assert_eq!(png.pixels(), &[original]);
    }

    #[test]
    fn near_white_is_keyed_regardless_of_alpha() {
        let mut png = image(vec![
            Pixel::new(210, 220, 230, 7),
            Pixel::new(255, 255, 255, 0),
        ]);
        assert_eq!(key_out_white(&mut png, WHITE_THRESHOLD), 2);
        assert_eq!(
            png.pixels(),
            &[Pixel::TRANSPARENT_WHITE, Pixel::TRANSPARENT_WHITE]
        );
    }

    #[test]
    fn keying_twice_changes_nothing_more() {
        let mut png = image(vec![
            Pixel::new(255, 255, 255, 255),
            Pixel::new(200, 200, 200, 255),
            Pixel::new(0, 0, 0, 0),
        ]);
        key_out_white(&mut png, WHITE_THRESHOLD);
        let after_first = png.clone();
        assert_eq!(key_out_white(&mut png, WHITE_THRESHOLD), 1);
        assert_eq!(png, after_first);
    }

    #[test]
    fn the_threshold_is_a_parameter() {
        let mut png = image(vec![Pixel::new(150, 150, 150, 255)]);
        assert_eq!(key_out_white(&mut png, 100), 1);
        assert_eq!(png.pixels(), &[Pixel::TRANSPARENT_WHITE]);
    }
}
