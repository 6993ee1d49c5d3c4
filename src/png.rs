use nom::{bytes::complete::tag, IResult};

use crate::chunks::{self, idat::Idat, iend::Iend, ihdr::Ihdr, plte::Plte, trns::Trns, Chunk};
use crate::image_data;
use crate::pixel::{alpha_rule, Pixel, ScanlinePixels};
use crate::scanlines::Scanlines;
use crate::{Error, Result};

const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// A decoded image: row-major quad-channel pixels at 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Png {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Png {
    /// Decode any legal combination of color type, bit depth and
    /// interlacing, promoting every pixel to 8-bit RGBA.
    pub fn decode(bytes: &[u8]) -> Result<Png> {
        let (rest, _) =
            parse_signature(bytes).map_err(|_| Error::Decode("missing PNG signature".into()))?;

        let mut header: Option<Ihdr> = None;
        let mut palette: Option<Plte> = None;
        let mut transparency: Option<Trns> = None;
        let mut compressed = Vec::new();
        for chunk in chunks::iter_chunks(rest) {
            match chunk? {
                Chunk::Ihdr(ihdr) => {
                    header.get_or_insert(ihdr);
                }
                Chunk::Plte(plte) => {
                    palette.get_or_insert(plte);
                }
                Chunk::Trns(trns) => {
                    transparency.get_or_insert(trns);
                }
                Chunk::Idat(idat) => compressed.extend_from_slice(idat.data),
                Chunk::Iend => break,
                Chunk::Unknown(raw) => {
                    log::trace!("skipping {} chunk ({} bytes)", raw.type_label(), raw.payload_len())
                }
            }
        }

        let header = header.ok_or_else(|| Error::Decode("missing IHDR chunk".into()))?;
        header.validate()?;
        if compressed.is_empty() {
            return Err(Error::Decode("no image data (missing IDAT chunks)".into()));
        }
        log::debug!(
            "decoding a {}x{} {:?} image, bit depth {}, interlacing {:?}",
            header.width,
            header.height,
            header.color_type,
            header.bit_depth,
            header.interlace
        );

        let data = image_data::decompress(&compressed, &header)?;
        let alpha = alpha_rule(&header, transparency.as_ref())?;
        let mut pixels = vec![Pixel::default(); header.width as usize * header.height as usize];
        for (scanline, indices) in Scanlines::new(&data, &header) {
            let row = ScanlinePixels::new(&scanline[1..], &header, palette.as_ref(), alpha);
            for (pixel, index) in row.zip(indices) {
                pixels[index] = pixel?;
            }
        }

        Ok(Png {
            width: header.width,
            height: header.height,
            pixels,
        })
    }

    /// Encode as an 8-bit RGBA PNG: one IDAT chunk, no interlacing, per-row
    /// adaptive filtering.
    pub fn encode(&self) -> Vec<u8> {
        let header = Ihdr::rgba8(self.width, self.height);
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            raw.extend([pixel.red, pixel.green, pixel.blue, pixel.alpha]);
        }
        let compressed = image_data::compress(&raw, &header);

        let mut bytes = Vec::with_capacity(compressed.len() + 57);
        bytes.extend_from_slice(SIGNATURE);
        bytes.extend(header.to_bytes());
        bytes.extend(Idat { data: &compressed }.to_bytes());
        bytes.extend(Iend.to_bytes());
        bytes
    }

    /// Build an image from row-major pixels. None when a dimension is zero
    /// or `pixels` does not hold exactly `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Option<Png> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Png {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }
}

fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&SIGNATURE[..])(input)
}
