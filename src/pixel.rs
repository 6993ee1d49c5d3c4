use crate::chunks::ihdr::{ColorType, Ihdr};
use crate::chunks::plte::{PaletteEntry, Plte};
use crate::chunks::trns::Trns;
use crate::{Error, Result};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Pixel {
    /// What a keyed-out background pixel becomes: pure white, fully
    /// transparent.
    pub const TRANSPARENT_WHITE: Pixel = Pixel {
        red: 255,
        green: 255,
        blue: 255,
        alpha: 0,
    };

    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// True when every color channel is strictly above `threshold`. Alpha
    /// plays no part in the test.
    pub fn is_near_white(&self, threshold: u8) -> bool {
        self.red > threshold && self.green > threshold && self.blue > threshold
    }
}

/// Where a pixel's alpha comes from when the color type has no alpha
/// channel.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AlphaRule<'a> {
    /// No synthesised transparency: alpha is in the samples, or everything
    /// is opaque.
    None,
    GreyKey(u16),
    RgbKey(u16, u16, u16),
    Palette(&'a Trns<'a>),
}

/// Works out how transparency applies to an image, validating any tRNS
/// payload against the color type up front.
pub(crate) fn alpha_rule<'a>(
    header: &Ihdr,
    transparency: Option<&'a Trns<'a>>,
) -> Result<AlphaRule<'a>> {
    let trns = match transparency {
        Some(trns) => trns,
        None => return Ok(AlphaRule::None),
    };
    match header.color_type {
        ColorType::Grey => trns
            .grey_sample()
            .map(AlphaRule::GreyKey)
            .ok_or_else(|| Error::Decode("malformed tRNS chunk".into())),
        ColorType::Rgb => trns
            .rgb_sample()
            .map(|(red, green, blue)| AlphaRule::RgbKey(red, green, blue))
            .ok_or_else(|| Error::Decode("malformed tRNS chunk".into())),
        ColorType::Indexed => Ok(AlphaRule::Palette(trns)),
        // tRNS never accompanies a real alpha channel; if it does, the
        // in-sample alpha wins.
        ColorType::GreyAlpha | ColorType::Rgba => Ok(AlphaRule::None),
    }
}

/// Reads quad-channel pixels out of one reconstructed scanline, promoting
/// whatever the source color type is. Sources without an alpha channel come
/// out opaque unless the alpha rule says otherwise.
pub(crate) struct ScanlinePixels<'a> {
    samples: Samples<'a>,
    color_type: ColorType,
    bit_depth: u8,
    palette: Option<&'a Plte>,
    alpha: AlphaRule<'a>,
}

impl<'a> ScanlinePixels<'a> {
    pub(crate) fn new(
        samples: &'a [u8],
        header: &Ihdr,
        palette: Option<&'a Plte>,
        alpha: AlphaRule<'a>,
    ) -> Self {
        Self {
            samples: Samples::new(samples, header.bit_depth),
            color_type: header.color_type,
            bit_depth: header.bit_depth,
            palette,
            alpha,
        }
    }
}

impl Iterator for ScanlinePixels<'_> {
    type Item = Result<Pixel>;

    fn next(&mut self) -> Option<Self::Item> {
        let pixel = match self.color_type {
            ColorType::Grey => {
                let value = self.samples.next()?;
                let grey = scale_sample(value, self.bit_depth);
                let alpha = match self.alpha {
                    AlphaRule::GreyKey(key) if value == key => 0,
                    _ => 255,
                };
                Ok(Pixel::new(grey, grey, grey, alpha))
            }
            ColorType::GreyAlpha => {
                let value = self.samples.next()?;
                let alpha = self.samples.next()?;
                let grey = scale_sample(value, self.bit_depth);
                Ok(Pixel::new(grey, grey, grey, scale_sample(alpha, self.bit_depth)))
            }
            ColorType::Rgb => {
                let red = self.samples.next()?;
                let green = self.samples.next()?;
                let blue = self.samples.next()?;
                let alpha = match self.alpha {
                    AlphaRule::RgbKey(r, g, b) if (red, green, blue) == (r, g, b) => 0,
                    _ => 255,
                };
                Ok(Pixel::new(
                    scale_sample(red, self.bit_depth),
                    scale_sample(green, self.bit_depth),
                    scale_sample(blue, self.bit_depth),
                    alpha,
                ))
            }
            ColorType::Rgba => {
                let red = self.samples.next()?;
                let green = self.samples.next()?;
                let blue = self.samples.next()?;
                let alpha = self.samples.next()?;
                Ok(Pixel::new(
                    scale_sample(red, self.bit_depth),
                    scale_sample(green, self.bit_depth),
                    scale_sample(blue, self.bit_depth),
                    scale_sample(alpha, self.bit_depth),
                ))
            }
            ColorType::Indexed => {
                let index = self.samples.next()? as u8;
                match self.palette {
                    None => Err(Error::Decode("indexed image has no PLTE chunk".into())),
                    Some(palette) => match palette.color(index) {
                        Some(&PaletteEntry(red, green, blue)) => {
                            let alpha = match self.alpha {
                                AlphaRule::Palette(trns) => trns.palette_alpha(index),
                                _ => 255,
                            };
                            Ok(Pixel::new(red, green, blue, alpha))
                        }
                        None => Err(Error::Decode(format!(
                            "palette index {index} is out of range"
                        ))),
                    },
                }
            }
        };
        Some(pixel)
    }
}

/// Promote a sample to 8 bits. 255 is a multiple of every sub-byte maximum,
/// so low depths scale exactly; 16-bit samples keep their high byte.
fn scale_sample(value: u16, bit_depth: u8) -> u8 {
    match bit_depth {
        8 => value as u8,
        16 => (value >> 8) as u8,
        depth => (value * 255 / ((1 << depth) - 1)) as u8,
    }
}

/// MSB-first reader of packed samples; 16-bit samples are big-endian.
struct Samples<'a> {
    bytes: &'a [u8],
    bit_depth: u8,
    cursor_bits: usize,
}

impl<'a> Samples<'a> {
    fn new(bytes: &'a [u8], bit_depth: u8) -> Self {
        Self {
            bytes,
            bit_depth,
            cursor_bits: 0,
        }
    }
}

impl Iterator for Samples<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        let depth = self.bit_depth as usize;
        let index = self.cursor_bits / 8;
        let value = match depth {
            16 => u16::from_be_bytes([*self.bytes.get(index)?, *self.bytes.get(index + 1)?]),
            8 => *self.bytes.get(index)? as u16,
            _ => {
                let byte = *self.bytes.get(index)?;
                let shift = 8 - depth - self.cursor_bits % 8;
                ((byte >> shift) & ((1u8 << depth) - 1)) as u16
            }
        };
        self.cursor_bits += depth;
        Some(value)
    }
}
