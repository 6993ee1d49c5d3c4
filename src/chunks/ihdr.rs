use nom::{
    combinator::{all_consuming, map_res},
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use super::ChunkPayload;
use crate::crc::crc32;
use crate::interlacing::Adam7Passes;
use crate::{Error, Result};

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Ihdr {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) bit_depth: u8,
    pub(crate) color_type: ColorType,
    pub(crate) compression_method: u8,
    pub(crate) filter_method: u8,
    pub(crate) interlace: Interlace,
}

impl Ihdr {
    /// The header every encoded image gets: 8-bit RGBA, not interlaced.
    pub(crate) fn rgba8(width: u32, height: u32) -> Self {
        Ihdr {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::Rgba,
            compression_method: 0,
            filter_method: 0,
            interlace: Interlace::None,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Decode("image dimensions must be nonzero".into()));
        }
        let depth_ok = match self.color_type {
            ColorType::Grey => matches!(self.bit_depth, 1 | 2 | 4 | 8 | 16),
            ColorType::Indexed => matches!(self.bit_depth, 1 | 2 | 4 | 8),
            ColorType::Rgb | ColorType::GreyAlpha | ColorType::Rgba => {
                matches!(self.bit_depth, 8 | 16)
            }
        };
        if !depth_ok {
            return Err(Error::Decode(format!(
                "bit depth {} is not valid for {:?} images",
                self.bit_depth, self.color_type
            )));
        }
        if self.compression_method != 0 {
            return Err(Error::Decode(format!(
                "unknown compression method {}",
                self.compression_method
            )));
        }
        if self.filter_method != 0 {
            return Err(Error::Decode(format!(
                "unknown filter method {}",
                self.filter_method
            )));
        }
        Ok(())
    }

    /// Distance in bytes to the sample the Sub, Average and Paeth filters
    /// treat as the left neighbor. Never less than one whole byte.
    pub(crate) fn filter_step(&self) -> usize {
        self.color_type.channels() * usize::max(self.bit_depth as usize / 8, 1)
    }

    pub(crate) fn bits_per_pixel(&self) -> usize {
        self.color_type.channels() * self.bit_depth as usize
    }

    /// Filter byte plus packed samples for one row of `width` pixels.
    pub(crate) fn scanline_size(&self, width: usize) -> usize {
        (width * self.bits_per_pixel()).div_ceil(8) + 1
    }

    /// Width and height of each independently filtered region of the image
    /// data: the whole raster, or the seven Adam7 reduced images.
    pub(crate) fn pass_dimensions(&self) -> Vec<(usize, usize)> {
        match self.interlace {
            Interlace::None => vec![(self.width as usize, self.height as usize)],
            Interlace::Adam7 => Adam7Passes::new(self.width as usize, self.height as usize)
                .map(|pass| (pass.width, pass.height))
                .collect(),
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 13];
        bytes.extend(Self::TAG);
        bytes.extend(self.width.to_be_bytes());
        bytes.extend(self.height.to_be_bytes());
        bytes.extend([
            self.bit_depth,
            self.color_type as u8,
            self.compression_method,
            self.filter_method,
            self.interlace as u8,
        ]);
        let crc = crc32(bytes[4..].iter().copied()).to_be_bytes();
        bytes.extend(crc);
        bytes
    }
}

impl<'a> ChunkPayload<'a> for Ihdr {
    const TAG: &'static [u8; 4] = b"IHDR";

    fn parse(payload: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (width, height, bit_depth, color_type, compression_method, filter_method, interlace)) =
            all_consuming(tuple((
                be_u32,
                be_u32,
                u8,
                map_res(u8, ColorType::try_from),
                u8,
                u8,
                map_res(u8, Interlace::try_from),
            )))(payload)?;
        Ok((
            rest,
            Ihdr {
                width,
                height,
                bit_depth,
                color_type,
                compression_method,
                filter_method,
                interlace,
            },
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorType {
    Grey = 0,
    Rgb = 2,
    Indexed = 3,
    GreyAlpha = 4,
    Rgba = 6,
}

impl ColorType {
    pub(crate) fn channels(&self) -> usize {
        match self {
            Self::Grey | Self::Indexed => 1,
            Self::GreyAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

impl TryFrom<u8> for ColorType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Grey),
            2 => Ok(Self::Rgb),
            3 => Ok(Self::Indexed),
            4 => Ok(Self::GreyAlpha),
            6 => Ok(Self::Rgba),
            other => Err(Error::Decode(format!("unknown color type {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interlace {
    None = 0,
    Adam7 = 1,
}

impl TryFrom<u8> for Interlace {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Adam7),
            other => Err(Error::Decode(format!("unknown interlace method {other}"))),
        }
    }
}
