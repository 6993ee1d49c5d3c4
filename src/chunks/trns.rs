use nom::IResult;

use super::ChunkPayload;

/// Raw tRNS payload. How it reads depends on the image's color type, so the
/// accessors are picked by the caller.
#[derive(Debug)]
pub(crate) struct Trns<'a> {
    raw: &'a [u8],
}

impl Trns<'_> {
    /// The grey sample value (at source bit depth) that decodes as fully
    /// transparent. None when the payload is too short.
    pub(crate) fn grey_sample(&self) -> Option<u16> {
        let bytes = self.raw.get(0..2)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// The RGB sample triple that decodes as fully transparent.
    pub(crate) fn rgb_sample(&self) -> Option<(u16, u16, u16)> {
        let bytes = self.raw.get(0..6)?;
        Some((
            u16::from_be_bytes([bytes[0], bytes[1]]),
            u16::from_be_bytes([bytes[2], bytes[3]]),
            u16::from_be_bytes([bytes[4], bytes[5]]),
        ))
    }

    /// Alpha for a palette index. Entries past the end of the table are
    /// opaque.
    pub(crate) fn palette_alpha(&self, index: u8) -> u8 {
        *self.raw.get(index as usize).unwrap_or(&255)
    }
}

impl<'a> ChunkPayload<'a> for Trns<'a> {
    const TAG: &'static [u8; 4] = b"tRNS";

    fn parse(payload: &'a [u8]) -> IResult<&'a [u8], Self> {
        Ok((&payload[payload.len()..], Trns { raw: payload }))
    }
}
