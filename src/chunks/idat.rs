use nom::IResult;

use super::ChunkPayload;
use crate::crc::crc32;

#[derive(Debug)]
pub(crate) struct Idat<'a> {
    pub(crate) data: &'a [u8],
}

impl Idat<'_> {
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = (self.data.len() as u32).to_be_bytes().to_vec();
        bytes.extend(Self::TAG);
        bytes.extend(self.data);
        let crc = crc32(bytes[4..].iter().copied()).to_be_bytes();
        bytes.extend(crc);
        bytes
    }
}

impl<'a> ChunkPayload<'a> for Idat<'a> {
    const TAG: &'static [u8; 4] = b"IDAT";

    fn parse(payload: &'a [u8]) -> IResult<&'a [u8], Self> {
        Ok((&payload[payload.len()..], Idat { data: payload }))
    }
}
