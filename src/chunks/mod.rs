use nom::{
    bytes::complete::{tag, take},
    combinator::map,
    multi::length_data,
    number::complete::be_u32,
    sequence::{terminated, tuple},
    IResult,
};

use crate::crc::crc32;
use crate::{Error, Result};

pub(crate) mod idat;
pub(crate) mod iend;
pub(crate) mod ihdr;
pub(crate) mod plte;
pub(crate) mod trns;

/// A chunk whose tag this crate understands, or the raw bytes of one it
/// doesn't.
#[derive(Debug)]
pub(crate) enum Chunk<'a> {
    Ihdr(ihdr::Ihdr),
    Plte(plte::Plte),
    Trns(trns::Trns<'a>),
    Idat(idat::Idat<'a>),
    Iend,
    Unknown(RawChunk<'a>),
}

/// Payload parsing for one chunk type.
pub(crate) trait ChunkPayload<'a>: Sized {
    const TAG: &'static [u8; 4];

    fn parse(payload: &'a [u8]) -> IResult<&'a [u8], Self>;
}

pub(crate) fn iter_chunks(source: &[u8]) -> ChunkIter<'_> {
    ChunkIter {
        source,
        finished: false,
    }
}

pub(crate) struct ChunkIter<'a> {
    source: &'a [u8],
    finished: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.source.is_empty() {
            self.finished = true;
            return Some(Err(Error::Decode("file ends before an IEND chunk".into())));
        }
        match parse_chunk(self.source) {
            Ok((rest, chunk)) => {
                self.source = rest;
                if matches!(chunk, Chunk::Iend) {
                    self.finished = true;
                }
                Some(Ok(chunk))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn parse_chunk(input: &[u8]) -> Result<(&[u8], Chunk<'_>)> {
    let (rest, (type_code, payload)) = framed_chunk(input)
        .map_err(|_| Error::Decode("corrupt chunk (bad length or checksum)".into()))?;
    let chunk = match type_code {
        ihdr::Ihdr::TAG => Chunk::Ihdr(parse_payload::<ihdr::Ihdr>(payload)?),
        plte::Plte::TAG => Chunk::Plte(parse_payload::<plte::Plte>(payload)?),
        trns::Trns::TAG => Chunk::Trns(parse_payload::<trns::Trns>(payload)?),
        idat::Idat::TAG => Chunk::Idat(parse_payload::<idat::Idat>(payload)?),
        iend::Iend::TAG => Chunk::Iend,
        _ => Chunk::Unknown(RawChunk { type_code, payload }),
    };
    Ok((rest, chunk))
}

fn parse_payload<'a, C: ChunkPayload<'a>>(payload: &'a [u8]) -> Result<C> {
    match C::parse(payload) {
        Ok((_, chunk)) => Ok(chunk),
        Err(_) => Err(Error::Decode(format!(
            "malformed {} chunk",
            String::from_utf8_lossy(C::TAG)
        ))),
    }
}

#[derive(Debug)]
pub(crate) struct RawChunk<'a> {
    type_code: &'a [u8; 4],
    payload: &'a [u8],
}

impl RawChunk<'_> {
    pub(crate) fn type_label(&self) -> String {
        String::from_utf8_lossy(self.type_code).into_owned()
    }

    pub(crate) fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Splits off one framed chunk: length, type code, payload, CRC. The CRC
/// covers the type code and payload and is checked here.
fn framed_chunk(input: &[u8]) -> IResult<&[u8], (&[u8; 4], &[u8])> {
    let (type_len, crc_len) = (4u32, 4u32);
    let (input, framed) = length_data(map(be_u32, |v| v.saturating_add(type_len + crc_len)))(input)?;
    let crc = crc32(framed[0..framed.len() - crc_len as usize].iter().copied()).to_be_bytes();
    let (_, parts) = tuple((
        map(take(type_len), |v: &[u8]| {
            v.try_into().expect("4 bytes should have been taken")
        }),
        terminated(
            take(framed.len() - (type_len + crc_len) as usize),
            tag(crc),
        ),
    ))(framed)?;
    Ok((input, parts))
}
