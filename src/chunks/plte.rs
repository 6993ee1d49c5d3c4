use nom::{
    bytes::complete::take,
    combinator::{all_consuming, map},
    multi::count,
    IResult,
};

use super::ChunkPayload;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaletteEntry(pub u8, pub u8, pub u8);

#[derive(Debug)]
pub(crate) struct Plte {
    entries: Vec<PaletteEntry>,
}

impl Plte {
    pub(crate) fn color(&self, index: u8) -> Option<&PaletteEntry> {
        self.entries.get(index as usize)
    }
}

impl<'a> ChunkPayload<'a> for Plte {
    const TAG: &'static [u8; 4] = b"PLTE";

    fn parse(payload: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, entries) = all_consuming(count(
            map(take(3usize), |rgb: &[u8]| PaletteEntry(rgb[0], rgb[1], rgb[2])),
            payload.len() / 3,
        ))(payload)?;
        Ok((rest, Plte { entries }))
    }
}
