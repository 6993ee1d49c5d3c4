use crate::chunks::ihdr::Ihdr;
use crate::{Error, Result};

/// The five scanline filters. `a` is the byte one pixel to the left, `b` the
/// byte above, `c` the byte above `a`; all are zero outside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Filter {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

impl Filter {
    const ALL: [Filter; 5] = [
        Filter::None,
        Filter::Sub,
        Filter::Up,
        Filter::Average,
        Filter::Paeth,
    ];

    fn predict(&self, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => 0,
            Filter::Sub => a,
            Filter::Up => b,
            Filter::Average => ((a as u16 + b as u16) / 2) as u8,
            Filter::Paeth => paeth(a, b, c),
        }
    }

    pub(crate) fn filter(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        x.wrapping_sub(self.predict(a, b, c))
    }

    pub(crate) fn reconstruct(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        x.wrapping_add(self.predict(a, b, c))
    }
}

impl TryFrom<u8> for Filter {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            3 => Ok(Self::Average),
            4 => Ok(Self::Paeth),
            other => Err(Error::Decode(format!("unknown scanline filter {other}"))),
        }
    }
}

/// Nearest of the three neighbors to `a + b - c`, favoring `a`, then `b`.
fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Undo scanline filtering in place. `data` is the inflated image data: for
/// each pass, `height` rows of a filter byte followed by packed samples.
pub(crate) fn reconstruct_scanlines(data: &mut [u8], header: &Ihdr) -> Result<()> {
    let step = header.filter_step();
    let mut offset = 0;
    for (width, height) in header.pass_dimensions() {
        let line = header.scanline_size(width);
        reconstruct_region(&mut data[offset..offset + line * height], line, step)?;
        offset += line * height;
    }
    Ok(())
}

fn reconstruct_region(region: &mut [u8], line: usize, step: usize) -> Result<()> {
    let height = region.len() / line;
    for row in 0..height {
        let start = row * line;
        let filter = Filter::try_from(region[start])?;
        for i in 1..line {
            let x = region[start + i];
            let a = if i > step { region[start + i - step] } else { 0 };
            let b = if row > 0 { region[start + i - line] } else { 0 };
            let c = if row > 0 && i > step {
                region[start + i - line - step]
            } else {
                0
            };
            region[start + i] = filter.reconstruct(x, a, b, c);
        }
    }
    Ok(())
}

/// Filter rows for encoding. Each row gets the filter whose output has the
/// smallest sum of absolute values, bytes read as signed. Only fit for
/// non-interlaced data.
pub(crate) fn filter_scanlines(raw: &[u8], header: &Ihdr) -> Vec<u8> {
    let line = header.scanline_size(header.width as usize) - 1;
    let step = header.filter_step();
    let height = header.height as usize;
    let mut out = Vec::with_capacity((line + 1) * height);
    let mut candidate = vec![0u8; line];
    let mut best = vec![0u8; line];
    for row in 0..height {
        let current = &raw[row * line..(row + 1) * line];
        let previous = if row > 0 {
            &raw[(row - 1) * line..row * line]
        } else {
            &[][..]
        };
        let mut best_filter = Filter::None;
        let mut best_score = u64::MAX;
        for filter in Filter::ALL {
            filter_row(filter, current, previous, step, &mut candidate);
            let score: u64 = candidate
                .iter()
                .map(|&byte| (byte as i8).unsigned_abs() as u64)
                .sum();
            if score < best_score {
                best_score = score;
                best_filter = filter;
                best.copy_from_slice(&candidate);
            }
        }
        out.push(best_filter as u8);
        out.extend_from_slice(&best);
    }
    out
}

fn filter_row(filter: Filter, current: &[u8], previous: &[u8], step: usize, out: &mut [u8]) {
    for (i, out_byte) in out.iter_mut().enumerate() {
        let x = current[i];
        let a = if i >= step { current[i - step] } else { 0 };
        let b = previous.get(i).copied().unwrap_or(0);
        let c = if i >= step {
            previous.get(i - step).copied().unwrap_or(0)
        } else {
            0
        };
        *out_byte = filter.filter(x, a, b, c);
    }
}
