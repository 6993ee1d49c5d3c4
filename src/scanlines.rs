use crate::chunks::ihdr::{Ihdr, Interlace};
use crate::interlacing::{Adam7Passes, PassIndices};

/// Iterator over `(scanline, pixel indices)` pairs in stream order. Each
/// scanline keeps its leading filter byte; the indices are the row-major
/// raster positions of its pixels. The caller must have checked that
/// `image_data` covers every pass.
pub(crate) enum Scanlines<'a> {
    Linear(LinearScanlines<'a>),
    Adam7(Adam7Scanlines<'a>),
}

impl<'a> Scanlines<'a> {
    pub(crate) fn new(image_data: &'a [u8], header: &'a Ihdr) -> Self {
        match header.interlace {
            Interlace::None => Scanlines::Linear(LinearScanlines::new(image_data, header)),
            Interlace::Adam7 => Scanlines::Adam7(Adam7Scanlines::new(image_data, header)),
        }
    }
}

impl<'a> Iterator for Scanlines<'a> {
    type Item = (&'a [u8], Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Scanlines::Linear(iter) => iter.next(),
            Scanlines::Adam7(iter) => iter.next(),
        }
    }
}

pub(crate) struct LinearScanlines<'a> {
    rows: std::slice::Chunks<'a, u8>,
    next_index: std::ops::RangeFrom<usize>,
    width: usize,
}

impl<'a> LinearScanlines<'a> {
    fn new(image_data: &'a [u8], header: &Ihdr) -> Self {
        Self {
            rows: image_data.chunks(header.scanline_size(header.width as usize)),
            next_index: 0..,
            width: header.width as usize,
        }
    }
}

impl<'a> Iterator for LinearScanlines<'a> {
    type Item = (&'a [u8], Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let indices = self.next_index.by_ref().take(self.width).collect();
        Some((row, indices))
    }
}

pub(crate) struct Adam7Scanlines<'a> {
    image_data: &'a [u8],
    header: &'a Ihdr,
    passes: Adam7Passes,
    current: Option<PassScanlines<'a>>,
}

impl<'a> Adam7Scanlines<'a> {
    fn new(image_data: &'a [u8], header: &'a Ihdr) -> Self {
        Self {
            image_data,
            header,
            passes: Adam7Passes::new(header.width as usize, header.height as usize),
            current: None,
        }
    }
}

impl<'a> Iterator for Adam7Scanlines<'a> {
    type Item = (&'a [u8], Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(scanline) = self.current.as_mut().and_then(Iterator::next) {
                return Some(scanline);
            }
            let pass = self.passes.next()?;
            let line = self.header.scanline_size(pass.width);
            let (pass_data, rest) = self.image_data.split_at(line * pass.height);
            self.image_data = rest;
            self.current = Some(PassScanlines {
                rows: pass_data.chunks(line),
                indices: pass.pixel_indices,
                width: pass.width,
            });
        }
    }
}

struct PassScanlines<'a> {
    rows: std::slice::Chunks<'a, u8>,
    indices: PassIndices,
    width: usize,
}

impl<'a> Iterator for PassScanlines<'a> {
    type Item = (&'a [u8], Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let indices: Vec<usize> = self.indices.by_ref().take(self.width).collect();
        Some((row, indices))
    }
}
