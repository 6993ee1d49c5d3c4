use miniz_oxide::{deflate::compress_to_vec_zlib, inflate::decompress_to_vec_zlib_with_limit};

use crate::chunks::ihdr::Ihdr;
use crate::filters;
use crate::{Error, Result};

/// Filter and zlib-compress raw sample rows for a single-IDAT encode.
pub(crate) fn compress(raw: &[u8], header: &Ihdr) -> Vec<u8> {
    let filtered = filters::filter_scanlines(raw, header);
    compress_to_vec_zlib(&filtered, 9)
}

/// Inflate concatenated IDAT payloads and undo the scanline filtering.
/// Inflation is capped at the size the header describes. The returned buffer
/// keeps its per-row filter bytes in place.
pub(crate) fn decompress(compressed: &[u8], header: &Ihdr) -> Result<Vec<u8>> {
    let expected = expected_len(header)?;
    let mut data = decompress_to_vec_zlib_with_limit(compressed, expected)
        .map_err(|e| Error::Decode(format!("failed to inflate image data: {e}")))?;
    if data.len() != expected {
        return Err(Error::Decode(format!(
            "image data is {} bytes, expected {expected}",
            data.len()
        )));
    }
    filters::reconstruct_scanlines(&mut data, header)?;
    Ok(data)
}

/// Total size of the filtered image data the header describes. A crafted
/// header can claim more bytes than fit in a usize, so the arithmetic is
/// checked and overflow is a decode error.
fn expected_len(header: &Ihdr) -> Result<usize> {
    header
        .pass_dimensions()
        .into_iter()
        .try_fold(0usize, |total, (width, height)| {
            header
                .scanline_size(width)
                .checked_mul(height)
                .and_then(|pass| total.checked_add(pass))
                .ok_or_else(|| Error::Decode("image dimensions are too large to decode".into()))
        })
}
