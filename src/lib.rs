mod chunks;
mod crc;
mod filters;
mod image_data;
mod interlacing;
mod pixel;
mod png;
mod remove;
mod scanlines;

pub use pixel::Pixel;
pub use png::Png;
pub use remove::{key_out_white, remove_white_background, WHITE_THRESHOLD};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input file not found at {0}")]
    InputNotFound(std::path::PathBuf),

    #[error("invalid PNG: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
