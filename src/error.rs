use thiserror::Error;

use crate::handles::TextureHandle;
use crate::pixel_format::PixelFormat;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Failed to allocate texture: {0}")]
    Allocation(String),

    #[error("Stored size {width}x{height} exceeds the maximum texture size {max}")]
    ExceedsMaxSize { width: u32, height: u32, max: u32 },

    #[error("Pixel buffer for {width}x{height} {format:?} needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },

    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No texture for handle {0:?}")]
    UnknownTexture(TextureHandle),
}
