use std::path::Path;

use glam::UVec2;
use image::DynamicImage;

use crate::error::TextureError;
use crate::pixel_format::PixelFormat;

/// Decoded, tightly packed pixels waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: UVec2,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps `data`, checking it holds exactly `width * height` texels.
    /// Formats without a fixed texel size are accepted as-is so they can reach
    /// the upload path, which rejects them.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, TextureError> {
        if let Some(bpp) = format.bytes_per_pixel() {
            let expected = width as usize * height as usize * bpp;
            if data.len() != expected {
                return Err(TextureError::BufferSize {
                    width,
                    height,
                    format,
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(Self {
            size: UVec2::new(width, height),
            format,
            data,
        })
    }

    pub fn solid_rgba(rgba: [u8; 4]) -> Self {
        Self {
            size: UVec2::ONE,
            format: PixelFormat::R8G8B8A8,
            data: rgba.to_vec(),
        }
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let size = UVec2::new(img.width(), img.height());
        let (format, data) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::L8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::L8A8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::R8G8B8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::R8G8B8A8, buf.into_raw()),
            other => (PixelFormat::R8G8B8A8, other.to_rgba8().into_raw()),
        };
        Self { size, format, data }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?;
        Ok(Self::from_image(img))
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Rgb, Rgb32FImage};

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = PixelBuffer::new(4, 4, PixelFormat::R8G8B8A8, vec![0; 63]).unwrap_err();
        match err {
            TextureError::BufferSize {
                expected, actual, ..
            } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 63);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_new_accepts_exact_length() {
        let buffer = PixelBuffer::new(3, 2, PixelFormat::B8G8R8, vec![7; 18]).unwrap();
        assert_eq!(buffer.size(), UVec2::new(3, 2));
        assert_eq!(buffer.format(), PixelFormat::B8G8R8);
        assert_eq!(buffer.data().len(), 18);
    }

    #[test]
    fn test_from_image_keeps_native_layouts() {
        let gray = GrayImage::from_pixel(5, 3, image::Luma([9]));
        let buffer = PixelBuffer::from_image(DynamicImage::ImageLuma8(gray));
        assert_eq!(buffer.format(), PixelFormat::L8);
        assert_eq!(buffer.size(), UVec2::new(5, 3));
        assert_eq!(buffer.data(), &[9; 15]);

        let rgb: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgb([1, 2, 3]));
        let buffer = PixelBuffer::from_image(DynamicImage::ImageRgb8(rgb));
        assert_eq!(buffer.format(), PixelFormat::R8G8B8);
        assert_eq!(buffer.data(), &[1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_from_image_converts_float_images_to_rgba8() {
        let hdr = Rgb32FImage::from_pixel(2, 1, Rgb([1.0, 0.0, 0.0]));
        let buffer = PixelBuffer::from_image(DynamicImage::ImageRgb32F(hdr));
        assert_eq!(buffer.format(), PixelFormat::R8G8B8A8);
        assert_eq!(buffer.data(), &[255, 0, 0, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn test_load_from_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PixelBuffer::load_from_file(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(TextureError::Image(_))));
    }
}
