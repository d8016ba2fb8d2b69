use std::fmt;

/// Pixel formats the engine's image loader can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    L8,
    A8,
    L8A8,
    R8G8B8,
    B8G8R8,
    R8G8B8A8,
    B8G8R8A8,
    Dxt1,
    Dxt3,
    Dxt5,
    Unknown,
}

impl PixelFormat {
    /// Every format the OpenGL path can upload.
    pub const SUPPORTED: [PixelFormat; 7] = [
        PixelFormat::L8,
        PixelFormat::A8,
        PixelFormat::L8A8,
        PixelFormat::R8G8B8,
        PixelFormat::B8G8R8,
        PixelFormat::R8G8B8A8,
        PixelFormat::B8G8R8A8,
    ];

    /// Size of one texel for uncompressed formats, `None` otherwise.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::L8 | PixelFormat::A8 => Some(1),
            PixelFormat::L8A8 => Some(2),
            PixelFormat::R8G8B8 | PixelFormat::B8G8R8 => Some(3),
            PixelFormat::R8G8B8A8 | PixelFormat::B8G8R8A8 => Some(4),
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 | PixelFormat::Unknown => {
                None
            }
        }
    }
}

/// Fixed-function formats that the core-profile bindings don't export.
pub mod gl_compat {
    pub const ALPHA: u32 = 0x1906;
    pub const LUMINANCE: u32 = 0x1909;
    pub const LUMINANCE_ALPHA: u32 = 0x190A;
    pub const ALPHA8: u32 = 0x803C;
    pub const LUMINANCE8: u32 = 0x8040;
    pub const LUMINANCE8_ALPHA8: u32 = 0x8045;
}

/// Internal storage format and transfer format for `glTexImage2D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlFormat {
    pub internal: i32,
    pub format: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedFormat(pub PixelFormat);

impl fmt::Display for UnsupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported image format {:?}", self.0)
    }
}

impl std::error::Error for UnsupportedFormat {}

pub fn translate(format: PixelFormat) -> Result<GlFormat, UnsupportedFormat> {
    let (internal, format) = match format {
        PixelFormat::L8 => (gl_compat::LUMINANCE8, gl_compat::LUMINANCE),
        PixelFormat::A8 => (gl_compat::ALPHA8, gl_compat::ALPHA),
        PixelFormat::L8A8 => (gl_compat::LUMINANCE8_ALPHA8, gl_compat::LUMINANCE_ALPHA),
        PixelFormat::R8G8B8 => (glow::RGB8, glow::RGB),
        PixelFormat::B8G8R8 => (glow::RGB8, glow::BGR),
        PixelFormat::R8G8B8A8 => (glow::RGBA8, glow::RGBA),
        PixelFormat::B8G8R8A8 => (glow::RGBA8, glow::BGRA),
        PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 | PixelFormat::Unknown => {
            return Err(UnsupportedFormat(format));
        }
    };
    Ok(GlFormat {
        internal: internal as i32,
        format,
    })
}

/// Like [`translate`], but an unsupported format is a caller bug and aborts.
pub fn gl_format(format: PixelFormat) -> GlFormat {
    match translate(format) {
        Ok(gl) => gl,
        Err(err) => panic!("{err}"),
    }
}
