use std::fmt::Debug;
use std::rc::Rc;

use glam::UVec2;
use glow::{Context as GlowContext, HasContext};

use crate::capabilities::{self, Capabilities};
use crate::gl_check;

/// The slice of the graphics API the texture code needs. Every call targets
/// `TEXTURE_2D` on whichever texture is bound to the active unit.
pub trait GraphicsBackend {
    type Texture: Copy + PartialEq + Debug;

    fn capabilities(&self) -> Capabilities;

    fn create_texture(&mut self) -> Result<Self::Texture, String>;
    fn delete_texture(&mut self, texture: Self::Texture);
    fn active_texture(&mut self, unit: u32);
    fn bind_texture(&mut self, texture: Option<Self::Texture>);

    fn set_unpack_alignment(&mut self, alignment: i32);
    /// Allocates level 0. `pixels` of `None` leaves the storage uninitialized.
    fn tex_image_2d(&mut self, internal: i32, size: UVec2, format: u32, pixels: Option<&[u8]>);
    fn tex_sub_image_2d(&mut self, offset: UVec2, size: UVec2, format: u32, pixels: &[u8]);
    /// Uploads `pixels` as level 0 and builds the full mipmap chain. The error
    /// is the GL error code that made generation fail.
    fn build_mipmaps(
        &mut self,
        internal: i32,
        size: UVec2,
        format: u32,
        pixels: &[u8],
    ) -> Result<(), u32>;

    fn tex_parameter_i32(&mut self, parameter: u32, value: i32);
    fn tex_parameter_f32(&mut self, parameter: u32, value: f32);

    /// Pops one error from the GL error queue, `glow::NO_ERROR` when empty.
    fn get_error(&mut self) -> u32;
}

pub struct GlowBackend {
    pub gl: Rc<GlowContext>,
}

impl GlowBackend {
    pub fn new(gl: Rc<GlowContext>) -> Self {
        Self { gl }
    }
}

impl GraphicsBackend for GlowBackend {
    type Texture = glow::Texture;

    fn capabilities(&self) -> Capabilities {
        let gl = &self.gl;
        let version = gl.version();
        let extensions = gl.supported_extensions();
        unsafe {
            let max_anisotropy = if capabilities::supports_anisotropy(extensions) {
                gl.get_parameter_f32(glow::MAX_TEXTURE_MAX_ANISOTROPY).max(1.0)
            } else {
                1.0
            };
            Capabilities {
                npot_supported: capabilities::supports_npot(
                    version.major,
                    version.minor,
                    version.is_embedded,
                    extensions,
                ),
                max_anisotropy,
                max_texture_size: gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE).max(0) as u32,
            }
        }
    }

    fn create_texture(&mut self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn delete_texture(&mut self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&mut self, texture: Option<Self::Texture>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn set_unpack_alignment(&mut self, alignment: i32) {
        unsafe { self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, alignment) }
    }

    fn tex_image_2d(&mut self, internal: i32, size: UVec2, format: u32, pixels: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal,
                size.x as i32,
                size.y as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(pixels),
            );
        }
    }

    fn tex_sub_image_2d(&mut self, offset: UVec2, size: UVec2, format: u32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                offset.x as i32,
                offset.y as i32,
                size.x as i32,
                size.y as i32,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn build_mipmaps(
        &mut self,
        internal: i32,
        size: UVec2,
        format: u32,
        pixels: &[u8],
    ) -> Result<(), u32> {
        // Only errors raised by glGenerateMipmap count as a generation failure.
        gl_check::check_gl(self, "texture upload setup");
        self.tex_image_2d(internal, size, format, Some(pixels));
        gl_check::check_gl(self, "mipmap level 0 upload");
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) };
        gl_check::take_error(self)
    }

    fn tex_parameter_i32(&mut self, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(glow::TEXTURE_2D, parameter, value) }
    }

    fn tex_parameter_f32(&mut self, parameter: u32, value: f32) {
        unsafe { self.gl.tex_parameter_f32(glow::TEXTURE_2D, parameter, value) }
    }

    fn get_error(&mut self) -> u32 {
        unsafe { self.gl.get_error() }
    }
}
