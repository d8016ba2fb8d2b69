use glam::{UVec2, Vec2};

use crate::error::TextureError;
use crate::gl_check::{check_gl, error_string};
use crate::handles::TextureHandle;
use crate::pixel_buffer::PixelBuffer;
use crate::pixel_format::{self, PixelFormat};
use crate::renderer::RenderContext;
use crate::renderer_backends::GraphicsBackend;
use crate::sampling::{self, FilterMode, SamplingState};

/// A 2D texture and the GL object backing it.
///
/// The texture keeps its source pixels so it can be re-uploaded, and it
/// remembers the sampling state last written to the GL object so that
/// [`Texture::apply`] only touches parameters that changed.
pub struct Texture<B: GraphicsBackend> {
    handle: TextureHandle,
    name: String,
    gl_tex: Option<B::Texture>,
    image: PixelBuffer,
    stored_size: UVec2,
    mipmaps: bool,
    state: SamplingState,
}

impl<B: GraphicsBackend> Texture<B> {
    pub(crate) fn new(
        handle: TextureHandle,
        name: impl Into<String>,
        image: PixelBuffer,
        mipmaps: bool,
    ) -> Self {
        Self {
            handle,
            name: name.into(),
            gl_tex: None,
            stored_size: image.size(),
            image,
            mipmaps,
            state: SamplingState::default(),
        }
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Source identifier used in diagnostics, usually the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gpu_texture(&self) -> Option<B::Texture> {
        self.gl_tex
    }

    pub fn size(&self) -> UVec2 {
        self.image.size()
    }

    /// Allocated size, larger than [`Texture::size`] when padded to powers of two.
    pub fn stored_size(&self) -> UVec2 {
        self.stored_size
    }

    /// Texture coordinate of the image's bottom-right corner within the
    /// stored texture.
    pub fn uv_scale(&self) -> Vec2 {
        self.size().as_vec2() / self.stored_size.max(UVec2::ONE).as_vec2()
    }

    pub fn format(&self) -> PixelFormat {
        self.image.format()
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn has_mipmaps(&self) -> bool {
        self.mipmaps
    }

    pub fn sampling_state(&self) -> SamplingState {
        self.state
    }

    /// Replaces the source pixels. The next [`Texture::upload`] sends them to
    /// the GPU.
    pub fn set_image(&mut self, image: PixelBuffer) {
        self.image = image;
    }

    pub fn create(&mut self, ctx: &mut RenderContext<B>) -> Result<(), TextureError> {
        assert!(self.gl_tex.is_none(), "leaking OpenGL texture {}", self.name);

        let tex = ctx.backend.create_texture().map_err(|reason| {
            log::error!("Failed to create texture {}: {}", self.name, reason);
            TextureError::Allocation(reason)
        })?;
        self.gl_tex = Some(tex);

        // A fresh texture object starts in the default GL state.
        self.state = SamplingState::default();

        check_gl(&mut ctx.backend, "texture create");
        log::debug!("Created texture {} ({:?})", self.name, tex);
        Ok(())
    }

    pub fn upload(&mut self, ctx: &mut RenderContext<B>) -> Result<(), TextureError> {
        let Some(tex) = self.gl_tex else {
            panic!("uploading texture {} without a GL handle", self.name);
        };

        let gl = pixel_format::gl_format(self.image.format());
        let size = self.image.size();
        let caps = *ctx.capabilities();

        if ctx.enforces_max_texture_size() {
            let needed = if self.mipmaps { size } else { caps.stored_size(size) };
            if needed.max_element() > caps.max_texture_size {
                log::error!(
                    "Texture {} needs {}x{} texels, the driver allows {}",
                    self.name,
                    needed.x,
                    needed.y,
                    caps.max_texture_size
                );
                return Err(TextureError::ExceedsMaxSize {
                    width: needed.x,
                    height: needed.y,
                    max: caps.max_texture_size,
                });
            }
        }

        ctx.bind_texture(0, self.handle, tex);
        ctx.backend.set_unpack_alignment(1);

        if self.mipmaps {
            match ctx
                .backend
                .build_mipmaps(gl.internal, size, gl.format, self.image.data())
            {
                Ok(()) => {
                    // glGenerateMipmap works on the unpadded image, nothing is rescaled.
                    self.stored_size = size;
                }
                Err(code) => {
                    log::warn!(
                        "Failed to generate mipmaps for {}: {} = {}",
                        self.name,
                        code,
                        error_string(code)
                    );
                    self.mipmaps = false;
                }
            }
        }

        if !self.mipmaps {
            self.stored_size = caps.stored_size(size);
            log::trace!(
                "Uploading {} as {}x{} (stored {}x{})",
                self.name,
                size.x,
                size.y,
                self.stored_size.x,
                self.stored_size.y
            );

            if self.stored_size != size {
                ctx.backend
                    .tex_image_2d(gl.internal, self.stored_size, gl.format, None);
                ctx.backend
                    .tex_sub_image_2d(UVec2::ZERO, size, gl.format, self.image.data());
            } else {
                ctx.backend
                    .tex_image_2d(gl.internal, size, gl.format, Some(self.image.data()));
            }
        }

        if caps.has_anisotropy() {
            ctx.backend
                .tex_parameter_f32(glow::TEXTURE_MAX_ANISOTROPY, caps.max_anisotropy);
        }

        check_gl(&mut ctx.backend, "texture upload");
        Ok(())
    }

    /// Releases the GL object and removes this texture from every stage.
    /// Calling it again is harmless.
    pub fn destroy(&mut self, ctx: &mut RenderContext<B>) {
        if let Some(tex) = self.gl_tex.take() {
            ctx.backend.delete_texture(tex);
            check_gl(&mut ctx.backend, "texture destroy");
            log::debug!("Destroyed texture {} ({:?})", self.name, tex);
        }

        ctx.unbind_texture_everywhere(self.handle);
    }

    /// Rebuilds the GL object from the retained pixels.
    pub fn restore(&mut self, ctx: &mut RenderContext<B>) -> Result<(), TextureError> {
        self.destroy(ctx);
        self.create(ctx)?;
        self.upload(ctx)
    }

    /// Brings the GL sampling parameters of this texture in line with what
    /// `stage` requests. The texture must already be bound to that stage's
    /// unit and the unit must be active. Only parameters that differ are
    /// written.
    pub fn apply(&mut self, stage: usize, ctx: &mut RenderContext<B>) {
        let active_unit = ctx.active_unit();
        let stage = ctx.texture_stage(stage);
        assert_eq!(
            stage.texture(),
            Some(self.handle),
            "texture {} applied to stage {} which does not use it",
            self.name,
            stage.index()
        );
        assert_eq!(
            stage.current(),
            Some(self.handle),
            "texture {} is not bound to stage {}",
            self.name,
            stage.index()
        );
        assert_eq!(
            active_unit,
            stage.index(),
            "texture {} applied to stage {} while unit {} is active",
            self.name,
            stage.index(),
            active_unit
        );
        let requested = stage.requested();
        let backend = &mut ctx.backend;
        let mut changed = false;

        if requested.wrap_mode != self.state.wrap_mode {
            self.state.wrap_mode = requested.wrap_mode;
            let wrap = sampling::gl_wrap_mode(self.state.wrap_mode);
            backend.tex_parameter_i32(glow::TEXTURE_WRAP_T, wrap);
            backend.tex_parameter_i32(glow::TEXTURE_WRAP_S, wrap);
            changed = true;
        }

        let mip_filter = if self.mipmaps {
            requested.mip_filter
        } else {
            FilterMode::None
        };

        if mip_filter != self.state.mip_filter || requested.min_filter != self.state.min_filter {
            self.state.mip_filter = mip_filter;
            self.state.min_filter = requested.min_filter;
            let Some(filter) = sampling::gl_filter(mip_filter, requested.min_filter) else {
                panic!("texture {} has no min filter", self.name);
            };
            backend.tex_parameter_i32(glow::TEXTURE_MIN_FILTER, filter);
            changed = true;
        }

        if requested.mag_filter != self.state.mag_filter {
            self.state.mag_filter = requested.mag_filter;
            let Some(filter) = sampling::gl_filter(FilterMode::None, requested.mag_filter) else {
                panic!("texture {} has no mag filter", self.name);
            };
            backend.tex_parameter_i32(glow::TEXTURE_MAG_FILTER, filter);
            changed = true;
        }

        if changed {
            check_gl(backend, "texture apply");
        }
    }
}

impl<B: GraphicsBackend> Drop for Texture<B> {
    fn drop(&mut self) {
        if let Some(tex) = self.gl_tex {
            log::warn!("Leaking OpenGL texture {} ({:?})", self.name, tex);
        }
    }
}
