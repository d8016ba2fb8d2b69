use std::path::Path;

use crate::capabilities::Capabilities;
use crate::error::TextureError;
use crate::handles::TextureHandle;
use crate::pixel_buffer::PixelBuffer;
use crate::renderer_backends::GraphicsBackend;
use crate::settings::{Settings, TextureSettings};
use crate::texture::Texture;
use crate::texture_resource_manager::TextureResource;
use crate::texture_stage::TextureStage;

/// Backend, driver capabilities and the texture stage table. Textures borrow
/// this for every lifecycle call instead of reaching for global state.
pub struct RenderContext<B: GraphicsBackend> {
    pub(crate) backend: B,
    capabilities: Capabilities,
    stages: Vec<TextureStage>,
    active_unit: u32,
    enforce_max_texture_size: bool,
}

impl<B: GraphicsBackend> RenderContext<B> {
    pub fn new(backend: B, stage_count: usize) -> Self {
        assert!(stage_count > 0, "a render context needs at least one texture stage");
        let capabilities = backend.capabilities();
        log::debug!(
            "Texture capabilities: npot={}, max anisotropy={}, max size={}",
            capabilities.npot_supported,
            capabilities.max_anisotropy,
            capabilities.max_texture_size
        );
        let mut backend = backend;
        backend.active_texture(0);
        Self {
            backend,
            capabilities,
            stages: (0..stage_count as u32).map(TextureStage::new).collect(),
            active_unit: 0,
            enforce_max_texture_size: false,
        }
    }

    pub fn with_settings(backend: B, settings: &TextureSettings) -> Self {
        let mut ctx = Self::new(backend, settings.stage_count);
        ctx.enforce_max_texture_size = settings.enforce_max_texture_size;
        ctx
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn max_anisotropy(&self) -> f32 {
        self.capabilities.max_anisotropy
    }

    pub fn supports_npot(&self) -> bool {
        self.capabilities.npot_supported
    }

    pub fn enforces_max_texture_size(&self) -> bool {
        self.enforce_max_texture_size
    }

    pub fn set_enforce_max_texture_size(&mut self, enforce: bool) {
        self.enforce_max_texture_size = enforce;
    }

    pub fn texture_stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn texture_stage(&self, index: usize) -> &TextureStage {
        &self.stages[index]
    }

    pub fn texture_stage_mut(&mut self, index: usize) -> &mut TextureStage {
        &mut self.stages[index]
    }

    pub fn texture_stages(&self) -> impl Iterator<Item = &TextureStage> {
        self.stages.iter()
    }

    /// Unit that texture parameter calls currently act on.
    pub(crate) fn active_unit(&self) -> u32 {
        self.active_unit
    }

    fn set_active_unit(&mut self, unit: u32) {
        if self.active_unit != unit {
            self.backend.active_texture(unit);
            self.active_unit = unit;
        }
    }

    /// Binds `gpu` on `unit` and records `texture` as that stage's current one.
    pub(crate) fn bind_texture(&mut self, unit: usize, texture: TextureHandle, gpu: B::Texture) {
        self.set_active_unit(unit as u32);
        self.backend.bind_texture(Some(gpu));
        self.stages[unit].set_current(Some(texture));
    }

    /// Removes every stage reference to `texture`, returning how many stages
    /// pointed at it.
    pub(crate) fn unbind_texture_everywhere(&mut self, texture: TextureHandle) -> usize {
        self.stages
            .iter_mut()
            .map(|stage| stage.forget(texture))
            .filter(|&found| found)
            .count()
    }
}

/// Owns the render context together with every texture created through it.
/// Dropping the renderer destroys all remaining textures.
pub struct Renderer<B: GraphicsBackend> {
    context: RenderContext<B>,
    textures: TextureResource<B>,
    generate_mipmaps: bool,
}

impl<B: GraphicsBackend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, &Settings::default())
    }

    pub fn with_settings(backend: B, settings: &Settings) -> Self {
        Self {
            context: RenderContext::with_settings(backend, &settings.textures),
            textures: TextureResource::default(),
            generate_mipmaps: settings.textures.generate_mipmaps,
        }
    }

    pub fn context(&self) -> &RenderContext<B> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext<B> {
        &mut self.context
    }

    pub fn textures(&self) -> &TextureResource<B> {
        &self.textures
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture<B>> {
        self.textures.get_texture(handle)
    }

    pub fn texture_stage_mut(&mut self, index: usize) -> &mut TextureStage {
        self.context.texture_stage_mut(index)
    }

    /// Creates and uploads a texture, with mipmaps if the settings ask for them.
    pub fn create_texture(
        &mut self,
        name: &str,
        image: PixelBuffer,
    ) -> Result<TextureHandle, TextureError> {
        self.textures
            .create_texture(&mut self.context, name, image, self.generate_mipmaps)
    }

    pub fn create_texture_with_mipmaps(
        &mut self,
        name: &str,
        image: PixelBuffer,
        mipmaps: bool,
    ) -> Result<TextureHandle, TextureError> {
        self.textures
            .create_texture(&mut self.context, name, image, mipmaps)
    }

    pub fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, TextureError> {
        self.textures
            .load_from_file(&mut self.context, path, self.generate_mipmaps)
    }

    /// Replaces a texture's pixels and uploads them.
    pub fn update_texture(
        &mut self,
        handle: TextureHandle,
        image: PixelBuffer,
    ) -> Result<(), TextureError> {
        let texture = self
            .textures
            .get_texture_mut(handle)
            .ok_or(TextureError::UnknownTexture(handle))?;
        texture.set_image(image);
        texture.upload(&mut self.context)
    }

    /// Releases the GPU side of a texture but keeps it registered so it can be
    /// created again.
    pub fn destroy_texture(&mut self, handle: TextureHandle) -> Result<(), TextureError> {
        let texture = self
            .textures
            .get_texture_mut(handle)
            .ok_or(TextureError::UnknownTexture(handle))?;
        texture.destroy(&mut self.context);
        Ok(())
    }

    pub fn remove_texture(&mut self, handle: TextureHandle) -> bool {
        self.textures.remove_texture(&mut self.context, handle)
    }

    /// Recreates every texture after a context loss. Stage requests survive
    /// for textures that came back, hardware bindings do not.
    pub fn restore_textures(&mut self) -> Result<(), TextureError> {
        let requests: Vec<_> = self
            .context
            .texture_stages()
            .map(TextureStage::texture)
            .collect();
        let result = self.textures.restore_all(&mut self.context);

        for (index, request) in requests.into_iter().enumerate() {
            let restored = request.filter(|&handle| {
                self.textures
                    .get_texture(handle)
                    .is_some_and(|texture| texture.gpu_texture().is_some())
            });
            self.context.texture_stage_mut(index).set_texture(restored);
        }
        result
    }

    /// Requests `texture` on stage `index`. Takes effect on the next
    /// [`Renderer::apply_stage`].
    pub fn set_stage_texture(&mut self, index: usize, texture: Option<TextureHandle>) {
        self.context.texture_stage_mut(index).set_texture(texture);
    }

    /// Binds the texture requested on stage `index` if it is not bound yet and
    /// brings its sampling parameters in line with the stage.
    pub fn apply_stage(&mut self, index: usize) -> Result<(), TextureError> {
        let stage = self.context.texture_stage(index);
        let requested = stage.texture();

        let Some(handle) = requested else {
            if stage.current().is_some() {
                self.context.set_active_unit(index as u32);
                self.context.backend.bind_texture(None);
                self.context.stages[index].set_current(None);
            }
            return Ok(());
        };

        let texture = self
            .textures
            .get_texture_mut(handle)
            .ok_or(TextureError::UnknownTexture(handle))?;
        let Some(gpu) = texture.gpu_texture() else {
            panic!("stage {index} requests texture {} which has no GL handle", texture.name());
        };

        if self.context.texture_stage(index).current() != Some(handle) {
            self.context.bind_texture(index, handle, gpu);
        } else {
            self.context.set_active_unit(index as u32);
        }
        texture.apply(index, &mut self.context);
        Ok(())
    }
}

impl<B: GraphicsBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.textures.clear(&mut self.context);
    }
}
