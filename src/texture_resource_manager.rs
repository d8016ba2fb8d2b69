use slotmap::SlotMap;
use std::path::Path;

use crate::error::TextureError;
use crate::handles::TextureHandle;
use crate::pixel_buffer::PixelBuffer;
use crate::renderer::RenderContext;
use crate::renderer_backends::GraphicsBackend;
use crate::texture::Texture;

pub struct TextureResource<B: GraphicsBackend> {
    pub textures: SlotMap<TextureHandle, Texture<B>>,
}

impl<B: GraphicsBackend> Default for TextureResource<B> {
    fn default() -> Self {
        Self {
            textures: SlotMap::with_key(),
        }
    }
}

impl<B: GraphicsBackend> TextureResource<B> {
    /// Registers a texture without touching the GPU.
    pub fn add_texture(&mut self, name: &str, image: PixelBuffer, mipmaps: bool) -> TextureHandle {
        self.textures
            .insert_with_key(|handle| Texture::new(handle, name, image, mipmaps))
    }

    /// Registers, creates and uploads a texture. Nothing stays registered if
    /// any step fails.
    pub fn create_texture(
        &mut self,
        ctx: &mut RenderContext<B>,
        name: &str,
        image: PixelBuffer,
        mipmaps: bool,
    ) -> Result<TextureHandle, TextureError> {
        let handle = self.add_texture(name, image, mipmaps);
        let texture = &mut self.textures[handle];

        let result = texture.create(ctx).and_then(|()| texture.upload(ctx));
        if let Err(err) = result {
            self.remove_texture(ctx, handle);
            return Err(err);
        }
        Ok(handle)
    }

    pub fn load_from_file(
        &mut self,
        ctx: &mut RenderContext<B>,
        path: &Path,
        mipmaps: bool,
    ) -> Result<TextureHandle, TextureError> {
        let image = PixelBuffer::load_from_file(path)?;
        self.create_texture(ctx, &path.display().to_string(), image, mipmaps)
    }

    pub fn create_solid_rgba(
        &mut self,
        ctx: &mut RenderContext<B>,
        rgba: [u8; 4],
    ) -> Result<TextureHandle, TextureError> {
        let name = format!(
            "solid #{:02x}{:02x}{:02x}{:02x}",
            rgba[0], rgba[1], rgba[2], rgba[3]
        );
        self.create_texture(ctx, &name, PixelBuffer::solid_rgba(rgba), false)
    }

    pub fn get_texture(&self, handle: TextureHandle) -> Option<&Texture<B>> {
        self.textures.get(handle)
    }

    pub fn get_texture_mut(&mut self, handle: TextureHandle) -> Option<&mut Texture<B>> {
        self.textures.get_mut(handle)
    }

    /// Destroys and unregisters a texture. Returns false for unknown handles.
    pub fn remove_texture(&mut self, ctx: &mut RenderContext<B>, handle: TextureHandle) -> bool {
        match self.textures.remove(handle) {
            Some(mut texture) => {
                texture.destroy(ctx);
                true
            }
            None => false,
        }
    }

    /// Recreates every texture from its retained pixels, e.g. after the GL
    /// context was lost.
    pub fn restore_all(&mut self, ctx: &mut RenderContext<B>) -> Result<(), TextureError> {
        for texture in self.textures.values_mut() {
            texture.restore(ctx)?;
        }
        Ok(())
    }

    /// Releases the GPU side of every texture, keeping them registered.
    pub fn destroy_all(&mut self, ctx: &mut RenderContext<B>) {
        for texture in self.textures.values_mut() {
            texture.destroy(ctx);
        }
    }

    pub fn clear(&mut self, ctx: &mut RenderContext<B>) {
        self.destroy_all(ctx);
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = TextureHandle> {
        self.textures.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_backend::NullBackend;
    use crate::pixel_format::PixelFormat;
    use glam::UVec2;
    use image::{ImageBuffer, Rgb};

    fn context() -> RenderContext<NullBackend> {
        RenderContext::new(NullBackend::new(), 4)
    }

    #[test]
    fn test_add_texture_does_not_touch_gpu() {
        let mut ctx = context();
        let mut textures = TextureResource::default();
        let handle = textures.add_texture("pending", PixelBuffer::solid_rgba([1, 2, 3, 4]), false);

        let texture = textures.get_texture(handle).unwrap();
        assert_eq!(texture.handle(), handle);
        assert!(texture.gpu_texture().is_none());
        assert_eq!(ctx.backend().live_textures(), 0);
        textures.clear(&mut ctx);
    }

    #[test]
    fn test_create_solid_rgba() {
        let mut ctx = context();
        let mut textures = TextureResource::default();
        let handle = textures.create_solid_rgba(&mut ctx, [128, 128, 255, 255]).unwrap();

        let texture = textures.get_texture(handle).unwrap();
        assert_eq!(texture.size(), UVec2::ONE);
        assert_eq!(texture.name(), "solid #8080ffff");
        assert!(texture.gpu_texture().is_some());
        assert_eq!(textures.len(), 1);
        textures.clear(&mut ctx);
        assert!(textures.is_empty());
        assert_eq!(ctx.backend().live_textures(), 0);
    }

    #[test]
    fn test_failed_create_leaves_nothing_registered() {
        let mut ctx = context();
        ctx.backend_mut().fail_create = Some("denied".into());
        let mut textures = TextureResource::default();

        let result = textures.create_solid_rgba(&mut ctx, [0, 0, 0, 0]);
        assert!(matches!(result, Err(TextureError::Allocation(_))));
        assert!(textures.is_empty());
    }

    #[test]
    fn test_rejected_upload_releases_gpu_object() {
        let mut ctx = context();
        ctx.set_enforce_max_texture_size(true);
        let mut textures = TextureResource::default();

        let wide = PixelBuffer::new(4096, 1, PixelFormat::A8, vec![0; 4096]).unwrap();
        let result = textures.create_texture(&mut ctx, "wide", wide, false);
        assert!(matches!(result, Err(TextureError::ExceedsMaxSize { .. })));
        assert!(textures.is_empty());
        assert_eq!(ctx.backend().live_textures(), 0);
    }

    #[test]
    fn test_remove_texture_scrubs_stages() {
        let mut ctx = context();
        let mut textures = TextureResource::default();
        let handle = textures.create_solid_rgba(&mut ctx, [9, 9, 9, 9]).unwrap();
        ctx.texture_stage_mut(2).set_texture(Some(handle));

        assert!(textures.remove_texture(&mut ctx, handle));
        assert_eq!(ctx.texture_stage(0).current(), None);
        assert_eq!(ctx.texture_stage(2).texture(), None);
        assert!(textures.get_texture(handle).is_none());
        assert!(!textures.remove_texture(&mut ctx, handle));
    }

    #[test]
    fn test_destroy_all_keeps_entries() {
        let mut ctx = context();
        let mut textures = TextureResource::default();
        let a = textures.create_solid_rgba(&mut ctx, [1, 1, 1, 1]).unwrap();
        let b = textures.create_solid_rgba(&mut ctx, [2, 2, 2, 2]).unwrap();

        textures.destroy_all(&mut ctx);
        assert_eq!(ctx.backend().live_textures(), 0);
        let mut handles: Vec<_> = textures.handles().collect();
        handles.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(handles, expected);

        textures.restore_all(&mut ctx).unwrap();
        assert_eq!(ctx.backend().live_textures(), 2);
        textures.clear(&mut ctx);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(3, 5, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, 0]));
        img.save(&path).unwrap();

        let mut ctx = context();
        let mut textures = TextureResource::default();
        let handle = textures.load_from_file(&mut ctx, &path, true).unwrap();

        let texture = textures.get_texture(handle).unwrap();
        assert_eq!(texture.size(), UVec2::new(3, 5));
        assert_eq!(texture.format(), PixelFormat::R8G8B8);
        assert!(texture.name().ends_with("checker.png"));
        assert!(texture.has_mipmaps());
        textures.clear(&mut ctx);
    }

    #[test]
    fn test_load_missing_file_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context();
        let mut textures = TextureResource::default();
        let result = textures.load_from_file(&mut ctx, &dir.path().join("nope.png"), true);
        assert!(matches!(result, Err(TextureError::Image(_))));
        assert!(textures.is_empty());
    }
}
