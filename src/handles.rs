use slotmap::new_key_type;

new_key_type! {
    /// Identifies a texture inside a [`crate::TextureResource`]. Stages refer to
    /// textures through this key, never through the texture itself.
    pub struct TextureHandle;
}
