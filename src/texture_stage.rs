use crate::handles::TextureHandle;
use crate::sampling::{FilterMode, SamplingState, WrapMode};

/// One texture unit: the sampling configuration draw code asks for, the
/// texture it wants there, and the texture actually bound in hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureStage {
    index: u32,
    requested: SamplingState,
    texture: Option<TextureHandle>,
    current: Option<TextureHandle>,
}

impl TextureStage {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            requested: SamplingState {
                wrap_mode: WrapMode::Repeat,
                min_filter: FilterMode::Linear,
                mag_filter: FilterMode::Linear,
                mip_filter: FilterMode::Linear,
            },
            texture: None,
            current: None,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn requested(&self) -> SamplingState {
        self.requested
    }

    /// Texture draw code wants sampled from this unit.
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Texture bound to this unit in hardware.
    pub fn current(&self) -> Option<TextureHandle> {
        self.current
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    pub(crate) fn set_current(&mut self, texture: Option<TextureHandle>) {
        self.current = texture;
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.requested.wrap_mode = mode;
    }

    pub fn set_min_filter(&mut self, filter: FilterMode) {
        self.requested.min_filter = filter;
    }

    pub fn set_mag_filter(&mut self, filter: FilterMode) {
        self.requested.mag_filter = filter;
    }

    pub fn set_mip_filter(&mut self, filter: FilterMode) {
        self.requested.mip_filter = filter;
    }

    /// Drops every reference to `texture`. Returns whether one was found.
    pub(crate) fn forget(&mut self, texture: TextureHandle) -> bool {
        let mut found = false;
        if self.texture == Some(texture) {
            self.texture = None;
            found = true;
        }
        if self.current == Some(texture) {
            self.current = None;
            found = true;
        }
        found
    }
}
