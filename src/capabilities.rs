use std::collections::HashSet;

use glam::UVec2;

/// What the driver lets textures do. Read once when the render context is
/// built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capabilities {
    pub npot_supported: bool,
    /// 1.0 when anisotropic filtering is unavailable.
    pub max_anisotropy: f32,
    pub max_texture_size: u32,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            npot_supported: true,
            max_anisotropy: 1.0,
            max_texture_size: 2048,
        }
    }
}

impl Capabilities {
    /// Storage needed for a `size` texture without mipmaps: unchanged when NPOT
    /// textures are supported, otherwise rounded up to powers of two.
    pub fn stored_size(&self, size: UVec2) -> UVec2 {
        if self.npot_supported {
            size
        } else {
            UVec2::new(size.x.next_power_of_two(), size.y.next_power_of_two())
        }
    }

    pub fn has_anisotropy(&self) -> bool {
        self.max_anisotropy > 1.0
    }
}

pub fn supports_npot(major: u32, minor: u32, embedded: bool, extensions: &HashSet<String>) -> bool {
    let core = if embedded {
        major >= 3
    } else {
        (major, minor) >= (2, 0)
    };
    core || extensions.contains("GL_ARB_texture_non_power_of_two")
        || extensions.contains("GL_OES_texture_npot")
}

pub fn supports_anisotropy(extensions: &HashSet<String>) -> bool {
    extensions.contains("GL_EXT_texture_filter_anisotropic")
        || extensions.contains("GL_ARB_texture_filter_anisotropic")
}
