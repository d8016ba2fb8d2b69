#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    #[default]
    Repeat,
    Mirror,
    Clamp,
}

impl WrapMode {
    pub const ALL: [WrapMode; 3] = [WrapMode::Repeat, WrapMode::Mirror, WrapMode::Clamp];
}

/// `None` is only meaningful for the mipmap component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    None,
    Nearest,
    Linear,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::None, FilterMode::Nearest, FilterMode::Linear];
}

/// Wrap and filter configuration of a texture or a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplingState {
    pub wrap_mode: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub mip_filter: FilterMode,
}

impl Default for SamplingState {
    /// The state OpenGL gives a freshly generated texture object.
    fn default() -> Self {
        Self {
            wrap_mode: WrapMode::Repeat,
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Linear,
            mip_filter: FilterMode::Linear,
        }
    }
}

pub fn gl_wrap_mode(mode: WrapMode) -> i32 {
    let wrap = match mode {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::Mirror => glow::MIRRORED_REPEAT,
        WrapMode::Clamp => glow::CLAMP_TO_EDGE,
    };
    wrap as i32
}

/// Combined GL filter for a `[mip][filter]` pair. A `None` filter has no GL
/// equivalent.
pub fn gl_filter(mip: FilterMode, filter: FilterMode) -> Option<i32> {
    let code = match (mip, filter) {
        (_, FilterMode::None) => return None,
        (FilterMode::None, FilterMode::Nearest) => glow::NEAREST,
        (FilterMode::None, FilterMode::Linear) => glow::LINEAR,
        (FilterMode::Nearest, FilterMode::Nearest) => glow::NEAREST_MIPMAP_NEAREST,
        (FilterMode::Nearest, FilterMode::Linear) => glow::LINEAR_MIPMAP_NEAREST,
        (FilterMode::Linear, FilterMode::Nearest) => glow::NEAREST_MIPMAP_LINEAR,
        (FilterMode::Linear, FilterMode::Linear) => glow::LINEAR_MIPMAP_LINEAR,
    };
    Some(code as i32)
}
