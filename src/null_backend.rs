use std::collections::{BTreeSet, HashMap};

use glam::UVec2;

use crate::capabilities::Capabilities;
use crate::renderer_backends::GraphicsBackend;

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NullTexture(pub u32);

/// A backend call as seen by [`NullBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateTexture(NullTexture),
    DeleteTexture(NullTexture),
    ActiveTexture(u32),
    BindTexture(Option<NullTexture>),
    UnpackAlignment(i32),
    TexImage2D {
        internal: i32,
        size: UVec2,
        format: u32,
        with_data: bool,
    },
    TexSubImage2D {
        offset: UVec2,
        size: UVec2,
        format: u32,
    },
    BuildMipmaps {
        internal: i32,
        size: UVec2,
        format: u32,
    },
    TexParameterI32 {
        parameter: u32,
        value: i32,
    },
    TexParameterF32 {
        parameter: u32,
        value: f32,
    },
}

/// Headless backend that records every call instead of talking to a driver.
/// Failures can be scripted to exercise the error paths.
#[derive(Debug, Default)]
pub struct NullBackend {
    pub capabilities: Capabilities,
    pub calls: Vec<BackendCall>,
    /// When set, `create_texture` fails with this reason.
    pub fail_create: Option<String>,
    /// When set, `build_mipmaps` fails with this GL error code.
    pub fail_mipmaps: Option<u32>,
    pending_errors: Vec<u32>,
    next_texture: u32,
    active_unit: u32,
    live: BTreeSet<NullTexture>,
    bound: HashMap<u32, NullTexture>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Queues an error for the next `get_error` calls to report.
    pub fn push_error(&mut self, code: u32) {
        self.pending_errors.push(code);
    }

    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, texture: NullTexture) -> bool {
        self.live.contains(&texture)
    }

    pub fn active_unit(&self) -> u32 {
        self.active_unit
    }

    pub fn bound_texture(&self, unit: u32) -> Option<NullTexture> {
        self.bound.get(&unit).copied()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn parameter_calls(&self) -> impl Iterator<Item = &BackendCall> {
        self.calls.iter().filter(|call| {
            matches!(
                call,
                BackendCall::TexParameterI32 { .. } | BackendCall::TexParameterF32 { .. }
            )
        })
    }

    /// Last value written to `parameter` through `tex_parameter_i32`.
    pub fn last_parameter_i32(&self, parameter: u32) -> Option<i32> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::TexParameterI32 {
                parameter: p,
                value,
            } if *p == parameter => Some(*value),
            _ => None,
        })
    }
}

impl GraphicsBackend for NullBackend {
    type Texture = NullTexture;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn create_texture(&mut self) -> Result<Self::Texture, String> {
        if let Some(reason) = &self.fail_create {
            return Err(reason.clone());
        }
        self.next_texture += 1;
        let texture = NullTexture(self.next_texture);
        self.live.insert(texture);
        self.calls.push(BackendCall::CreateTexture(texture));
        Ok(texture)
    }

    fn delete_texture(&mut self, texture: Self::Texture) {
        if !self.live.remove(&texture) {
            self.pending_errors.push(glow::INVALID_VALUE);
        }
        self.bound.retain(|_, bound| *bound != texture);
        self.calls.push(BackendCall::DeleteTexture(texture));
    }

    fn active_texture(&mut self, unit: u32) {
        self.active_unit = unit;
        self.calls.push(BackendCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture: Option<Self::Texture>) {
        match texture {
            Some(texture) => {
                self.bound.insert(self.active_unit, texture);
            }
            None => {
                self.bound.remove(&self.active_unit);
            }
        }
        self.calls.push(BackendCall::BindTexture(texture));
    }

    fn set_unpack_alignment(&mut self, alignment: i32) {
        self.calls.push(BackendCall::UnpackAlignment(alignment));
    }

    fn tex_image_2d(&mut self, internal: i32, size: UVec2, format: u32, pixels: Option<&[u8]>) {
        self.calls.push(BackendCall::TexImage2D {
            internal,
            size,
            format,
            with_data: pixels.is_some(),
        });
    }

    fn tex_sub_image_2d(&mut self, offset: UVec2, size: UVec2, format: u32, _pixels: &[u8]) {
        self.calls.push(BackendCall::TexSubImage2D {
            offset,
            size,
            format,
        });
    }

    fn build_mipmaps(
        &mut self,
        internal: i32,
        size: UVec2,
        format: u32,
        _pixels: &[u8],
    ) -> Result<(), u32> {
        self.calls.push(BackendCall::BuildMipmaps {
            internal,
            size,
            format,
        });
        match self.fail_mipmaps {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn tex_parameter_i32(&mut self, parameter: u32, value: i32) {
        self.calls
            .push(BackendCall::TexParameterI32 { parameter, value });
    }

    fn tex_parameter_f32(&mut self, parameter: u32, value: f32) {
        self.calls
            .push(BackendCall::TexParameterF32 { parameter, value });
    }

    fn get_error(&mut self) -> u32 {
        if self.pending_errors.is_empty() {
            glow::NO_ERROR
        } else {
            self.pending_errors.remove(0)
        }
    }
}
