// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! OpenGL texture resources for a fixed-function style renderer: texture
//! lifetime, pixel format translation, mipmap and power-of-two handling, and
//! lazily diffed sampling state per texture stage.

pub mod capabilities;
pub mod error;
pub mod gl_check;
pub mod handles;
pub mod null_backend;
pub mod pixel_buffer;
pub mod pixel_format;
pub mod renderer;
pub mod renderer_backends;
pub mod sampling;
pub mod settings;
pub mod texture;
pub mod texture_resource_manager;
pub mod texture_stage;

#[cfg(test)]
mod test_logger;

pub use capabilities::Capabilities;
pub use error::TextureError;
pub use handles::TextureHandle;
pub use null_backend::NullBackend;
pub use pixel_buffer::PixelBuffer;
pub use pixel_format::{GlFormat, PixelFormat};
pub use renderer::{RenderContext, Renderer};
pub use renderer_backends::{GlowBackend, GraphicsBackend};
pub use sampling::{FilterMode, SamplingState, WrapMode};
pub use settings::{Settings, SettingsError, TextureSettings};
pub use texture::Texture;
pub use texture_resource_manager::TextureResource;
pub use texture_stage::TextureStage;
