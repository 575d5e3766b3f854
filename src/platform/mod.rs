//! Platform abstraction layer
//!
//! The core never owns a window, GPU or sound device. It drives these
//! collaborators instead:
//! - Rendering (meshes, sprites, text)
//! - Audio (samples, music, volumes)
//! - Asset loading (textures, scenes, fonts)
//! - Input (buttons pressed/released this frame)

pub mod assets;
pub mod audio;
pub mod headless;
pub mod input;
pub mod render;

pub use assets::{AssetLoader, FontHandle, SceneHandle, TextureHandle, TextureSlot};
pub use audio::{AudioOutput, SampleId};
pub use headless::{Call, DrawCall, HeadlessPlatform};
pub use input::{Button, ButtonTracker, Buttons, InputFrame};
pub use render::{Justify, Material, Mesh, MeshDraw, Renderer, SpriteDraw, TextDraw};

/// Everything the game loop needs from its host
pub trait Platform: Renderer + AudioOutput + AssetLoader {
    /// Backbuffer width in pixels
    fn width(&self) -> f32;
    /// Backbuffer height in pixels
    fn height(&self) -> f32;
}
