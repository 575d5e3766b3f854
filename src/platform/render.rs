//! Render collaborator: draw-call descriptions
//!
//! Camera setup, lighting and materials live in the host renderer. The core
//! describes what to draw and where.

use glam::{Vec2, Vec3};

use super::assets::{SceneHandle, TextureHandle};

/// Packed ABGR colour
pub type Color = u32;

pub const WHITE: Color = 0xffff_ffff;
/// Selected menu entry
pub const HIGHLIGHT: Color = 0xff02_5aad;

/// Depth used for 2D overlay text and sprites
pub const OVERLAY_DEPTH: f32 = -0.99;
/// Depth used for full-screen backgrounds
pub const BACKGROUND_DEPTH: f32 = 1.0;

/// Text anchoring relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    Left,
    #[default]
    Centre,
    Right,
}

/// Material override for a mesh draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Red,
    Green,
}

/// Geometry for a mesh draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mesh {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    /// First mesh of a loaded scene file
    Scene(SceneHandle),
}

/// A textured 3D mesh placed on the table plane
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDraw {
    pub mesh: Mesh,
    pub position: Vec2,
    pub angle: f32,
    pub material: Option<Material>,
}

/// A screen-space sprite, centred on `position`
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture: Option<TextureHandle>,
    pub position: Vec3,
    pub size: Vec2,
}

impl SpriteDraw {
    pub fn new(texture: Option<TextureHandle>, position: Vec2, size: Vec2) -> Self {
        Self {
            texture,
            position: position.extend(OVERLAY_DEPTH),
            size,
        }
    }
}

/// A string of text in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    pub position: Vec3,
    pub scale: f32,
    pub color: Color,
    pub justify: Justify,
}

impl TextDraw {
    /// White, centred, unit-scale overlay text
    pub fn new(text: impl Into<String>, position: Vec2) -> Self {
        Self {
            text: text.into(),
            position: position.extend(OVERLAY_DEPTH),
            scale: 1.0,
            color: WHITE,
            justify: Justify::Centre,
        }
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn depth(mut self, z: f32) -> Self {
        self.position.z = z;
        self
    }
}

pub trait Renderer {
    fn begin_frame(&mut self);
    fn draw_mesh(&mut self, draw: MeshDraw);
    fn draw_sprite(&mut self, sprite: SpriteDraw);
    fn draw_text(&mut self, text: TextDraw);
    fn end_frame(&mut self);
}
