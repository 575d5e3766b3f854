//! Headless platform
//!
//! Implements every collaborator without a window or sound device. Asset and
//! audio calls are recorded in order, and the draw calls of the most recent
//! frame are kept so callers can inspect what would have been shown.

use std::collections::HashSet;

use super::Platform;
use super::assets::{AssetLoader, FontHandle, SceneHandle, TextureHandle};
use super::audio::{AudioOutput, SampleId};
use super::render::{MeshDraw, Renderer, SpriteDraw, TextDraw};

/// A recorded asset or audio call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadTexture(String),
    FreeTexture(TextureHandle),
    LoadScene(String),
    FreeScene(SceneHandle),
    LoadFont(String),
    FreeFont(FontHandle),
    LoadSample(String),
    PlaySample(SampleId),
    LoadMusic(String),
    PlayMusic,
    StopMusic,
    UnloadMusic,
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Mesh(MeshDraw),
    Sprite(SpriteDraw),
    Text(TextDraw),
}

#[derive(Debug)]
pub struct HeadlessPlatform {
    width: f32,
    height: f32,
    next_handle: u32,
    missing: HashSet<String>,
    calls: Vec<Call>,
    frame: Vec<DrawCall>,
    frames_drawn: u64,
    sample_volume: u8,
    music_volume: u8,
}

impl HeadlessPlatform {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            next_handle: 1,
            missing: HashSet::new(),
            calls: Vec::new(),
            frame: Vec::new(),
            frames_drawn: 0,
            sample_volume: 100,
            music_volume: 100,
        }
    }

    /// Treat `path` as absent: loads of it fail
    pub fn with_missing(mut self, path: &str) -> Self {
        self.missing.insert(path.to_string());
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Draw calls of the last frame (or the one in progress)
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.frame
    }

    /// Text strings drawn in the last frame
    pub fn texts(&self) -> Vec<&str> {
        self.frame
            .iter()
            .filter_map(|d| match d {
                DrawCall::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Mesh draws of the last frame
    pub fn meshes(&self) -> Vec<&MeshDraw> {
        self.frame
            .iter()
            .filter_map(|d| match d {
                DrawCall::Mesh(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn sample_volume(&self) -> u8 {
        self.sample_volume
    }

    pub fn music_volume(&self) -> u8 {
        self.music_volume
    }

    fn issue(&mut self, path: &str) -> Option<u32> {
        if self.missing.contains(path) {
            return None;
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        Some(handle)
    }
}

impl AssetLoader for HeadlessPlatform {
    fn load_texture(&mut self, path: &str) -> Option<TextureHandle> {
        self.calls.push(Call::LoadTexture(path.to_string()));
        self.issue(path).map(TextureHandle)
    }

    fn free_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::FreeTexture(texture));
    }

    fn load_scene(&mut self, path: &str) -> Option<SceneHandle> {
        self.calls.push(Call::LoadScene(path.to_string()));
        self.issue(path).map(SceneHandle)
    }

    fn free_scene(&mut self, scene: SceneHandle) {
        self.calls.push(Call::FreeScene(scene));
    }

    fn load_font(&mut self, name: &str) -> Option<FontHandle> {
        self.calls.push(Call::LoadFont(name.to_string()));
        self.issue(name).map(FontHandle)
    }

    fn free_font(&mut self, font: FontHandle) {
        self.calls.push(Call::FreeFont(font));
    }
}

impl AudioOutput for HeadlessPlatform {
    fn load_sample(&mut self, path: &str) -> Option<SampleId> {
        self.calls.push(Call::LoadSample(path.to_string()));
        self.issue(path).map(SampleId)
    }

    fn play_sample(&mut self, sample: SampleId) {
        self.calls.push(Call::PlaySample(sample));
    }

    fn load_music(&mut self, path: &str) -> bool {
        self.calls.push(Call::LoadMusic(path.to_string()));
        !self.missing.contains(path)
    }

    fn play_music(&mut self) {
        self.calls.push(Call::PlayMusic);
    }

    fn stop_music(&mut self) {
        self.calls.push(Call::StopMusic);
    }

    fn unload_music(&mut self) {
        self.calls.push(Call::UnloadMusic);
    }

    fn set_sample_volume(&mut self, percent: u8) {
        self.sample_volume = percent;
    }

    fn set_music_volume(&mut self, percent: u8) {
        self.music_volume = percent;
    }
}

impl Renderer for HeadlessPlatform {
    fn begin_frame(&mut self) {
        self.frame.clear();
    }

    fn draw_mesh(&mut self, draw: MeshDraw) {
        self.frame.push(DrawCall::Mesh(draw));
    }

    fn draw_sprite(&mut self, sprite: SpriteDraw) {
        self.frame.push(DrawCall::Sprite(sprite));
    }

    fn draw_text(&mut self, text: TextDraw) {
        self.frame.push(DrawCall::Text(text));
    }

    fn end_frame(&mut self) {
        self.frames_drawn += 1;
    }
}

impl Platform for HeadlessPlatform {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}
