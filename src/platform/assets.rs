//! Asset handles and the loader collaborator

/// Opaque texture handle issued by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque scene handle (meshes for static table geometry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u32);

/// Opaque font handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Loads and frees file-backed assets.
///
/// Loads return `None` when the file is missing or unreadable; callers log
/// and carry on with a null resource.
pub trait AssetLoader {
    fn load_texture(&mut self, path: &str) -> Option<TextureHandle>;
    fn free_texture(&mut self, texture: TextureHandle);
    fn load_scene(&mut self, path: &str) -> Option<SceneHandle>;
    fn free_scene(&mut self, scene: SceneHandle);
    fn load_font(&mut self, name: &str) -> Option<FontHandle>;
    fn free_font(&mut self, font: FontHandle);
}

/// A texture owned by one phase.
///
/// `release` frees the texture through the loader and clears the slot, so a
/// second release is a no-op.
#[derive(Debug, Default)]
pub struct TextureSlot(Option<TextureHandle>);

impl TextureSlot {
    /// Load a texture into a new slot, logging when the file is missing
    pub fn load<A: AssetLoader + ?Sized>(assets: &mut A, path: &str) -> Self {
        let texture = assets.load_texture(path);
        if texture.is_none() {
            log::warn!("Texture {} failed to load", path);
        }
        Self(texture)
    }

    pub fn get(&self) -> Option<TextureHandle> {
        self.0
    }

    pub fn is_loaded(&self) -> bool {
        self.0.is_some()
    }

    /// Free the texture (if any) and null the slot
    pub fn release<A: AssetLoader + ?Sized>(&mut self, assets: &mut A) {
        if let Some(texture) = self.0.take() {
            assets.free_texture(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{Call, HeadlessPlatform};

    #[test]
    fn test_slot_release_is_idempotent() {
        let mut platform = HeadlessPlatform::new(100.0, 100.0);
        let mut slot = TextureSlot::load(&mut platform, "logo.png");
        assert!(slot.is_loaded());

        slot.release(&mut platform);
        slot.release(&mut platform);

        assert!(!slot.is_loaded());
        let frees = platform
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::FreeTexture(_)))
            .count();
        assert_eq!(frees, 1);
    }

    #[test]
    fn test_missing_texture_yields_empty_slot() {
        let mut platform = HeadlessPlatform::new(100.0, 100.0).with_missing("logo.png");
        let mut slot = TextureSlot::load(&mut platform, "logo.png");
        assert!(slot.get().is_none());

        slot.release(&mut platform);
        assert!(!platform.calls().iter().any(|c| matches!(c, Call::FreeTexture(_))));
    }
}
