//! Audio collaborator
//!
//! Sample playback and music streaming are host concerns; the core only
//! picks what to play and how loud.

/// Sample identifier issued by the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleId(pub u32);

/// Scoring sound effects, one picked at random per award
pub const SFX_FILES: [&str; 3] = ["highSFX.ogg", "mediumSFX.ogg", "lowSFX.ogg"];

/// Gameplay music, one picked at random per session
pub const MUSIC_TRACKS: [&str; 3] = ["Beauty-Flow.wav", "EDM-Detection-Mode.wav", "Inspired.wav"];

pub trait AudioOutput {
    fn load_sample(&mut self, path: &str) -> Option<SampleId>;
    fn play_sample(&mut self, sample: SampleId);
    /// Load a music track, replacing any loaded one. Returns false on failure.
    fn load_music(&mut self, path: &str) -> bool;
    fn play_music(&mut self);
    fn stop_music(&mut self);
    fn unload_music(&mut self);
    /// Sample voice volume in percent (0-100)
    fn set_sample_volume(&mut self, percent: u8);
    /// Music volume in percent (0-100)
    fn set_music_volume(&mut self, percent: u8);
}
