use std::time::Duration;

/// The audio collaborator. FX18 fires a single tone request; the
/// interpreter never awaits completion.
pub trait Audio {
    /// Play a tone, fire-and-forget. Implementations must not block the
    /// cycle that triggered them.
    fn play(&mut self, frequency: u16, duration: Duration);
}

/// Discards every tone request; for tests and headless runs.
pub struct NullAudio;

impl Audio for NullAudio {
    fn play(&mut self, _frequency: u16, _duration: Duration) {}
}
