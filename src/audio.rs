/// Looping background music. Calls are fire-and-forget.
pub trait AudioPlayer {
    fn play(&mut self);
    fn pause(&mut self);
}

/// For hosts without sound.
#[derive(Debug, Default)]
pub struct Silence;

impl AudioPlayer for Silence {
    fn play(&mut self) {}
    fn pause(&mut self) {}
}
