use crate::input::{HostCommand, Input};
use crate::renderer::Renderer;
use crate::schedule::FrameScheduler;
use crate::state::{GameState, Overlays};

/// The surface a host shell drives. Both game variants implement it so the
/// CLI and web front ends stay variant-agnostic.
pub trait Engine {
    fn state(&self) -> GameState;

    fn overlays(&self) -> Overlays {
        self.state().overlays()
    }

    fn start(&mut self, scheduler: &mut dyn FrameScheduler);

    fn toggle_pause(&mut self, scheduler: &mut dyn FrameScheduler);

    /// Pause because the window lost focus. Never resumes.
    fn auto_pause(&mut self);

    fn handle_input(
        &mut self,
        input: Input,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<HostCommand>;

    /// One display refresh. Does nothing, and schedules nothing, unless
    /// running.
    fn frame(&mut self, renderer: &mut dyn Renderer, scheduler: &mut dyn FrameScheduler);

    /// Wall-clock spawn period, for variants that spawn on a timer.
    fn spawn_interval_ms(&self) -> Option<u64> {
        None
    }

    fn spawn_tick(&mut self) {}

    /// New canvas size. Only bounds change; entities keep their positions.
    fn handle_resize(&mut self, width: f64, height: f64);

    /// Repaint the current scene without advancing it.
    fn redraw(&self, renderer: &mut dyn Renderer);
}
