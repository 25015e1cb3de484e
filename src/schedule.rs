/// Re-arms the per-frame update, like `requestAnimationFrame`.
///
/// Engines call this at most once per frame and only while running; a loop
/// that stops calling it is suspended.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler that just remembers whether a frame is wanted. Hosts with their
/// own loop poll it with [`FrameRequest::take`].
#[derive(Debug, Default)]
pub struct FrameRequest {
    pending: bool,
    total: u64,
}

impl FrameRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of requests seen since creation.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl FrameScheduler for FrameRequest {
    fn request_frame(&mut self) {
        self.pending = true;
        self.total += 1;
    }
}

/// Fixed-period wall-clock timer. Converts elapsed milliseconds into whole
/// ticks, carrying the remainder.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    period_ms: u64,
    carried_ms: u64,
}

impl SpawnTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            carried_ms: 0,
        }
    }

    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        self.carried_ms += elapsed_ms;
        let ticks = self.carried_ms / self.period_ms;
        self.carried_ms %= self.period_ms;
        ticks
    }
}
