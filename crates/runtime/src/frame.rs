/// Per-tick frame metadata.
///
/// The map view advances one frame per `tick`. Everything frame-indexed
/// (events, load latency) is measured against `index`, never wall-clock time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time supplied by the host loop (seconds).
    pub dt_s: f64,
    /// Accumulated time at the start of the frame (seconds).
    pub elapsed_s: f64,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            elapsed_s: index as f64 * dt_s,
        }
    }

    pub fn first() -> Self {
        Self::new(0, 0.0)
    }

    /// Next frame with a possibly different delta.
    pub fn advance(self, dt_s: f64) -> Self {
        Self {
            index: self.index + 1,
            dt_s,
            elapsed_s: self.elapsed_s + self.dt_s,
        }
    }

    pub fn frames_since(self, earlier: u64) -> u64 {
        self.index.saturating_sub(earlier)
    }
}
