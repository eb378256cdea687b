/// Rolling frame-time statistics (seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fps: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl FrameStats {
    /// Stats over `times`, or `None` if there are no samples.
    pub fn from_times<'a>(times: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let mut len = 0usize;
        let mut sum = 0.0;
        let mut min = f64::MAX;
        let mut max = 0.0f64;
        for &t in times {
            len += 1;
            sum += t;
            min = min.min(t);
            max = max.max(t);
        }
        if len == 0 {
            return None;
        }
        let avg = sum / len as f64;
        let fps = if avg > 0.0 { 1.0 / avg } else { 0.0 };
        Some(Self { fps, avg, min, max })
    }
}

/// Summary of one logging interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalSummary {
    pub fps: f64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub total_frames: u64,
}

/// Accumulates frame times and yields a summary once `interval` seconds
/// have passed.
pub struct FpsLog {
    interval: f64,
    total_frames: u64,
    elapsed: f64,
    frames: u32,
    min: f64,
    max: f64,
}

impl FpsLog {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            total_frames: 0,
            elapsed: 0.0,
            frames: 0,
            min: f64::MAX,
            max: 0.0,
        }
    }

    pub fn push(&mut self, dt: f64) -> Option<IntervalSummary> {
        self.total_frames += 1;
        self.frames += 1;
        self.elapsed += dt;
        self.min = self.min.min(dt);
        self.max = self.max.max(dt);

        if self.elapsed < self.interval {
            return None;
        }

        let summary = IntervalSummary {
            fps: self.frames as f64 / self.elapsed,
            avg_ms: self.elapsed / self.frames as f64 * 1000.0,
            min_ms: self.min * 1000.0,
            max_ms: self.max * 1000.0,
            total_frames: self.total_frames,
        };
        self.elapsed = 0.0;
        self.frames = 0;
        self.min = f64::MAX;
        self.max = 0.0;
        Some(summary)
    }
}
