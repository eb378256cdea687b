use instant::Instant;

/// Which phase of a frame is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FramePhase {
    Animate = 0,
    GpuUpload = 1,
    Draw = 2,
    Overlay = 3,
}

impl FramePhase {
    pub const COUNT: usize = 4;

    pub const ALL: [FramePhase; Self::COUNT] = [
        Self::Animate,
        Self::GpuUpload,
        Self::Draw,
        Self::Overlay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Animate => "Animate",
            Self::GpuUpload => "GPU Upload",
            Self::Draw => "Draw",
            Self::Overlay => "Overlay",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct PhaseTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; FramePhase::COUNT],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl PhaseTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; FramePhase::COUNT],
            start: Instant::now(),
        }
    }

    /// Call before a phase runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a phase finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: FramePhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    fn record(&mut self, phase: FramePhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_moves_toward_sample() {
        let mut timers = PhaseTimers::new();
        timers.record(FramePhase::Draw, 100.0);
        assert!((timers.durations_us[FramePhase::Draw as usize] - 10.0).abs() < 1e-9);
        timers.record(FramePhase::Draw, 100.0);
        assert!((timers.durations_us[FramePhase::Draw as usize] - 19.0).abs() < 1e-9);
        assert_eq!(timers.durations_us[FramePhase::Animate as usize], 0.0);
    }

    #[test]
    fn total_sums_phases() {
        let mut timers = PhaseTimers::new();
        timers.record(FramePhase::Animate, 10.0);
        timers.record(FramePhase::Overlay, 20.0);
        assert!((timers.total_us() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn phase_order_matches_discriminants() {
        for (i, phase) in FramePhase::ALL.iter().enumerate() {
            assert_eq!(*phase as usize, i);
        }
    }
}
