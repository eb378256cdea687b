pub mod clip;
pub mod controller;
pub mod layers;

pub use self::clip::Clip;
pub use self::controller::Animator;
pub use self::layers::LayerCycler;

/// Frame-within-clip for a counter value: `floor(counter) mod frame_count`.
///
/// Always in `[0, frame_count)`. Negative counters wrap with Euclidean
/// remainder and non-finite ones select frame 0. A zero frame count also
/// selects frame 0 so callers never index out of bounds.
pub fn frame_index(counter: f64, frame_count: usize) -> usize {
    if frame_count == 0 || !counter.is_finite() {
        return 0;
    }
    let whole = counter.floor() as i64;
    whole.rem_euclid(frame_count as i64) as usize
}

/// Monotonically increasing animation counter.
///
/// Kept as an integer part plus a fraction in `[0, 1)` so small steps keep
/// carrying into the integer part no matter how long the counter runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipCounter {
    whole: i64,
    frac: f32,
}

impl ClipCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, step: f32) {
        let sum = self.frac + step;
        let carry = sum.floor();
        self.whole += carry as i64;
        self.frac = sum - carry;
    }

    /// Approximate counter value, for display.
    pub fn value(&self) -> f32 {
        (self.whole as f64 + self.frac as f64) as f32
    }

    /// Frame index over a clip of `frame_count` frames.
    pub fn frame(&self, frame_count: usize) -> usize {
        // frac < 1, so floor(whole + frac) == whole
        frame_index(self.whole as f64, frame_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_is_floor_mod() {
        assert_eq!(frame_index(0.0, 3), 0);
        assert_eq!(frame_index(0.99, 3), 0);
        assert_eq!(frame_index(1.0, 3), 1);
        assert_eq!(frame_index(2.5, 3), 2);
        assert_eq!(frame_index(3.0, 3), 0);
        assert_eq!(frame_index(17.4, 5), 2);
        assert_eq!(frame_index(1234.9, 6), 1234 % 6);
    }

    #[test]
    fn frame_index_stays_in_range() {
        for n in 1..8usize {
            let mut c = 0.0f64;
            while c < 50.0 {
                let idx = frame_index(c, n);
                assert!(idx < n);
                assert_eq!(idx, (c.floor() as usize) % n);
                c += 0.37;
            }
        }
    }

    #[test]
    fn degenerate_inputs_select_first_frame() {
        assert_eq!(frame_index(5.0, 0), 0);
        assert_eq!(frame_index(f64::NAN, 4), 0);
        assert_eq!(frame_index(f64::INFINITY, 4), 0);
        assert_eq!(frame_index(-1.0, 3), 2);
    }

    #[test]
    fn counter_wraps_forever() {
        let mut counter = ClipCounter::new();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(counter.frame(3));
            counter.advance(1.0);
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn fractional_steps_hold_a_frame() {
        let mut counter = ClipCounter::new();
        // 0.25 is exact in binary, so four steps land exactly on 1.0
        for _ in 0..3 {
            counter.advance(0.25);
            assert_eq!(counter.frame(3), 0);
        }
        counter.advance(0.25);
        assert_eq!(counter.frame(3), 1);
    }

    #[test]
    fn small_steps_keep_carrying_at_large_counts() {
        // Past 2^22 an f32 accumulator can no longer absorb a 0.1 step.
        let mut counter = ClipCounter {
            whole: 1 << 22,
            frac: 0.0,
        };
        for _ in 0..30 {
            counter.advance(0.1);
        }
        assert!(counter.whole >= (1 << 22) + 2);

        let mut counter = ClipCounter {
            whole: 1 << 40,
            frac: 0.0,
        };
        let before = counter.frame(3);
        for _ in 0..4 {
            counter.advance(0.25);
        }
        assert_eq!(counter.frame(3), (before + 1) % 3);
    }

    #[test]
    fn fraction_stays_below_one() {
        let mut counter = ClipCounter::new();
        for _ in 0..1000 {
            counter.advance(0.2);
            assert!((0.0..1.0).contains(&counter.frac));
        }
        assert!((counter.value() - 200.0).abs() < 0.01);
    }
}
