use super::{Clip, ClipCounter};

/// Counter step per key-down.
pub const KEY_STEP: f32 = 0.2;

/// Keyboard-driven animation state: one counter per clip plus the active clip.
///
/// Counters are independent, so switching clips resumes each clip at the
/// phase it was left in.
#[derive(Debug, Clone)]
pub struct Animator {
    active: Clip,
    counters: [ClipCounter; Clip::COUNT],
    offset_x: f32,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            active: Clip::Idle,
            counters: [ClipCounter::new(); Clip::COUNT],
            offset_x: 0.0,
        }
    }

    /// Make `clip` active and advance its counter by one key step.
    pub fn trigger(&mut self, clip: Clip) {
        if clip != self.active {
            log::debug!("clip {} -> {}", self.active.label(), clip.label());
        }
        self.active = clip;
        self.counters[clip.index()].advance(KEY_STEP);
        self.offset_x += clip.offset_step();
    }

    pub fn active(&self) -> Clip {
        self.active
    }

    pub fn counter(&self, clip: Clip) -> f32 {
        self.counters[clip.index()].value()
    }

    /// Frame-within-clip of `clip`, whether or not it is active.
    pub fn frame_of(&self, clip: Clip) -> usize {
        self.counters[clip.index()].frame(clip.frame_count())
    }

    /// Frame-within-clip of the active clip.
    pub fn current_frame(&self) -> usize {
        self.frame_of(self.active)
    }

    /// Texture slot to bind this frame.
    pub fn current_slot(&self) -> usize {
        self.active.frames()[self.current_frame()]
    }

    /// World-space x translation of the sprite quad.
    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let anim = Animator::new();
        assert_eq!(anim.active(), Clip::Idle);
        assert_eq!(anim.current_slot(), 11);
        assert_eq!(anim.offset_x(), 0.0);
    }

    #[test]
    fn trigger_advances_only_that_clip() {
        let mut anim = Animator::new();
        anim.trigger(Clip::Attack);
        anim.trigger(Clip::Attack);
        assert_eq!(anim.active(), Clip::Attack);
        assert!((anim.counter(Clip::Attack) - 0.4).abs() < 1e-6);
        for clip in [Clip::WalkLeft, Clip::WalkRight, Clip::Attack2, Clip::Idle] {
            assert_eq!(anim.counter(clip), 0.0);
        }
    }

    #[test]
    fn switching_clips_preserves_phase() {
        let mut anim = Animator::new();
        for _ in 0..7 {
            anim.trigger(Clip::Attack2);
        }
        let attack2 = anim.counter(Clip::Attack2);

        for _ in 0..12 {
            anim.trigger(Clip::WalkLeft);
        }
        assert_eq!(anim.counter(Clip::Attack2), attack2);

        anim.trigger(Clip::Attack2);
        assert!((anim.counter(Clip::Attack2) - (attack2 + KEY_STEP)).abs() < 1e-6);
        assert_eq!(anim.active(), Clip::Attack2);
    }

    #[test]
    fn held_key_walks_through_frames() {
        let mut anim = Animator::new();
        let mut slots = Vec::new();
        // 0.2 steps accumulate in f32, so sample well inside each frame
        for _ in 0..3 {
            for _ in 0..3 {
                anim.trigger(Clip::WalkLeft);
            }
            slots.push(anim.current_slot());
            for _ in 0..2 {
                anim.trigger(Clip::WalkLeft);
            }
        }
        assert_eq!(slots, vec![8, 9, 10]);
    }

    #[test]
    fn walking_moves_the_sprite() {
        let mut anim = Animator::new();
        anim.trigger(Clip::WalkLeft);
        anim.trigger(Clip::WalkLeft);
        anim.trigger(Clip::WalkRight);
        assert!((anim.offset_x() - 0.01).abs() < 1e-6);
        anim.trigger(Clip::Attack);
        assert!((anim.offset_x() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn current_slot_follows_clip_table() {
        let mut anim = Animator::new();
        anim.trigger(Clip::WalkRight);
        assert_eq!(anim.current_slot(), Clip::WalkRight.frames()[0]);
    }
}
