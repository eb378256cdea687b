/// Animation clip: which keyboard action is currently driving the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Clip {
    WalkLeft = 0,
    WalkRight = 1,
    Attack = 2,
    Attack2 = 3,
    Idle = 4,
}

// Texture slots into `assets::KEYBOARD_MANIFEST`. Slots repeat so a clip can
// ping-pong without extra images.
const WALK_LEFT_FRAMES: [usize; 3] = [8, 9, 10];
const WALK_RIGHT_FRAMES: [usize; 3] = [0, 1, 1];
const ATTACK_FRAMES: [usize; 5] = [3, 4, 5, 4, 3];
const ATTACK2_FRAMES: [usize; 6] = [3, 4, 5, 6, 7, 3];
const IDLE_FRAMES: [usize; 1] = [11];

impl Clip {
    pub const COUNT: usize = 5;

    pub const ALL: [Clip; Self::COUNT] = [
        Clip::WalkLeft,
        Clip::WalkRight,
        Clip::Attack,
        Clip::Attack2,
        Clip::Idle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Clip::WalkLeft => "Walk Left",
            Clip::WalkRight => "Walk Right",
            Clip::Attack => "Attack",
            Clip::Attack2 => "Attack 2",
            Clip::Idle => "Idle",
        }
    }

    /// Texture slot for each frame of the clip, in playback order.
    pub fn frames(self) -> &'static [usize] {
        match self {
            Clip::WalkLeft => &WALK_LEFT_FRAMES,
            Clip::WalkRight => &WALK_RIGHT_FRAMES,
            Clip::Attack => &ATTACK_FRAMES,
            Clip::Attack2 => &ATTACK2_FRAMES,
            Clip::Idle => &IDLE_FRAMES,
        }
    }

    pub fn frame_count(self) -> usize {
        self.frames().len()
    }

    /// Horizontal sprite nudge applied each time the clip is triggered.
    pub fn offset_step(self) -> f32 {
        match self {
            Clip::WalkLeft => 0.01,
            Clip::WalkRight => -0.01,
            _ => 0.0,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::KEYBOARD_MANIFEST;

    #[test]
    fn every_clip_has_frames() {
        for clip in Clip::ALL {
            assert!(clip.frame_count() > 0, "{} has no frames", clip.label());
        }
    }

    #[test]
    fn frame_tables_point_at_loaded_slots() {
        for clip in Clip::ALL {
            for &slot in clip.frames() {
                assert!(slot < KEYBOARD_MANIFEST.len());
            }
        }
    }

    #[test]
    fn indices_match_all_order() {
        for (i, clip) in Clip::ALL.iter().enumerate() {
            assert_eq!(clip.index(), i);
        }
    }

    #[test]
    fn only_walks_move_the_sprite() {
        assert!(Clip::WalkLeft.offset_step() > 0.0);
        assert!(Clip::WalkRight.offset_step() < 0.0);
        assert_eq!(Clip::Attack.offset_step(), 0.0);
        assert_eq!(Clip::Attack2.offset_step(), 0.0);
        assert_eq!(Clip::Idle.offset_step(), 0.0);
    }
}
