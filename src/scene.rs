//! Per-variant animation driver: decides which texture slots are bound each
//! frame and where the quad sits.

use crate::anim::layers::{EFFECT_STEP, SPRITE_STEP};
use crate::anim::{Animator, Clip, LayerCycler};
use crate::assets::{AUTO_EFFECT_MANIFEST, AUTO_SPRITE_MANIFEST, KEYBOARD_MANIFEST};
use crate::composite::BlendRecipe;
use crate::config::Variant;
use crate::input::{self, Action};

/// Slots to bind for the base and effect layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSlots {
    pub base: usize,
    pub effect: usize,
}

/// Read-only view of the driver for the debug overlay.
#[derive(Debug, Clone)]
pub enum AnimReadout {
    Keyboard {
        active: Clip,
        slot: usize,
        offset_x: f32,
        /// (clip, counter, frame-within-clip) for every clip.
        clips: Vec<(Clip, f32, usize)>,
    },
    Auto {
        sprite_counter: f32,
        sprite_frame: usize,
        effect_counter: f32,
        effect_frame: usize,
    },
}

pub enum Driver {
    Keyboard(Animator),
    Auto(LayerCycler),
}

impl Driver {
    pub fn new(variant: Variant) -> Self {
        match variant {
            Variant::Keyboard => Driver::Keyboard(Animator::new()),
            Variant::Auto => Driver::Auto(LayerCycler::new(
                AUTO_SPRITE_MANIFEST.len(),
                SPRITE_STEP,
                AUTO_EFFECT_MANIFEST.len(),
                EFFECT_STEP,
            )),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Driver::Keyboard(_) => Variant::Keyboard,
            Driver::Auto(_) => Variant::Auto,
        }
    }

    /// Base-layer manifest and, for the composite, the effect manifest.
    pub fn manifests(&self) -> (&'static [&'static str], Option<&'static [&'static str]>) {
        match self {
            Driver::Keyboard(_) => (&KEYBOARD_MANIFEST[..], None),
            Driver::Auto(_) => (&AUTO_SPRITE_MANIFEST[..], Some(&AUTO_EFFECT_MANIFEST[..])),
        }
    }

    pub fn recipe(&self) -> BlendRecipe {
        BlendRecipe::for_variant(self.variant())
    }

    /// Called once per rendered frame.
    pub fn advance_frame(&mut self) {
        if let Driver::Auto(layers) = self {
            layers.tick();
        }
    }

    /// Advance for a frame that will be presented and return its slots.
    /// Call only once the surface texture has been acquired, so skipped
    /// frames do not move the animation.
    pub fn next_frame(&mut self) -> LayerSlots {
        self.advance_frame();
        self.slots()
    }

    /// Feed a key action. Returns true if it changed animation state.
    pub fn handle(&mut self, action: Action) -> bool {
        match self {
            Driver::Keyboard(animator) => input::apply(animator, action),
            Driver::Auto(_) => false,
        }
    }

    pub fn slots(&self) -> LayerSlots {
        match self {
            Driver::Keyboard(animator) => LayerSlots {
                base: animator.current_slot(),
                effect: 0,
            },
            Driver::Auto(layers) => LayerSlots {
                base: layers.sprite_frame(),
                effect: layers.effect_frame(),
            },
        }
    }

    pub fn offset_x(&self) -> f32 {
        match self {
            Driver::Keyboard(animator) => animator.offset_x(),
            Driver::Auto(_) => 0.0,
        }
    }

    pub fn readout(&self) -> AnimReadout {
        match self {
            Driver::Keyboard(animator) => AnimReadout::Keyboard {
                active: animator.active(),
                slot: animator.current_slot(),
                offset_x: animator.offset_x(),
                clips: Clip::ALL
                    .iter()
                    .map(|&clip| (clip, animator.counter(clip), animator.frame_of(clip)))
                    .collect(),
            },
            Driver::Auto(layers) => AnimReadout::Auto {
                sprite_counter: layers.sprite_counter(),
                sprite_frame: layers.sprite_frame(),
                effect_counter: layers.effect_counter(),
                effect_frame: layers.effect_frame(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_ignores_frames_and_follows_keys() {
        let mut driver = Driver::new(Variant::Keyboard);
        for _ in 0..100 {
            driver.advance_frame();
        }
        assert_eq!(driver.slots(), LayerSlots { base: 11, effect: 0 });

        assert!(driver.handle(Action::Play(Clip::Attack)));
        assert_eq!(driver.slots().base, Clip::Attack.frames()[0]);
        assert!(!driver.handle(Action::ToggleOverlay));
    }

    #[test]
    fn auto_advances_every_frame_and_ignores_keys() {
        let mut driver = Driver::new(Variant::Auto);
        assert!(!driver.handle(Action::Play(Clip::WalkLeft)));
        assert_eq!(driver.offset_x(), 0.0);

        let start = driver.slots();
        assert_eq!(start, LayerSlots { base: 0, effect: 0 });
        // sprite step 0.2 -> frame 1 after 6 ticks (1.2), effect step 0.1 -> still 0
        for _ in 0..6 {
            driver.advance_frame();
        }
        assert_eq!(driver.slots(), LayerSlots { base: 1, effect: 0 });
    }

    #[test]
    fn next_frame_ticks_exactly_once() {
        let mut driver = Driver::new(Variant::Auto);
        for _ in 0..5 {
            driver.next_frame();
        }
        let AnimReadout::Auto { sprite_counter, effect_counter, .. } = driver.readout() else {
            panic!("expected auto readout");
        };
        assert!((sprite_counter - 5.0 * SPRITE_STEP).abs() < 1e-5);
        assert!((effect_counter - 5.0 * EFFECT_STEP).abs() < 1e-5);

        assert_eq!(driver.next_frame(), LayerSlots { base: 1, effect: 0 });
        assert_eq!(driver.slots(), LayerSlots { base: 1, effect: 0 });
    }

    #[test]
    fn next_frame_leaves_keyboard_state_alone() {
        let mut driver = Driver::new(Variant::Keyboard);
        driver.handle(Action::Play(Clip::Attack));
        let before = driver.slots();
        for _ in 0..10 {
            assert_eq!(driver.next_frame(), before);
        }
    }

    #[test]
    fn manifests_and_recipe_per_variant() {
        let kb = Driver::new(Variant::Keyboard);
        assert_eq!(kb.manifests().0.len(), KEYBOARD_MANIFEST.len());
        assert!(kb.manifests().1.is_none());
        assert_eq!(kb.recipe(), BlendRecipe::Modulate);

        let auto = Driver::new(Variant::Auto);
        assert_eq!(auto.manifests().1.map(|m| m.len()), Some(AUTO_EFFECT_MANIFEST.len()));
        assert_eq!(auto.recipe(), BlendRecipe::GlowOver);
    }

    #[test]
    fn auto_slots_stay_inside_manifests() {
        let mut driver = Driver::new(Variant::Auto);
        for _ in 0..1000 {
            driver.advance_frame();
            let slots = driver.slots();
            assert!(slots.base < AUTO_SPRITE_MANIFEST.len());
            assert!(slots.effect < AUTO_EFFECT_MANIFEST.len());
        }
    }

    #[test]
    fn readout_lists_every_clip() {
        let mut driver = Driver::new(Variant::Keyboard);
        driver.handle(Action::Play(Clip::WalkRight));
        match driver.readout() {
            AnimReadout::Keyboard { active, clips, .. } => {
                assert_eq!(active, Clip::WalkRight);
                assert_eq!(clips.len(), Clip::COUNT);
            }
            AnimReadout::Auto { .. } => panic!("expected keyboard readout"),
        }
    }
}
