use super::ClipCounter;

/// Per-frame counter step for the sprite layer.
pub const SPRITE_STEP: f32 = 0.2;
/// Per-frame counter step for the effect (glow) layer.
pub const EFFECT_STEP: f32 = 0.1;

/// Auto-advancing pair of layer counters for the glow-over composite.
///
/// Both counters tick once per rendered frame regardless of input; each wraps
/// over its own set size.
#[derive(Debug, Clone)]
pub struct LayerCycler {
    sprite: ClipCounter,
    sprite_frames: usize,
    sprite_step: f32,
    effect: ClipCounter,
    effect_frames: usize,
    effect_step: f32,
}

impl LayerCycler {
    pub fn new(
        sprite_frames: usize,
        sprite_step: f32,
        effect_frames: usize,
        effect_step: f32,
    ) -> Self {
        Self {
            sprite: ClipCounter::new(),
            sprite_frames,
            sprite_step,
            effect: ClipCounter::new(),
            effect_frames,
            effect_step,
        }
    }

    pub fn tick(&mut self) {
        self.sprite.advance(self.sprite_step);
        self.effect.advance(self.effect_step);
    }

    pub fn sprite_frame(&self) -> usize {
        self.sprite.frame(self.sprite_frames)
    }

    pub fn effect_frame(&self) -> usize {
        self.effect.frame(self.effect_frames)
    }

    pub fn sprite_counter(&self) -> f32 {
        self.sprite.value()
    }

    pub fn effect_counter(&self) -> f32 {
        self.effect.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_layers_advance_each_tick() {
        let mut layers = LayerCycler::new(3, 0.5, 4, 0.25);
        layers.tick();
        layers.tick();
        assert_eq!(layers.sprite_counter(), 1.0);
        assert_eq!(layers.effect_counter(), 0.5);
        assert_eq!(layers.sprite_frame(), 1);
        assert_eq!(layers.effect_frame(), 0);
    }

    #[test]
    fn layers_wrap_over_their_own_set_size() {
        let mut layers = LayerCycler::new(3, 1.0, 4, 1.0);
        let mut pairs = Vec::new();
        for _ in 0..6 {
            pairs.push((layers.sprite_frame(), layers.effect_frame()));
            layers.tick();
        }
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 2), (0, 3), (1, 0), (2, 1)]);
    }

    #[test]
    fn frames_stay_in_range() {
        let mut layers = LayerCycler::new(3, SPRITE_STEP, 4, EFFECT_STEP);
        for _ in 0..500 {
            layers.tick();
            assert!(layers.sprite_frame() < 3);
            assert!(layers.effect_frame() < 4);
        }
    }
}
