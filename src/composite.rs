//! Texture-stage blend recipes.
//!
//! The fragment shader implements these with a `mode` uniform; `combine` is
//! the same maths on the CPU so the recipes can be checked without a GPU.
//! Inputs and outputs are stored texel values: layers are uploaded as
//! `Rgba8Unorm` and drawn through a non-sRGB view, so nothing is converted
//! between the texture, the blend and the screen.

use crate::config::Variant;

/// Fixed two-stage texture blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendRecipe {
    /// Stage 0: texture colour x diffuse colour, alpha disabled (opaque).
    /// Stage 1: unused.
    Modulate,
    /// Stage 0: select base texture colour and alpha.
    /// Stage 1: add effect colour, modulate alpha by effect alpha.
    GlowOver,
}

impl BlendRecipe {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Keyboard => BlendRecipe::Modulate,
            Variant::Auto => BlendRecipe::GlowOver,
        }
    }

    /// Value of the `mode` field in the sprite uniform.
    pub fn shader_mode(self) -> u32 {
        match self {
            BlendRecipe::Modulate => 0,
            BlendRecipe::GlowOver => 1,
        }
    }

    /// Combine one texel of each layer. All channels are RGBA in `[0, 1]`.
    pub fn combine(self, base: [f32; 4], effect: [f32; 4], diffuse: [f32; 4]) -> [f32; 4] {
        match self {
            BlendRecipe::Modulate => [
                base[0] * diffuse[0],
                base[1] * diffuse[1],
                base[2] * diffuse[2],
                1.0,
            ],
            BlendRecipe::GlowOver => [
                (base[0] + effect[0]).clamp(0.0, 1.0),
                (base[1] + effect[1]).clamp(0.0, 1.0),
                (base[2] + effect[2]).clamp(0.0, 1.0),
                (base[3] * effect[3]).clamp(0.0, 1.0),
            ],
        }
    }
}
