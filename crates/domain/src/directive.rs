//! Directives: individual device calls produced by applying a light entry.

use crate::color::Rgb;
use crate::effect::Effect;

/// One call on the lighting device, in the order it must be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    SetEffect(Effect),
    SetEffectSpeed(u8),
    SetColorAbs(Rgb),
    SetColor(Rgb),
    SetBrightness(u8),
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetEffect(effect) => write!(f, "set_effect({})", effect.id()),
            Self::SetEffectSpeed(speed) => write!(f, "set_effect_speed({speed})"),
            Self::SetColorAbs(rgb) => write!(f, "set_color_abs({rgb})"),
            Self::SetColor(rgb) => write!(f, "set_color({rgb})"),
            Self::SetBrightness(level) => write!(f, "set_brightness({level})"),
        }
    }
}
