//! Light entry: the target lighting state decided once per tick.
//!
//! A [`LightEntry`] has no identity: a source plugin builds one, an
//! automation may override or dim it, and the orchestrator projects the
//! result into [`Directive`]s before discarding it.
//!
//! ## Precedence
//!
//! | Override | Result |
//! |----------|--------|
//! | absent | source entry as-is |
//! | `effect = Off` | override verbatim, source never consulted |
//! | `brightness = b` | source `color_abs` (else `brightness`) scaled by `b / 255` |

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, scale};
use crate::directive::Directive;
use crate::effect::Effect;

/// Fallback lighting states that have a fixed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Shown right after the device connects, before the first decision.
    Standby,
    /// Shown when a tick produced no decision.
    Warning,
}

/// Target lighting state. Every field is optional; unset fields are left
/// untouched on the device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightEntry {
    pub brightness: Option<u8>,
    pub effect: Option<Effect>,
    pub effect_speed: Option<u8>,
    pub color: Option<Rgb>,
    pub color_abs: Option<Rgb>,
}

impl LightEntry {
    /// Build the entry for a [`Preset`].
    #[must_use]
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Standby => Self::default()
                .with_effect(Effect::BREATHING)
                .with_effect_speed(100)
                .with_color_abs(Rgb::WHITE),
            Preset::Warning => Self::default()
                .with_effect(Effect::BREATHING)
                .with_effect_speed(255)
                .with_color_abs(Rgb::RED),
        }
    }

    #[must_use]
    pub fn standby() -> Self {
        Self::from_preset(Preset::Standby)
    }

    #[must_use]
    pub fn warning() -> Self {
        Self::from_preset(Preset::Warning)
    }

    /// An entry that switches the lighting off.
    #[must_use]
    pub fn off() -> Self {
        Self::default().with_effect(Effect::Off)
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    #[must_use]
    pub fn with_effect_speed(mut self, speed: u8) -> Self {
        self.effect_speed = Some(speed);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_color_abs(mut self, color: Rgb) -> Self {
        self.color_abs = Some(color);
        self
    }

    /// Whether this entry carries the off sentinel.
    #[must_use]
    pub fn is_off(&self) -> bool {
        self.effect.is_some_and(Effect::is_off)
    }

    /// Apply an automation override on top of this (source) entry.
    ///
    /// Only the override's brightness is consulted: it dims `color_abs` if
    /// present, otherwise `brightness` if present, otherwise nothing. The
    /// off sentinel is *not* handled here, see [`resolve`].
    #[must_use]
    pub fn merge(mut self, override_entry: Option<&LightEntry>) -> Self {
        let Some(level) = override_entry.and_then(|o| o.brightness) else {
            return self;
        };

        if let Some(color_abs) = self.color_abs {
            self.color_abs = Some(color_abs.scaled(level));
        } else if let Some(brightness) = self.brightness {
            self.brightness = Some(scale(brightness, level));
        }
        self
    }

    /// Project this entry into device calls, in application order.
    ///
    /// An off effect is emitted alone. `color_abs` shadows both `color`
    /// and `brightness`.
    #[must_use]
    pub fn directives(&self) -> Vec<Directive> {
        let mut out = Vec::with_capacity(4);

        if let Some(effect) = self.effect {
            out.push(Directive::SetEffect(effect));
            if effect.is_off() {
                return out;
            }
        }
        if let Some(speed) = self.effect_speed {
            out.push(Directive::SetEffectSpeed(speed));
        }
        if let Some(color_abs) = self.color_abs {
            out.push(Directive::SetColorAbs(color_abs));
        } else {
            if let Some(color) = self.color {
                out.push(Directive::SetColor(color));
            }
            if let Some(brightness) = self.brightness {
                out.push(Directive::SetBrightness(brightness));
            }
        }
        out
    }
}

impl From<Preset> for LightEntry {
    fn from(preset: Preset) -> Self {
        Self::from_preset(preset)
    }
}

/// Decide the final entry of a tick from the source decision and the
/// optional automation override.
///
/// An off override wins outright. A missing source decision stays missing
/// even when an override exists; [`plan`] turns it into a warning.
#[must_use]
pub fn resolve(source: Option<LightEntry>, automation: Option<LightEntry>) -> Option<LightEntry> {
    match automation {
        Some(over) if over.is_off() => Some(over),
        over => source.map(|entry| entry.merge(over.as_ref())),
    }
}

/// Directives for an optional entry; `None` surfaces as [`Preset::Warning`].
#[must_use]
pub fn plan(entry: Option<&LightEntry>) -> Vec<Directive> {
    match entry {
        Some(entry) => entry.directives(),
        None => LightEntry::warning().directives(),
    }
}
