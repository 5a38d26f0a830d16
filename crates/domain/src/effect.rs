//! Effect identifiers, with an explicit "off" sentinel.

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

/// The effect mode a device should run.
///
/// On the wire the device speaks plain `u8` ids where `0` disables the
/// lighting. That sentinel is its own variant here so "off" can never be
/// confused with "unset" (`None`) or with a real mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Effect {
    /// Lighting disabled. Terminal: nothing after it is applied.
    Off,
    /// A device effect mode.
    Mode(NonZeroU8),
}

impl Effect {
    /// Static colour.
    pub const SOLID: Self = Self::Mode(NonZeroU8::MIN);
    /// Slow fade in and out.
    pub const BREATHING: Self = Self::Mode(NonZeroU8::new(5).unwrap());

    /// Decode a wire id (`0` is [`Off`](Self::Off)).
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        NonZeroU8::new(id).map_or(Self::Off, Self::Mode)
    }

    /// Encode as a wire id.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Mode(mode) => mode.get(),
        }
    }

    #[must_use]
    pub fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }
}

impl From<u8> for Effect {
    fn from(id: u8) -> Self {
        Self::from_id(id)
    }
}

impl From<Effect> for u8 {
    fn from(effect: Effect) -> Self {
        effect.id()
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Mode(mode) => write!(f, "mode({mode})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_zero_as_off() {
        assert_eq!(Effect::from_id(0), Effect::Off);
        assert!(Effect::from_id(0).is_off());
    }

    #[test]
    fn should_decode_non_zero_as_mode() {
        assert_eq!(Effect::from_id(5), Effect::BREATHING);
        assert_eq!(Effect::from_id(1), Effect::SOLID);
        assert!(!Effect::SOLID.is_off());
    }

    #[test]
    fn should_encode_back_to_wire_id() {
        assert_eq!(Effect::Off.id(), 0);
        assert_eq!(Effect::BREATHING.id(), 5);
        assert_eq!(u8::from(Effect::from_id(42)), 42);
    }

    #[test]
    fn should_serialize_as_plain_integer() {
        assert_eq!(serde_json::to_string(&Effect::BREATHING).unwrap(), "5");
        let parsed: Effect = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, Effect::Off);
    }

    #[test]
    fn should_display_off_and_modes() {
        assert_eq!(Effect::Off.to_string(), "off");
        assert_eq!(Effect::SOLID.to_string(), "mode(1)");
    }
}
