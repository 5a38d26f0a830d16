//! RGB colour triples.

use serde::{Deserialize, Serialize};

/// An RGB triple, serialised as a three-element array (`[r, g, b]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0]);
    pub const GREEN: Self = Self([0, 255, 0]);
    pub const BLUE: Self = Self([0, 0, 255]);

    /// Build a colour from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Scale every channel by `level / 255`, truncating toward zero.
    #[must_use]
    pub fn scaled(self, level: u8) -> Self {
        Self(self.0.map(|channel| scale(channel, level)))
    }

    /// The raw channel values.
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        self.0
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Self {
        Self(channels)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// `floor(value * level / 255)`; the result never exceeds `value`.
#[must_use]
pub fn scale(value: u8, level: u8) -> u8 {
    let scaled = u16::from(value) * u16::from(level) / 255;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}
