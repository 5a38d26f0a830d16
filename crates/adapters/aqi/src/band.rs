//! Air-quality bands and their colours.

use lumen_domain::color::Rgb;
use lumen_domain::effect::Effect;
use lumen_domain::light::LightEntry;

/// Upper bounds (exclusive) of the solid bands, with their colour.
const SOLID_BANDS: [(u32, Rgb); 9] = [
    (25, Rgb::new(0, 120, 126)),
    (50, Rgb::new(5, 154, 101)),
    (75, Rgb::new(133, 189, 75)),
    (100, Rgb::new(255, 221, 51)),
    (125, Rgb::new(255, 186, 51)),
    (150, Rgb::new(254, 150, 51)),
    (175, Rgb::new(228, 73, 51)),
    (200, Rgb::new(202, 0, 53)),
    (300, Rgb::new(151, 0, 104)),
];

const HAZARDOUS: Rgb = Rgb::new(120, 0, 63);
const BEYOND_INDEX: Rgb = Rgb::new(78, 0, 22);

/// Breathing speed used from 300 upwards.
pub const ALERT_SPEED: u8 = 127;

/// Lighting for an AQI reading.
///
/// Readings of 300 and above breathe instead of showing a solid colour.
#[must_use]
pub fn entry_for(aqi: u32) -> LightEntry {
    if let Some((_, color)) = SOLID_BANDS.iter().find(|(bound, _)| aqi < *bound) {
        return LightEntry::default()
            .with_effect(Effect::SOLID)
            .with_color_abs(*color);
    }

    let color = if aqi < 400 { HAZARDOUS } else { BEYOND_INDEX };
    LightEntry::default()
        .with_effect(Effect::BREATHING)
        .with_effect_speed(ALERT_SPEED)
        .with_color_abs(color)
}
