//! Simulated keyboard handle and its visible state.

use std::sync::{Arc, Mutex, PoisonError};

use lumen_app::ports::LightDevice;
use lumen_domain::color::Rgb;
use lumen_domain::directive::Directive;
use lumen_domain::effect::Effect;
use lumen_domain::error::DeviceError;

use crate::{Call, Shared};

/// What the simulated keyboard currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingState {
    pub effect: Effect,
    pub effect_speed: u8,
    pub color: Rgb,
    pub brightness: u8,
    /// Whether `color` is absolute (brightness ignored).
    pub absolute: bool,
    pub color_correction: Option<Rgb>,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            effect: Effect::Off,
            effect_speed: 0,
            color: Rgb::WHITE,
            brightness: u8::MAX,
            absolute: false,
            color_correction: None,
        }
    }
}

impl LightingState {
    /// The colour a viewer sees; black when the lighting is off.
    #[must_use]
    pub fn rendered(&self) -> Rgb {
        if self.effect.is_off() {
            Rgb::new(0, 0, 0)
        } else if self.absolute {
            self.color
        } else {
            self.color.scaled(self.brightness)
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::SetEffect(effect) => self.effect = effect,
            Directive::SetEffectSpeed(speed) => self.effect_speed = speed,
            Directive::SetColorAbs(rgb) => {
                self.color = rgb;
                self.absolute = true;
            }
            Directive::SetColor(rgb) => {
                self.color = rgb;
                self.absolute = false;
            }
            Directive::SetBrightness(level) => {
                self.brightness = level;
                self.absolute = false;
            }
        }
    }
}

/// An open handle on the simulated keyboard.
pub struct VirtualKeyboard {
    shared: Arc<Mutex<Shared>>,
    generation: u64,
}

impl VirtualKeyboard {
    pub(crate) fn new(shared: Arc<Mutex<Shared>>, generation: u64) -> Self {
        Self { shared, generation }
    }

    fn send(&self, call: Call) -> Result<(), DeviceError> {
        let mut shared = self
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.check(&shared)?;

        match call {
            Call::ColorCorrection(rgb) => shared.lighting.color_correction = Some(rgb),
            Call::Directive(directive) => {
                shared.lighting.apply(directive);
                tracing::info!(%directive, "virtual keyboard");
            }
        }
        shared.record(call);
        Ok(())
    }

    fn check(&self, shared: &Shared) -> Result<(), DeviceError> {
        if shared.plugged && shared.generation == self.generation {
            Ok(())
        } else {
            Err(DeviceError::Disconnected)
        }
    }
}

impl LightDevice for VirtualKeyboard {
    async fn set_color_correction(&mut self, rgb: Rgb) -> Result<(), DeviceError> {
        self.send(Call::ColorCorrection(rgb))
    }

    async fn set_effect(&mut self, effect: Effect) -> Result<(), DeviceError> {
        self.send(Call::Directive(Directive::SetEffect(effect)))
    }

    async fn set_effect_speed(&mut self, speed: u8) -> Result<(), DeviceError> {
        self.send(Call::Directive(Directive::SetEffectSpeed(speed)))
    }

    async fn set_color(&mut self, rgb: Rgb) -> Result<(), DeviceError> {
        self.send(Call::Directive(Directive::SetColor(rgb)))
    }

    async fn set_color_abs(&mut self, rgb: Rgb) -> Result<(), DeviceError> {
        self.send(Call::Directive(Directive::SetColorAbs(rgb)))
    }

    async fn set_brightness(&mut self, level: u8) -> Result<(), DeviceError> {
        self.send(Call::Directive(Directive::SetBrightness(level)))
    }
}
