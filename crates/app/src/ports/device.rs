//! Device port: the addressable lighting hardware.
//!
//! The orchestrator is the only caller: plugins never see a device handle.

use std::future::Future;

use lumen_domain::color::Rgb;
use lumen_domain::device::DeviceAddress;
use lumen_domain::directive::Directive;
use lumen_domain::effect::Effect;
use lumen_domain::error::DeviceError;

/// Opens a connection to the lighting device.
pub trait DeviceConnector: Send + Sync {
    /// Handle returned by a successful connection.
    type Device: LightDevice + 'static;

    /// Open the device at `address`.
    fn connect(
        &self,
        address: DeviceAddress,
    ) -> impl Future<Output = Result<Self::Device, DeviceError>> + Send;
}

/// An open connection to the lighting device.
///
/// Any call may fail with a [`DeviceError`]; the orchestrator then drops the
/// handle and reconnects.
pub trait LightDevice: Send {
    /// One-time calibration so that white renders as true white.
    fn set_color_correction(
        &mut self,
        rgb: Rgb,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn set_effect(&mut self, effect: Effect)
    -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn set_effect_speed(&mut self, speed: u8)
    -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Set a colour relative to the current brightness.
    fn set_color(&mut self, rgb: Rgb) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Set an absolute colour, overriding brightness.
    fn set_color_abs(&mut self, rgb: Rgb)
    -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn set_brightness(&mut self, level: u8)
    -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Dispatch a single [`Directive`] to the matching call.
    fn execute(
        &mut self,
        directive: Directive,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send {
        async move {
            match directive {
                Directive::SetEffect(effect) => self.set_effect(effect).await,
                Directive::SetEffectSpeed(speed) => self.set_effect_speed(speed).await,
                Directive::SetColorAbs(rgb) => self.set_color_abs(rgb).await,
                Directive::SetColor(rgb) => self.set_color(rgb).await,
                Directive::SetBrightness(level) => self.set_brightness(level).await,
            }
        }
    }
}
