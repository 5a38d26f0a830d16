//! Source port: the primary lighting decision.
//!
//! A source turns external data (air quality, weather, build status, …)
//! into a [`LightEntry`] once per tick. It also decides how often ticks
//! happen.

use std::future::Future;

use lumen_domain::error::PluginError;
use lumen_domain::light::LightEntry;

use super::BoxFuture;

/// A pluggable producer of lighting decisions.
///
/// Implementations live in adapter crates (e.g. `lumen-adapter-aqi`).
pub trait LightSource: Send + Sync {
    /// Display name, shown in the selection prompt.
    fn name(&self) -> &str;

    /// Minutes between two ticks. Read once when scheduling starts and
    /// must be non-zero.
    fn refresh_interval(&self) -> u32;

    /// Produce this tick's decision.
    ///
    /// `Ok(None)` and `Err(_)` both mean "no decision": the device then
    /// shows the warning preset.
    fn light_entry(&self)
    -> impl Future<Output = Result<Option<LightEntry>, PluginError>> + Send;
}

/// Object-safe mirror of [`LightSource`], so the registry can hand out
/// sources of different concrete types.
pub trait DynLightSource: Send + Sync {
    fn name(&self) -> &str;

    fn refresh_interval(&self) -> u32;

    fn light_entry_boxed(&self) -> BoxFuture<'_, Result<Option<LightEntry>, PluginError>>;
}

impl<T: LightSource> DynLightSource for T {
    fn name(&self) -> &str {
        LightSource::name(self)
    }

    fn refresh_interval(&self) -> u32 {
        LightSource::refresh_interval(self)
    }

    fn light_entry_boxed(&self) -> BoxFuture<'_, Result<Option<LightEntry>, PluginError>> {
        Box::pin(LightSource::light_entry(self))
    }
}

/// A type-erased source, as produced by the registry.
pub type BoxedSource = Box<dyn DynLightSource>;

impl LightSource for BoxedSource {
    fn name(&self) -> &str {
        DynLightSource::name(&**self)
    }

    fn refresh_interval(&self) -> u32 {
        DynLightSource::refresh_interval(&**self)
    }

    fn light_entry(
        &self,
    ) -> impl Future<Output = Result<Option<LightEntry>, PluginError>> + Send {
        DynLightSource::light_entry_boxed(&**self)
    }
}
