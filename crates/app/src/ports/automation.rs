//! Automation port: a per-tick override of the source decision.

use std::future::Future;

use lumen_domain::error::PluginError;
use lumen_domain::light::LightEntry;

use super::BoxFuture;

/// A pluggable override, consulted on every tick after the source.
///
/// The override can be:
/// - an off entry ([`LightEntry::off`]): the device is switched off and
///   the source decision is discarded;
/// - an entry with `brightness` set: the source decision is dimmed;
/// - `None`: no override, the source decides alone.
pub trait LightAutomation: Send + Sync {
    /// Display name, shown in the selection prompt.
    fn name(&self) -> &str;

    /// Produce this tick's override.
    fn light_entry(&self)
    -> impl Future<Output = Result<Option<LightEntry>, PluginError>> + Send;
}

/// Object-safe mirror of [`LightAutomation`].
pub trait DynLightAutomation: Send + Sync {
    fn name(&self) -> &str;

    fn light_entry_boxed(&self) -> BoxFuture<'_, Result<Option<LightEntry>, PluginError>>;
}

impl<T: LightAutomation> DynLightAutomation for T {
    fn name(&self) -> &str {
        LightAutomation::name(self)
    }

    fn light_entry_boxed(&self) -> BoxFuture<'_, Result<Option<LightEntry>, PluginError>> {
        Box::pin(LightAutomation::light_entry(self))
    }
}

/// A type-erased automation, as produced by the registry.
pub type BoxedAutomation = Box<dyn DynLightAutomation>;

impl LightAutomation for BoxedAutomation {
    fn name(&self) -> &str {
        DynLightAutomation::name(&**self)
    }

    fn light_entry(
        &self,
    ) -> impl Future<Output = Result<Option<LightEntry>, PluginError>> + Send {
        DynLightAutomation::light_entry_boxed(&**self)
    }
}
