//! Plugin registry: a static table from name to constructor.
//!
//! Sources and automations are registered explicitly by the composition
//! root, in display order. Constructors receive the immutable application
//! configuration (`C`) and return a type-erased plugin.

use lumen_domain::error::{ConfigError, ContractError, LumenError};

use crate::ports::{BoxedAutomation, BoxedSource, LightAutomation, LightSource};

type SourceFactory<C> = Box<dyn Fn(&C) -> Result<BoxedSource, ConfigError> + Send + Sync>;
type AutomationFactory<C> = Box<dyn Fn(&C) -> Result<BoxedAutomation, ConfigError> + Send + Sync>;

/// Ordered table of the plugins available for selection.
pub struct PluginRegistry<C> {
    sources: Vec<(&'static str, SourceFactory<C>)>,
    automations: Vec<(&'static str, AutomationFactory<C>)>,
}

impl<C> Default for PluginRegistry<C> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            automations: Vec::new(),
        }
    }
}

impl<C: 'static> PluginRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source constructor under `name`.
    ///
    /// Registering a name twice replaces the earlier constructor and keeps
    /// its position.
    pub fn register_source<S, F>(&mut self, name: &'static str, factory: F) -> &mut Self
    where
        S: LightSource + 'static,
        F: Fn(&C) -> Result<S, ConfigError> + Send + Sync + 'static,
    {
        let erased: SourceFactory<C> =
            Box::new(move |config: &C| factory(config).map(|s| Box::new(s) as BoxedSource));
        upsert(&mut self.sources, name, erased);
        self
    }

    /// Register an automation constructor under `name`.
    pub fn register_automation<A, F>(&mut self, name: &'static str, factory: F) -> &mut Self
    where
        A: LightAutomation + 'static,
        F: Fn(&C) -> Result<A, ConfigError> + Send + Sync + 'static,
    {
        let erased: AutomationFactory<C> =
            Box::new(move |config: &C| factory(config).map(|a| Box::new(a) as BoxedAutomation));
        upsert(&mut self.automations, name, erased);
        self
    }

    /// Source names in registration order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|(name, _)| *name).collect()
    }

    /// Automation names in registration order.
    #[must_use]
    pub fn automation_names(&self) -> Vec<&'static str> {
        self.automations.iter().map(|(name, _)| *name).collect()
    }

    /// Construct the source registered as `name`.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnknownSource`] if nothing is registered under
    /// `name`, or the constructor's [`ConfigError`].
    pub fn build_source(&self, name: &str, config: &C) -> Result<BoxedSource, LumenError> {
        let (_, factory) = self
            .sources
            .iter()
            .find(|(registered, _)| *registered == name)
            .ok_or_else(|| ContractError::UnknownSource(name.to_string()))?;
        let source = factory(config)?;
        tracing::info!(plugin = name, "source loaded");
        Ok(source)
    }

    /// Construct the automation registered as `name`.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnknownAutomation`] if nothing is registered under
    /// `name`, or the constructor's [`ConfigError`].
    pub fn build_automation(&self, name: &str, config: &C) -> Result<BoxedAutomation, LumenError> {
        let (_, factory) = self
            .automations
            .iter()
            .find(|(registered, _)| *registered == name)
            .ok_or_else(|| ContractError::UnknownAutomation(name.to_string()))?;
        let automation = factory(config)?;
        tracing::info!(plugin = name, "automation loaded");
        Ok(automation)
    }
}

fn upsert<F>(table: &mut Vec<(&'static str, F)>, name: &'static str, factory: F) {
    match table.iter_mut().find(|(registered, _)| *registered == name) {
        Some(slot) => slot.1 = factory,
        None => table.push((name, factory)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_domain::error::PluginError;
    use lumen_domain::light::LightEntry;

    struct Settings {
        interval: u32,
        token: Option<String>,
    }

    struct Fixed(u32);

    impl LightSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn refresh_interval(&self) -> u32 {
            self.0
        }

        async fn light_entry(&self) -> Result<Option<LightEntry>, PluginError> {
            Ok(Some(LightEntry::standby()))
        }
    }

    struct AlwaysOff;

    impl LightAutomation for AlwaysOff {
        fn name(&self) -> &str {
            "always off"
        }

        async fn light_entry(&self) -> Result<Option<LightEntry>, PluginError> {
            Ok(Some(LightEntry::off()))
        }
    }

    fn registry() -> PluginRegistry<Settings> {
        let mut registry = PluginRegistry::new();
        registry
            .register_source("Fixed", |s: &Settings| Ok(Fixed(s.interval)))
            .register_source("Needs token", |s: &Settings| {
                s.token
                    .as_ref()
                    .map(|_| Fixed(1))
                    .ok_or(ConfigError::Missing("token"))
            })
            .register_automation("Always off", |_: &Settings| Ok(AlwaysOff));
        registry
    }

    fn settings() -> Settings {
        Settings {
            interval: 5,
            token: None,
        }
    }

    #[test]
    fn should_list_names_in_registration_order() {
        let registry = registry();
        assert_eq!(registry.source_names(), vec!["Fixed", "Needs token"]);
        assert_eq!(registry.automation_names(), vec!["Always off"]);
    }

    #[test]
    fn should_build_source_with_configuration() {
        let source = registry().build_source("Fixed", &settings()).unwrap();
        assert_eq!(LightSource::refresh_interval(&source), 5);
    }

    #[test]
    fn should_report_unknown_source_as_contract_error() {
        let result = registry().build_source("Weather", &settings());
        assert!(matches!(
            result,
            Err(LumenError::Contract(ContractError::UnknownSource(name))) if name == "Weather"
        ));
    }

    #[test]
    fn should_report_unknown_automation_as_contract_error() {
        let result = registry().build_automation("Night", &settings());
        assert!(matches!(
            result,
            Err(LumenError::Contract(ContractError::UnknownAutomation(_)))
        ));
    }

    #[test]
    fn should_surface_constructor_config_error() {
        let result = registry().build_source("Needs token", &settings());
        assert!(matches!(
            result,
            Err(LumenError::Config(ConfigError::Missing("token")))
        ));
    }

    #[tokio::test]
    async fn should_build_working_automation() {
        let automation = registry()
            .build_automation("Always off", &settings())
            .unwrap();
        assert_eq!(LightAutomation::name(&automation), "always off");
        let entry = LightAutomation::light_entry(&automation).await.unwrap();
        assert_eq!(entry, Some(LightEntry::off()));
    }

    #[test]
    fn should_replace_constructor_registered_twice() {
        let mut registry = registry();
        registry.register_source("Fixed", |_: &Settings| Ok(Fixed(42)));
        assert_eq!(registry.source_names(), vec!["Fixed", "Needs token"]);
        let source = registry.build_source("Fixed", &settings()).unwrap();
        assert_eq!(LightSource::refresh_interval(&source), 42);
    }
}
