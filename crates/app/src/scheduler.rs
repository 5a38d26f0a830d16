//! Scheduler: the periodic fetch → decide → apply tick.
//!
//! One tokio task runs every tick, so ticks never overlap: when a tick
//! overruns, the next one is delayed instead of piling up. The first tick
//! fires immediately, ahead of the first scheduled one.
//!
//! A device failure during a tick drops the handle, reconnects (see
//! [`Orchestrator::connect`]) and re-runs the tick. The interval itself is
//! left alone, so the schedule survives the reconnect.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use lumen_domain::error::{ContractError, DeviceError, LumenError};
use lumen_domain::light::{self, LightEntry};

use crate::orchestrator::{ConnectionState, Orchestrator};
use crate::ports::{DeviceConnector, LightAutomation, LightSource};

/// A connected orchestrator bound to its plugins.
pub struct Scheduler<C: DeviceConnector, S, A> {
    orchestrator: Orchestrator<C>,
    source: S,
    automation: Option<A>,
    period: Duration,
}

impl<C, S, A> Scheduler<C, S, A>
where
    C: DeviceConnector,
    S: LightSource,
    A: LightAutomation,
{
    /// Bind `source` and the optional `automation` to a connected
    /// orchestrator. The refresh interval is read from the source once.
    ///
    /// # Errors
    ///
    /// [`ContractError::ZeroRefreshInterval`] if the source asks for a zero
    /// interval.
    pub fn new(
        mut orchestrator: Orchestrator<C>,
        source: S,
        automation: Option<A>,
    ) -> Result<Self, ContractError> {
        let minutes = source.refresh_interval();
        if minutes == 0 {
            tracing::error!(plugin = source.name(), "refresh interval must be positive");
            return Err(ContractError::ZeroRefreshInterval {
                plugin: source.name().to_string(),
            });
        }
        match &automation {
            Some(automation) => tracing::info!(plugin = automation.name(), "automation enabled"),
            None => tracing::info!("automation disabled"),
        }
        tracing::info!(plugin = source.name(), minutes, "refresh period set");

        orchestrator.set_state(ConnectionState::Running);
        Ok(Self {
            orchestrator,
            source,
            automation,
            period: Duration::from_secs(u64::from(minutes) * 60),
        })
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator<C> {
        &self.orchestrator
    }

    /// Run one tick: ask the plugins for the final entry, then apply it.
    ///
    /// Plugin errors are logged and count as "no decision" (source) or
    /// "no override" (automation). Returns the applied entry (`None` means
    /// the warning preset).
    ///
    /// # Errors
    ///
    /// The device error that interrupted the apply step.
    pub async fn tick(&mut self) -> Result<Option<LightEntry>, DeviceError> {
        tracing::info!("refreshing lighting");
        let entry = decide(&self.source, self.automation.as_ref()).await;
        self.orchestrator.apply(entry.as_ref()).await?;
        Ok(entry)
    }

    /// Run one tick, reconnecting and re-running it once on device failure.
    ///
    /// # Errors
    ///
    /// [`LumenError::ReconnectExhausted`] when the device cannot be reached
    /// again (fatal), or [`LumenError::Device`] when the re-run tick failed
    /// too (recoverable: the next tick reconnects).
    pub async fn cycle(&mut self) -> Result<Option<LightEntry>, LumenError> {
        match self.tick().await {
            Ok(entry) => Ok(entry),
            Err(err) => {
                tracing::warn!(error = %err, "connection lost, trying to reconnect");
                self.orchestrator.disconnect();
                self.orchestrator.connect().await?;
                self.orchestrator.set_state(ConnectionState::Running);
                Ok(self.tick().await?)
            }
        }
    }

    /// Tick forever at the source's refresh interval.
    ///
    /// # Errors
    ///
    /// Returns only on a fatal error, i.e. when reconnecting failed.
    pub async fn run(mut self) -> Result<(), LumenError> {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match self.cycle().await {
                Ok(_) => {}
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(error = %err, "tick failed, retrying next interval");
                }
                Err(err) => {
                    tracing::error!(error = %err, "scheduler stopped");
                    return Err(err);
                }
            }
        }
    }
}

/// The decide step of a tick: the source's entry resolved against the
/// automation's override.
async fn decide<S, A>(source: &S, automation: Option<&A>) -> Option<LightEntry>
where
    S: LightSource,
    A: LightAutomation,
{
    let decision = match source.light_entry().await {
        Ok(entry) => entry,
        Err(err) => {
            tracing::warn!(plugin = source.name(), error = %err, "source failed");
            None
        }
    };

    let Some(automation) = automation else {
        return decision;
    };
    let over = match automation.light_entry().await {
        Ok(entry) => entry,
        Err(err) => {
            tracing::warn!(plugin = automation.name(), error = %err, "automation failed");
            None
        }
    };
    if over.as_ref().is_some_and(LightEntry::is_off) {
        tracing::info!(plugin = automation.name(), "automation switched lighting off");
    }
    light::resolve(decision, over)
}

impl<C, S, A> Scheduler<C, S, A>
where
    C: DeviceConnector + 'static,
    S: LightSource + 'static,
    A: LightAutomation + 'static,
{
    /// Run the scheduler on its own task.
    pub fn spawn(self) -> JoinHandle<Result<(), LumenError>> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use lumen_domain::color::Rgb;
    use lumen_domain::effect::Effect;
    use lumen_domain::error::PluginError;

    use crate::orchestrator::tests::{FakeConnector, fast_config, standby_calls};
    use crate::ports::BoxedAutomation;

    // ── Scripted plugins ───────────────────────────────────────────

    struct ScriptedSource {
        interval: u32,
        entry: Mutex<Result<Option<LightEntry>, String>>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn returning(entry: Option<LightEntry>) -> Self {
            Self {
                interval: 5,
                entry: Mutex::new(Ok(entry)),
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                interval: 5,
                entry: Mutex::new(Err("http 503".to_string())),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl LightSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn refresh_interval(&self) -> u32 {
            self.interval
        }

        async fn light_entry(&self) -> Result<Option<LightEntry>, PluginError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entry
                .lock()
                .unwrap()
                .clone()
                .map_err(PluginError::Unavailable)
        }
    }

    struct ScriptedAutomation(Result<Option<LightEntry>, String>);

    impl LightAutomation for ScriptedAutomation {
        fn name(&self) -> &str {
            "scripted automation"
        }

        async fn light_entry(&self) -> Result<Option<LightEntry>, PluginError> {
            self.0.clone().map_err(PluginError::Unavailable)
        }
    }

    fn aqi_40() -> LightEntry {
        LightEntry::default()
            .with_effect(Effect::SOLID)
            .with_color_abs(Rgb::new(5, 154, 101))
    }

    async fn connected(connector: &FakeConnector) -> Orchestrator<FakeConnector> {
        let mut orchestrator = Orchestrator::new(connector.clone(), fast_config());
        orchestrator.connect().await.unwrap();
        connector.clear();
        orchestrator
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_reject_zero_refresh_interval() {
        let connector = FakeConnector::default();
        let mut source = ScriptedSource::returning(None);
        source.interval = 0;

        let result =
            Scheduler::new(connected(&connector).await, source, None::<BoxedAutomation>);

        assert!(matches!(
            result,
            Err(ContractError::ZeroRefreshInterval { plugin }) if plugin == "scripted"
        ));
    }

    #[tokio::test]
    async fn should_convert_minutes_to_period_and_enter_running() {
        let connector = FakeConnector::default();
        let scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(None),
            None::<BoxedAutomation>,
        )
        .unwrap();

        assert_eq!(scheduler.period(), Duration::from_secs(300));
        assert_eq!(scheduler.orchestrator().state(), ConnectionState::Running);
    }

    #[tokio::test]
    async fn should_apply_source_entry_without_automation() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            None::<BoxedAutomation>,
        )
        .unwrap();

        let applied = scheduler.cycle().await.unwrap();

        assert_eq!(applied, Some(aqi_40()));
        assert_eq!(
            connector.calls(),
            vec!["set_effect(1)", "set_color_abs(#059a65)"]
        );
    }

    #[tokio::test]
    async fn should_apply_warning_when_source_has_no_decision() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(None),
            None::<BoxedAutomation>,
        )
        .unwrap();

        let applied = scheduler.cycle().await.unwrap();

        assert_eq!(applied, None);
        assert_eq!(
            connector.calls(),
            vec!["set_effect(5)", "set_effect_speed(255)", "set_color_abs(#ff0000)"]
        );
    }

    #[tokio::test]
    async fn should_contain_source_error_and_apply_warning() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::failing(),
            None::<BoxedAutomation>,
        )
        .unwrap();

        let applied = scheduler.cycle().await.unwrap();

        assert_eq!(applied, None);
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.calls()[2], "set_color_abs(#ff0000)");
    }

    #[tokio::test]
    async fn should_apply_off_override_and_discard_source() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            Some(ScriptedAutomation(Ok(Some(LightEntry::off())))),
        )
        .unwrap();

        let applied = scheduler.cycle().await.unwrap();

        assert_eq!(applied, Some(LightEntry::off()));
        assert_eq!(connector.calls(), vec!["set_effect(0)"]);
    }

    #[tokio::test]
    async fn should_defer_to_source_when_automation_has_no_override() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            Some(ScriptedAutomation(Ok(None))),
        )
        .unwrap();

        assert_eq!(scheduler.cycle().await.unwrap(), Some(aqi_40()));
    }

    #[tokio::test]
    async fn should_dim_source_entry_with_override_brightness() {
        let connector = FakeConnector::default();
        let over = LightEntry::default().with_brightness(128);
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            Some(ScriptedAutomation(Ok(Some(over)))),
        )
        .unwrap();

        let applied = scheduler.cycle().await.unwrap().unwrap();

        assert_eq!(applied.color_abs, Some(Rgb::new(2, 77, 50)));
    }

    #[tokio::test]
    async fn should_treat_failed_automation_as_no_override() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            Some(ScriptedAutomation(Err("clock skew".to_string()))),
        )
        .unwrap();

        assert_eq!(scheduler.cycle().await.unwrap(), Some(aqi_40()));
    }

    #[tokio::test]
    async fn should_reconnect_and_rerun_tick_after_device_error() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            None::<BoxedAutomation>,
        )
        .unwrap();
        connector.break_after(1);

        let applied = scheduler.cycle().await.unwrap();

        assert_eq!(applied, Some(aqi_40()));
        assert_eq!(connector.connects(), 2);
        assert_eq!(scheduler.orchestrator().state(), ConnectionState::Running);
        let mut expected = vec!["set_effect(1)".to_string()];
        expected.extend(standby_calls());
        expected.extend(["set_effect(1)".to_string(), "set_color_abs(#059a65)".to_string()]);
        assert_eq!(connector.calls(), expected);
        assert_eq!(scheduler.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn should_fail_when_reconnect_budget_exhausted() {
        let connector = FakeConnector::default();
        let mut scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            None::<BoxedAutomation>,
        )
        .unwrap();
        connector.break_after(0);
        let connector = connector.failing_connects(10);

        let result = scheduler.cycle().await;

        assert!(matches!(result, Err(LumenError::ReconnectExhausted { .. })));
        assert_eq!(scheduler.orchestrator().state(), ConnectionState::Failed);
        assert_eq!(connector.connects(), 6);
    }

    #[tokio::test]
    async fn should_tick_immediately_when_run() {
        let connector = FakeConnector::default();
        let scheduler = Scheduler::new(
            connected(&connector).await,
            ScriptedSource::returning(Some(aqi_40())),
            None::<BoxedAutomation>,
        )
        .unwrap();

        let handle = scheduler.spawn();
        for _ in 0..50 {
            if !connector.calls().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(
            connector.calls(),
            vec!["set_effect(1)", "set_color_abs(#059a65)"]
        );
    }
}
