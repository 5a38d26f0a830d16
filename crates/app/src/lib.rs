//! # lumen-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `DeviceConnector` / `LightDevice`: the lighting hardware
//!   - `LightSource`: primary lighting decision from external data
//!   - `LightAutomation`: time-based override of that decision
//!   - `Clock`: local wall time
//! - Keep a static **plugin registry** mapping names to constructors
//! - Run the **orchestrator**: connect, reconnect, and the periodic
//!   fetch → decide → apply tick
//!
//! ## Dependency rule
//! Depends on `lumen-domain` only (plus `tokio` for timers and the scheduler task).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod orchestrator;
pub mod ports;
pub mod registry;
pub mod scheduler;
