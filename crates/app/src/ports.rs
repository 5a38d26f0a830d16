//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the orchestrator and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod automation;
pub mod clock;
pub mod device;
pub mod source;

use std::future::Future;
use std::pin::Pin;

pub use automation::{BoxedAutomation, DynLightAutomation, LightAutomation};
pub use clock::{Clock, SystemClock};
pub use device::{DeviceConnector, LightDevice};
pub use source::{BoxedSource, DynLightSource, LightSource};

/// Heap-allocated future used by the object-safe plugin traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
