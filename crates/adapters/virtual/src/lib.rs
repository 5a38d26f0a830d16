//! # lumen-adapter-virtual
//!
//! Virtual/demo device adapter that simulates an RGB keyboard.
//!
//! ## Behaviour
//!
//! | Call | Effect on the simulated keyboard |
//! |------|-----------------------------------|
//! | `set_color_correction` | stored, reported in [`LightingState`] |
//! | `set_effect` | `0` turns the lighting off, anything else selects a mode |
//! | `set_color_abs` | absolute colour, brightness ignored |
//! | `set_color` / `set_brightness` | relative colour scaled by brightness |
//!
//! Every call is appended to a shared journal holding the last
//! [`JOURNAL_CAPACITY`] calls. The connector can also
//! simulate an unplugged device ([`VirtualConnector::unplug`]) or a device
//! that is not there yet ([`VirtualConnector::refuse_next_connects`]).
//!
//! ## Dependency rule
//!
//! Depends on `lumen-app` (port traits) and `lumen-domain` only.

mod keyboard;

pub use keyboard::{LightingState, VirtualKeyboard};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lumen_app::ports::DeviceConnector;
use lumen_domain::color::Rgb;
use lumen_domain::device::DeviceAddress;
use lumen_domain::directive::Directive;
use lumen_domain::error::DeviceError;

/// Calls kept in the journal; older ones are dropped first.
pub const JOURNAL_CAPACITY: usize = 256;

/// One call received by the simulated keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    ColorCorrection(Rgb),
    Directive(Directive),
}

#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) journal: VecDeque<Call>,
    pub(crate) lighting: LightingState,
    /// Bumped on every unplug; handles from an older generation are dead.
    pub(crate) generation: u64,
    pub(crate) plugged: bool,
    pub(crate) refused_connects: u32,
    pub(crate) connects: u32,
}

impl Shared {
    pub(crate) fn record(&mut self, call: Call) {
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(call);
    }
}

/// Connector for the simulated keyboard. Clones share the same keyboard.
#[derive(Debug, Clone)]
pub struct VirtualConnector {
    address: DeviceAddress,
    shared: Arc<Mutex<Shared>>,
}

impl VirtualConnector {
    /// A plugged-in keyboard answering at `address`.
    #[must_use]
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            shared: Arc::new(Mutex::new(Shared {
                plugged: true,
                ..Shared::default()
            })),
        }
    }

    /// Disconnect the keyboard: open handles start failing.
    pub fn unplug(&self) {
        let mut shared = self.lock();
        shared.plugged = false;
        shared.generation += 1;
        tracing::info!(address = %self.address, "virtual keyboard unplugged");
    }

    /// Reconnect the keyboard after [`unplug`](Self::unplug).
    pub fn plug(&self) {
        self.lock().plugged = true;
        tracing::info!(address = %self.address, "virtual keyboard plugged in");
    }

    /// Make the next `count` connection attempts fail.
    pub fn refuse_next_connects(&self, count: u32) {
        self.lock().refused_connects = count;
    }

    /// The most recent calls, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<Call> {
        self.lock().journal.iter().copied().collect()
    }

    /// Journaled directives, without colour-correction calls.
    #[must_use]
    pub fn directives(&self) -> Vec<Directive> {
        self.lock()
            .journal
            .iter()
            .filter_map(|call| match call {
                Call::Directive(directive) => Some(*directive),
                Call::ColorCorrection(_) => None,
            })
            .collect()
    }

    /// Forget the journal (the lighting state is kept).
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// What the keyboard currently shows.
    #[must_use]
    pub fn lighting(&self) -> LightingState {
        self.lock().lighting
    }

    /// Number of connection attempts, successful or not.
    #[must_use]
    pub fn connects(&self) -> u32 {
        self.lock().connects
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceConnector for VirtualConnector {
    type Device = VirtualKeyboard;

    async fn connect(&self, address: DeviceAddress) -> Result<VirtualKeyboard, DeviceError> {
        let mut shared = self.lock();
        shared.connects += 1;

        if address.vendor_id != self.address.vendor_id
            || address
                .product_id
                .is_some_and(|pid| Some(pid) != self.address.product_id)
        {
            return Err(DeviceError::NotFound(address));
        }
        if !shared.plugged {
            return Err(DeviceError::NotFound(address));
        }
        if shared.refused_connects > 0 {
            shared.refused_connects -= 1;
            return Err(DeviceError::Io("device busy".into()));
        }

        tracing::info!(%address, "virtual keyboard opened");
        Ok(VirtualKeyboard::new(
            Arc::clone(&self.shared),
            shared.generation,
        ))
    }
}
