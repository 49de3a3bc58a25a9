//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StarfieldService (domain)
//! ```
//!
//! Driven adapters (I2C bus, keyboard, clock, entropy, event sinks, config
//! files) implement these traits.  The domain core consumes them via
//! generics, so fade and catalog logic never touch hardware directly.

use core::time::Duration;

use crate::config::SystemConfig;
use crate::error::{ConfigError, TransportError};

// ───────────────────────────────────────────────────────────────
// Bus port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget register block writes to devices on a shared bus.
///
/// The bus is exclusively owned by the channel bank; writes are issued
/// strictly in call order.
pub trait BusPort {
    /// Largest `data` slice a single [`write_block`](Self::write_block)
    /// accepts.
    fn max_block_len(&self) -> usize;

    /// Write `data` to consecutive registers of `address` starting at
    /// `register`.
    fn write_block(&mut self, address: u8, register: u8, data: &[u8])
    -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Key source port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Keyboard-like input device.
pub trait KeySource {
    /// Block for at most `timeout` waiting for input activity.
    ///
    /// Returns `None` if nothing happened, otherwise the key codes that are
    /// held down right now (ascending, possibly empty after a release).
    fn poll_active(&mut self, timeout: Duration) -> Option<Vec<u16>>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic clock.
pub trait TimePort {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Random port
// ───────────────────────────────────────────────────────────────

/// Source of non-cryptographic randomness for ambient cycling and the
/// "random pattern" key.
pub trait RandomPort {
    /// Uniform draw from `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform index in `0..len`.  `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads daemon configuration.
///
/// Implementations MUST run [`SystemConfig::validate`] before returning,
/// so the service never starts on nonsensical timing or brightness bounds.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SystemConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}
