//! Outbound application events.
//!
//! The [`StarfieldService`](super::service::StarfieldService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use core::time::Duration;

/// What a fade is heading towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTarget {
    /// Catalog index.
    Constellation(usize),
    AllOff,
    Random,
}

/// Why a fade was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Key,
    /// No key for the idle threshold.
    Idle,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The display has been initialised and blanked.
    Started {
        channels: usize,
        chips: usize,
        constellations: usize,
    },

    /// A fade began.
    FadeStarted {
        target: FadeTarget,
        trigger: Trigger,
        duration: Duration,
    },

    /// The running fade reached its target.
    FadeFinished,

    /// Global brightness changed.
    BrightnessChanged(f32),

    /// A digit key named a constellation the catalog does not have.
    UnknownConstellation(usize),
}
