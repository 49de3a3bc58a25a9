//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` on the daemon host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                channels,
                chips,
                constellations,
            } => {
                info!(
                    "START | channels={} chips={} constellations={}",
                    channels, chips, constellations
                );
            }
            AppEvent::FadeStarted {
                target,
                trigger,
                duration,
            } => {
                info!(
                    "FADE  | target={:?} trigger={:?} over={}ms",
                    target,
                    trigger,
                    duration.as_millis()
                );
            }
            AppEvent::FadeFinished => {
                info!("FADE  | done");
            }
            AppEvent::BrightnessChanged(b) => {
                info!("BRIGHT| {:.2}", b);
            }
            AppEvent::UnknownConstellation(index) => {
                warn!("KEY   | no constellation at index {}", index);
            }
        }
    }
}
