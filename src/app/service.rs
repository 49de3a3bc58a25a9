//! Application service — the input/idle controller.
//!
//! [`StarfieldService`] owns the fade engine, the catalog, and the
//! inactivity timer.  It runs one cooperative loop:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │ busy? ── yes ─▶ tick fade at last observed time, push frame  │
//!  │   │                                                          │
//!  │   ▼                                                          │
//!  │ poll keys (50 ms while fading, 5 s while static)             │
//!  │   │                                                          │
//!  │   ▼                                                          │
//!  │ read clock ─▶ key? ── yes ─▶ reset idle timer, act on key    │
//!  │                 └──── no ──▶ idle > threshold? random const  │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All I/O flows through port traits passed in at call sites, so the loop
//! is driven step by step in tests with a simulated clock.

use core::time::Duration;

use log::{debug, info};

use crate::app::commands::KeyAction;
use crate::app::events::{AppEvent, FadeTarget, Trigger};
use crate::app::ports::{BusPort, EventSink, KeySource, RandomPort, TimePort};
use crate::brightness::BrightnessPolicy;
use crate::catalog::Catalog;
use crate::config::SystemConfig;
use crate::error::Result;
use crate::fade::FadeEngine;
use crate::input::{self, KeyboardInput};

/// Loop timing, resolved once from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub busy_poll: Duration,
    pub idle_poll: Duration,
    pub idle_threshold: Duration,
    pub key_fade: Duration,
    pub ambient_fade: Duration,
    pub startup_fade: Duration,
}

impl Timing {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            busy_poll: config.busy_poll(),
            idle_poll: config.idle_poll(),
            idle_threshold: config.idle_threshold(),
            key_fade: config.key_fade(),
            ambient_fade: config.ambient_fade(),
            startup_fade: config.startup_fade(),
        }
    }
}

pub struct StarfieldService<B: BusPort> {
    engine: FadeEngine<B>,
    catalog: Catalog,
    brightness: BrightnessPolicy,
    timing: Timing,
    /// Clock reading taken after the most recent poll.
    now: Duration,
    last_key: Duration,
}

impl<B: BusPort> StarfieldService<B> {
    pub fn new(engine: FadeEngine<B>, catalog: Catalog, config: &SystemConfig) -> Self {
        Self {
            engine,
            catalog,
            brightness: BrightnessPolicy::from_config(config),
            timing: Timing::from_config(config),
            now: Duration::ZERO,
            last_key: Duration::ZERO,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Blank every chip, then fade in the first constellation.
    pub fn start(&mut self, clock: &impl TimePort, sink: &mut impl EventSink) -> Result<()> {
        self.now = clock.now();
        self.last_key = self.now;
        self.engine.refresh()?;

        sink.emit(&AppEvent::Started {
            channels: self.engine.channel_count(),
            chips: self.engine.bank().chip_count(),
            constellations: self.catalog.len(),
        });
        info!(
            "Starfield started: {} channels, {} constellations, brightness {:.2}",
            self.engine.channel_count(),
            self.catalog.len(),
            self.engine.brightness()
        );

        if !self.catalog.is_empty() {
            self.fade_to_constellation(0, Trigger::Startup, self.timing.startup_fade, sink)?;
        }
        Ok(())
    }

    /// Run the loop until a fatal error.
    pub fn run<K: KeySource>(
        &mut self,
        keys: &mut KeyboardInput<K>,
        clock: &impl TimePort,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        loop {
            self.run_once(keys, clock, rng, sink)?;
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One loop iteration: tick, poll, then react to key or inactivity.
    pub fn run_once<K: KeySource>(
        &mut self,
        keys: &mut KeyboardInput<K>,
        clock: &impl TimePort,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.engine.is_busy() {
            self.engine.tick(self.now)?;
            if !self.engine.is_busy() {
                sink.emit(&AppEvent::FadeFinished);
            }
        }

        let key = keys.poll(self.poll_timeout());
        self.now = clock.now();

        match key {
            Some(code) => {
                self.last_key = self.now;
                match input::decode(code) {
                    Some(action) => self.handle_action(action, rng, sink)?,
                    None => debug!("Key {} has no action", code),
                }
            }
            None => self.check_idle(rng, sink)?,
        }
        Ok(())
    }

    /// Sleep budget for the next poll.
    pub fn poll_timeout(&self) -> Duration {
        if self.engine.is_busy() {
            self.timing.busy_poll
        } else {
            self.timing.idle_poll
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a decoded key action at the current time.
    pub fn handle_action(
        &mut self,
        action: KeyAction,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let fade = self.timing.key_fade;
        match action {
            KeyAction::SelectConstellation(index) => {
                if index < self.catalog.len() {
                    self.fade_to_constellation(index, Trigger::Key, fade, sink)?;
                } else {
                    debug!("No constellation {}", index);
                    sink.emit(&AppEvent::UnknownConstellation(index));
                }
            }
            KeyAction::AllOff => {
                let dark = vec![0.0; self.engine.channel_count()];
                self.start_fade(&dark, FadeTarget::AllOff, Trigger::Key, fade, sink)?;
            }
            KeyAction::Random => {
                let pattern: Vec<f32> = (0..self.engine.channel_count())
                    .map(|_| rng.unit())
                    .collect();
                self.start_fade(&pattern, FadeTarget::Random, Trigger::Key, fade, sink)?;
            }
            KeyAction::Brighten => {
                let b = self.brightness.brighten(self.engine.brightness());
                self.set_brightness(b, sink)?;
            }
            KeyAction::Dim => {
                let b = self.brightness.dim(self.engine.brightness());
                self.set_brightness(b, sink)?;
            }
        }
        Ok(())
    }

    /// Pick a random constellation once the idle threshold has passed.
    fn check_idle(&mut self, rng: &mut impl RandomPort, sink: &mut impl EventSink) -> Result<()> {
        if self.now.saturating_sub(self.last_key) <= self.timing.idle_threshold {
            return Ok(());
        }
        self.last_key = self.now;
        if self.catalog.is_empty() {
            return Ok(());
        }
        let index = rng.index(self.catalog.len());
        self.fade_to_constellation(index, Trigger::Idle, self.timing.ambient_fade, sink)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn engine(&self) -> &FadeEngine<B> {
        &self.engine
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    // ── Internal ──────────────────────────────────────────────

    fn fade_to_constellation(
        &mut self,
        index: usize,
        trigger: Trigger,
        duration: Duration,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let Some(constellation) = self.catalog.get(index) else {
            return Ok(());
        };
        info!("Fading to '{}' ({:?})", constellation.name, trigger);
        let levels = constellation.levels.clone();
        self.start_fade(
            &levels,
            FadeTarget::Constellation(index),
            trigger,
            duration,
            sink,
        )
    }

    fn start_fade(
        &mut self,
        levels: &[f32],
        target: FadeTarget,
        trigger: Trigger,
        duration: Duration,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.engine.start_fade(levels, self.now, duration)?;
        sink.emit(&AppEvent::FadeStarted {
            target,
            trigger,
            duration,
        });
        Ok(())
    }

    fn set_brightness(&mut self, brightness: f32, sink: &mut impl EventSink) -> Result<()> {
        self.engine.set_brightness(brightness)?;
        sink.emit(&AppEvent::BrightnessChanged(brightness));
        Ok(())
    }
}
