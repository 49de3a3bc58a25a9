//! Fade engine — continuous-time linear fades over the channel bank.
//!
//! ```text
//!            start_fade()                 tick(now ≥ start + duration)
//!   ┌──────┐ ─────────────▶ ┌─────────┐ ──────────────────────────────▶ ┌──────┐
//!   │ Idle │                │ Fading  │                                 │ Idle │
//!   └──────┘ ◀───────────── └─────────┘ ◀── start_fade() restarts from  └──────┘
//!                                           the current (partial) frame
//! ```
//!
//! Each tick advances the current frame by `delta × (dt − accounted)`, where
//! `dt` is the time since the fade started and `accounted` the part of it
//! already applied.  The increments telescope: however the ticks are spaced,
//! they sum to exactly the fade duration, so the animation never drifts
//! when the loop oversleeps.  The final tick snaps to the stored target so
//! the frame ends bit-exact.

use core::time::Duration;

use log::debug;

use crate::app::ports::BusPort;
use crate::drivers::channel_bank::ChannelBank;
use crate::drivers::pca9685::MAX_DUTY;
use crate::error::{RangeError, Result};

/// Map a normalised level and global brightness to a 12-bit duty value.
///
/// `round(4095 × clamp(level × brightness, 0, 1)³)` — the cube roughly
/// linearises perceived LED brightness.  Evaluated in `f64` so values near
/// a rounding boundary land on the same duty every time.
pub fn brightness_curve(level: f32, brightness: f32) -> u16 {
    let x = (f64::from(level) * f64::from(brightness)).clamp(0.0, 1.0);
    (f64::from(MAX_DUTY) * x * x * x).round() as u16
}

#[derive(Debug, Clone)]
struct Fade {
    target: Vec<f32>,
    /// Change per second, per channel.
    delta: Vec<f32>,
    start: Duration,
    duration: Duration,
    accounted: Duration,
}

#[derive(Debug, Clone)]
enum FadeState {
    Idle,
    Fading(Fade),
}

/// Owns the current frame and pushes it through the channel bank.
pub struct FadeEngine<B: BusPort> {
    bank: ChannelBank<B>,
    current: Vec<f32>,
    brightness: f32,
    state: FadeState,
}

impl<B: BusPort> FadeEngine<B> {
    /// All channels start at 0.  Nothing is written until the first
    /// [`refresh`](Self::refresh), tick or brightness change.
    pub fn new(bank: ChannelBank<B>, brightness: f32) -> Self {
        let current = vec![0.0; bank.channel_count()];
        Self {
            bank,
            current,
            brightness,
            state: FadeState::Idle,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.current.len()
    }

    pub fn current(&self) -> &[f32] {
        &self.current
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, FadeState::Fading(_))
    }

    pub fn bank(&self) -> &ChannelBank<B> {
        &self.bank
    }

    /// Begin fading from the current frame to `target` over `duration`.
    ///
    /// Any fade in flight is abandoned where it stands.
    pub fn start_fade(&mut self, target: &[f32], now: Duration, duration: Duration) -> Result<()> {
        if target.len() != self.current.len() {
            return Err(RangeError::LengthMismatch {
                expected: self.current.len(),
                actual: target.len(),
            }
            .into());
        }
        if duration.is_zero() {
            return Err(RangeError::InvalidDuration.into());
        }

        let secs = duration.as_secs_f32();
        let delta = target
            .iter()
            .zip(&self.current)
            .map(|(t, c)| (t - c) / secs)
            .collect();

        if self.is_busy() {
            debug!("Fade restarted mid-flight");
        }
        self.state = FadeState::Fading(Fade {
            target: target.to_vec(),
            delta,
            start: now,
            duration,
            accounted: Duration::ZERO,
        });
        Ok(())
    }

    /// Advance the running fade to `now` and push the frame.  No-op when idle.
    pub fn tick(&mut self, now: Duration) -> Result<()> {
        let FadeState::Fading(fade) = &mut self.state else {
            return Ok(());
        };

        let mut dt = now.saturating_sub(fade.start);
        let finished = dt >= fade.duration;
        if finished {
            dt = fade.duration;
        }

        let step = dt.saturating_sub(fade.accounted).as_secs_f32();
        for (c, d) in self.current.iter_mut().zip(&fade.delta) {
            *c += d * step;
        }
        fade.accounted = fade.accounted.max(dt);

        if finished {
            self.current.copy_from_slice(&fade.target);
            self.state = FadeState::Idle;
            debug!("Fade complete");
        }
        self.refresh()
    }

    /// Change the global brightness and re-push the current frame at once.
    pub fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        self.brightness = brightness;
        self.refresh()
    }

    /// Write the current frame to the hardware.
    pub fn refresh(&mut self) -> Result<()> {
        let duties: Vec<u16> = self
            .current
            .iter()
            .map(|&v| brightness_curve(v, self.brightness))
            .collect();
        self.bank.update(&duties)
    }
}
