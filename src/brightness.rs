//! Brightness step policy for the brighten/dim keys.

use crate::config::SystemConfig;

/// Fixed-increment brightness adjustment clamped to `[min, max]`.
///
/// The daemon floors at 0.1 so repeated dimming never blanks the display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessPolicy {
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl BrightnessPolicy {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            step: config.brightness_step,
            min: config.min_brightness,
            max: config.max_brightness,
        }
    }

    pub fn brighten(&self, current: f32) -> f32 {
        (current + self.step).min(self.max)
    }

    pub fn dim(&self, current: f32) -> f32 {
        (current - self.step).max(self.min)
    }
}

impl Default for BrightnessPolicy {
    fn default() -> Self {
        Self::from_config(&SystemConfig::default())
    }
}
