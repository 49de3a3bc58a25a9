//! System configuration parameters
//!
//! All tunable parameters for the starfield daemon.  Values are read from
//! an optional JSON file; any field left out keeps its default.

use core::time::Duration;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigPort;
use crate::drivers::pca9685::{BYTES_PER_CHANNEL, CHANNELS_PER_CHIP, MAX_ADDRESS};
use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Bus ---
    /// I2C character device the PWM chips hang off
    pub i2c_device: String,
    /// Address of chip 0; chip k answers at `chip_base_address + k`
    pub chip_base_address: u8,
    /// Largest block write the transport accepts (SMBus: 32 bytes)
    pub max_block_len: usize,
    /// Usable channels; `None` derives it from the mapping file
    pub channel_count: Option<usize>,

    // --- Resources ---
    /// Channel → star mapping file
    pub mapping_path: PathBuf,
    /// Constellation groups file
    pub constellations_path: PathBuf,

    // --- Timing ---
    /// Poll timeout while a fade is running (milliseconds)
    pub busy_poll_ms: u32,
    /// Poll timeout while the display is static (milliseconds)
    pub idle_poll_ms: u32,
    /// Inactivity before a random constellation is picked (seconds)
    pub idle_threshold_secs: u32,
    /// Fade length for key-selected targets (milliseconds)
    pub key_fade_ms: u32,
    /// Fade length for idle-cycled constellations (milliseconds)
    pub ambient_fade_ms: u32,
    /// Fade length for the first constellation after startup (milliseconds)
    pub startup_fade_ms: u32,

    // --- Brightness ---
    /// Global brightness at startup (0.0-1.0)
    pub initial_brightness: f32,
    /// Increment applied by the brighten/dim keys
    pub brightness_step: f32,
    /// Floor reachable with the dim key
    pub min_brightness: f32,
    /// Ceiling reachable with the brighten key
    pub max_brightness: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Bus
            i2c_device: "/dev/i2c-0".into(),
            chip_base_address: 0x40,
            max_block_len: 32,
            channel_count: None,

            // Resources
            mapping_path: "mapping.txt".into(),
            constellations_path: "constellations.txt".into(),

            // Timing
            busy_poll_ms: 50,          // 20 Hz frame rate during fades
            idle_poll_ms: 5000,        // near-zero load on a static display
            idle_threshold_secs: 120,  // 2 min without a key
            key_fade_ms: 1000,
            ambient_fade_ms: 5000,
            startup_fade_ms: 1000,

            // Brightness
            initial_brightness: 0.5,
            brightness_step: 0.1,
            min_brightness: 0.1,
            max_brightness: 1.0,
        }
    }
}

impl SystemConfig {
    /// Reject values the daemon cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.busy_poll_ms == 0 || self.idle_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll intervals must be non-zero"));
        }
        if self.busy_poll_ms >= self.idle_poll_ms {
            return Err(ConfigError::ValidationFailed(
                "busy_poll_ms must be shorter than idle_poll_ms",
            ));
        }
        if self.key_fade_ms == 0 || self.ambient_fade_ms == 0 || self.startup_fade_ms == 0 {
            return Err(ConfigError::ValidationFailed("fade durations must be non-zero"));
        }
        if self.idle_threshold_secs == 0 {
            return Err(ConfigError::ValidationFailed("idle_threshold_secs must be non-zero"));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.min_brightness) || !unit.contains(&self.max_brightness) {
            return Err(ConfigError::ValidationFailed("brightness bounds must lie in 0.0..=1.0"));
        }
        if self.min_brightness > self.max_brightness {
            return Err(ConfigError::ValidationFailed(
                "min_brightness must not exceed max_brightness",
            ));
        }
        if !(self.min_brightness..=self.max_brightness).contains(&self.initial_brightness) {
            return Err(ConfigError::ValidationFailed(
                "initial_brightness must lie between min and max",
            ));
        }
        if !(self.brightness_step > 0.0 && self.brightness_step <= 1.0) {
            return Err(ConfigError::ValidationFailed("brightness_step must lie in (0.0, 1.0]"));
        }
        if self.max_block_len < CHANNELS_PER_CHIP / 2 * BYTES_PER_CHANNEL {
            return Err(ConfigError::ValidationFailed(
                "max_block_len must hold at least half a chip (32 bytes)",
            ));
        }
        if self.chip_base_address > MAX_ADDRESS {
            return Err(ConfigError::ValidationFailed(
                "chip_base_address must be a 7-bit address",
            ));
        }
        if let Some(channels) = self.channel_count {
            if channels == 0 {
                return Err(ConfigError::ValidationFailed("channel_count must be non-zero"));
            }
            if channels > self.addressable_channels() {
                return Err(ConfigError::ValidationFailed(
                    "chip addresses exceed the 7-bit address range",
                ));
            }
        }
        Ok(())
    }

    /// Channels the chips from `chip_base_address` up to the last 7-bit
    /// address can carry.
    pub fn addressable_channels(&self) -> usize {
        (usize::from(MAX_ADDRESS) + 1).saturating_sub(usize::from(self.chip_base_address))
            * CHANNELS_PER_CHIP
    }

    /// Every mapped channel must lie below this: the configured count, or
    /// failing that, whatever the address range allows.
    pub fn channel_limit(&self) -> usize {
        self.channel_count.unwrap_or_else(|| self.addressable_channels())
    }

    pub fn busy_poll(&self) -> Duration {
        Duration::from_millis(self.busy_poll_ms.into())
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms.into())
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs.into())
    }

    pub fn key_fade(&self) -> Duration {
        Duration::from_millis(self.key_fade_ms.into())
    }

    pub fn ambient_fade(&self) -> Duration {
        Duration::from_millis(self.ambient_fade_ms.into())
    }

    pub fn startup_fade(&self) -> Duration {
        Duration::from_millis(self.startup_fade_ms.into())
    }
}

// ───────────────────────────────────────────────────────────────
// JSON file adapter
// ───────────────────────────────────────────────────────────────

/// [`ConfigPort`] backed by a JSON file on disk.
///
/// A missing file is not an error: the daemon runs on defaults.
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse and validate a config document.
    pub fn parse(text: &str) -> Result<SystemConfig, ConfigError> {
        let config: SystemConfig = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            line: e.line(),
            reason: "malformed JSON config",
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let config = Self::parse(&text)?;
                info!("Config loaded from {}", self.path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", self.path.display());
                Ok(SystemConfig::default())
            }
            Err(e) => Err(ConfigError::Io {
                path: self.path.display().to_string(),
                kind: e.kind(),
            }),
        }
    }
}
