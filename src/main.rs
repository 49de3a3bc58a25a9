//! Starfield daemon — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  I2cBus<I2cdev>  Keyboard(evdev)  MonotonicClock  HashRng    │
//! │  (BusPort)       (KeySource)      (TimePort)      (Random)   │
//! │  LogEventSink    JsonConfigFile                              │
//! │  (EventSink)     (ConfigPort)                                │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  StarfieldService → FadeEngine → ChannelBank → PCA9685 │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `starfield [config.json]` (default `starfield.json`).
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use linux_embedded_hal::I2cdev;
use log::{error, info};

use starfield::adapters::keyboard::Keyboard;
use starfield::adapters::log_sink::LogEventSink;
use starfield::adapters::random::HashRng;
use starfield::adapters::time::MonotonicClock;
use starfield::app::ports::ConfigPort;
use starfield::app::service::StarfieldService;
use starfield::catalog;
use starfield::config::JsonConfigFile;
use starfield::drivers::bus::I2cBus;
use starfield::drivers::channel_bank::ChannelBank;
use starfield::fade::FadeEngine;
use starfield::input::KeyboardInput;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("starfield v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "starfield.json".into());
    let config = JsonConfigFile::new(&config_path)
        .load()
        .with_context(|| format!("loading {config_path}"))?;

    // ── 3. Catalog (fatal on any inconsistency) ───────────────
    let mapping = catalog::load_mapping_file(&config.mapping_path, Some(config.channel_limit()))
        .with_context(|| format!("loading {}", config.mapping_path.display()))?;
    let channel_count = match config.channel_count {
        Some(n) => n,
        None => mapping.channel_count()?,
    };
    let constellations =
        catalog::load_catalog_file(&config.constellations_path, &mapping, channel_count)
            .with_context(|| format!("loading {}", config.constellations_path.display()))?;

    // ── 4. Hardware ───────────────────────────────────────────
    let i2c = I2cdev::new(&config.i2c_device)
        .with_context(|| format!("opening {}", config.i2c_device))?;
    let bus = I2cBus::new(i2c, config.max_block_len);
    let bank = ChannelBank::new(bus, config.chip_base_address, channel_count)
        .context("initialising PWM chips")?;
    let engine = FadeEngine::new(bank, config.initial_brightness);
    let mut keys = KeyboardInput::new(Keyboard::detect());

    // ── 5. Service ────────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut rng = HashRng::new();
    let mut sink = LogEventSink::new();
    let mut service = StarfieldService::new(engine, constellations, &config);

    service.start(&clock, &mut sink)?;
    info!("System ready. Entering main loop.");

    // ── 6. Main loop (returns only on a fatal bus error) ──────
    if let Err(e) = service.run(&mut keys, &clock, &mut rng, &mut sink) {
        error!("Fatal: {}", e);
        return Err(e.into());
    }
    Ok(())
}
