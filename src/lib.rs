//! Starfield star-map display library.
//!
//! Drives a bank of PCA9685 PWM chips over I2C to fade constellations of
//! LED "stars" in and out.  Everything except the adapters behind the
//! `hardware` feature is plain logic and runs on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod brightness;
pub mod catalog;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fade;
pub mod input;
