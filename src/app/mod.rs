//! Application core — pure domain logic, zero I/O.
//!
//! This module holds the input/idle controller that decides what the star
//! map shows next.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
