//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to                       |
//! |------------|-------------|-----------------------------------|
//! | `keyboard` | KeySource   | Linux evdev keypad / none         |
//! | `log_sink` | EventSink   | `log` facade                      |
//! | `random`   | RandomPort  | xorshift64*, process entropy seed |
//! | `time`     | TimePort    | `std::time::Instant`              |
//!
//! The bus adapter lives with the chip drivers in
//! [`drivers::bus`](crate::drivers::bus); the config file adapter lives in
//! [`config`](crate::config).

pub mod keyboard;
pub mod log_sink;
pub mod random;
pub mod time;
