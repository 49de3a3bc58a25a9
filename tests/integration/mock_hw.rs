//! Mock adapters for integration tests.
//!
//! Records every bus write so tests can assert on the full frame history
//! without touching real I2C, and simulates time so fades and idle
//! timeouts can be driven deterministically.

use core::time::Duration;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use starfield::app::events::AppEvent;
use starfield::app::ports::{BusPort, EventSink, KeySource, RandomPort, TimePort};
use starfield::drivers::pca9685::{LED0_ON_L, MODE1, MODE2};
use starfield::error::TransportError;

// ── Bus write record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct BusWrite {
    pub address: u8,
    pub register: u8,
    pub data: Vec<u8>,
}

// ── MockBus ───────────────────────────────────────────────────

pub struct MockBus {
    pub max_block_len: usize,
    pub writes: Vec<BusWrite>,
    /// Fail every write once this many have succeeded.
    pub fail_after: Option<usize>,
}

impl MockBus {
    pub fn new(max_block_len: usize) -> Self {
        Self {
            max_block_len,
            writes: Vec::new(),
            fail_after: None,
        }
    }

    /// Channel-register writes only (mode register setup filtered out).
    pub fn frame_writes(&self) -> Vec<&BusWrite> {
        self.writes
            .iter()
            .filter(|w| w.register != MODE1 && w.register != MODE2)
            .collect()
    }

    /// Duty values most recently written to `address` (16 entries).
    pub fn last_duties(&self, address: u8) -> Option<Vec<u16>> {
        let w = self
            .writes
            .iter()
            .rev()
            .find(|w| w.address == address && w.register == LED0_ON_L)?;
        Some(
            w.data
                .chunks_exact(4)
                .map(|r| u16::from(r[2]) | (u16::from(r[3]) << 8))
                .collect(),
        )
    }
}

impl BusPort for MockBus {
    fn max_block_len(&self) -> usize {
        self.max_block_len
    }

    fn write_block(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        if data.len() > self.max_block_len {
            return Err(TransportError::PayloadTooLarge {
                len: data.len(),
                max: self.max_block_len,
            });
        }
        if self.fail_after.is_some_and(|n| self.writes.len() >= n) {
            return Err(TransportError::Write {
                address,
                register,
                kind: embedded_hal::i2c::ErrorKind::Bus,
            });
        }
        self.writes.push(BusWrite {
            address,
            register,
            data: data.to_vec(),
        });
        Ok(())
    }
}

// ── SimClock ──────────────────────────────────────────────────

/// Shared simulated clock; cloned handles see the same time.
#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<Duration>>);

impl SimClock {
    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl TimePort for SimClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

// ── ScriptedKeys ──────────────────────────────────────────────

/// One poll outcome.
pub enum Poll {
    /// Nothing happens; the whole timeout elapses.
    Quiet,
    /// Keys become active after `after` (capped at the timeout).
    Keys { after: Duration, active: Vec<u16> },
}

/// Replays a poll script, advancing the shared clock like a real sleep.
/// Once the script runs out every poll is quiet.
pub struct ScriptedKeys {
    clock: SimClock,
    script: VecDeque<Poll>,
    pub timeouts: Vec<Duration>,
}

impl ScriptedKeys {
    pub fn new(clock: SimClock, script: Vec<Poll>) -> Self {
        Self {
            clock,
            script: script.into(),
            timeouts: Vec::new(),
        }
    }

    pub fn push(&mut self, poll: Poll) {
        self.script.push_back(poll);
    }
}

impl KeySource for ScriptedKeys {
    fn poll_active(&mut self, timeout: Duration) -> Option<Vec<u16>> {
        self.timeouts.push(timeout);
        match self.script.pop_front().unwrap_or(Poll::Quiet) {
            Poll::Quiet => {
                self.clock.advance(timeout);
                None
            }
            Poll::Keys { after, active } => {
                self.clock.advance(after.min(timeout));
                Some(active)
            }
        }
    }
}

// ── ScriptedRandom ────────────────────────────────────────────

/// Returns canned draws in order, cycling when exhausted.
pub struct ScriptedRandom {
    units: Vec<f32>,
    indices: Vec<usize>,
    next_unit: usize,
    next_index: usize,
}

impl ScriptedRandom {
    pub fn new(units: Vec<f32>, indices: Vec<usize>) -> Self {
        Self {
            units,
            indices,
            next_unit: 0,
            next_index: 0,
        }
    }
}

impl RandomPort for ScriptedRandom {
    fn unit(&mut self) -> f32 {
        let v = self.units[self.next_unit % self.units.len()];
        self.next_unit += 1;
        v
    }

    fn index(&mut self, len: usize) -> usize {
        let v = self.indices[self.next_index % self.indices.len()];
        self.next_index += 1;
        v % len
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fades(&self) -> Vec<&AppEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::FadeStarted { .. }))
            .collect()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
