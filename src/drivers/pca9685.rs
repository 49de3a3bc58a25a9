//! PCA9685 16-channel, 12-bit PWM driver.
//!
//! ## Register layout
//!
//! | Register      | Address          | Use                                 |
//! |---------------|------------------|-------------------------------------|
//! | MODE1         | 0x00             | auto-increment, sleep, restart      |
//! | MODE2         | 0x01             | output invert, totem-pole drive     |
//! | LEDn_ON_L..H  | 0x06 + 4n        | turn-on tick (always 0 here)        |
//! | LEDn_OFF_L..H | 0x08 + 4n        | turn-off tick = duty value          |
//!
//! Each update rewrites all 16 channel records.  With auto-increment on, a
//! single block starting at LED0_ON_L covers all 64 bytes.  If the
//! transport cannot carry 64 bytes the block is split into channels 0–7
//! and 8–15.  The split is not atomic: a failure between the halves leaves
//! channels 8–15 showing the previous frame.

use log::debug;

use crate::app::ports::BusPort;
use crate::error::TransportError;

pub const CHANNELS_PER_CHIP: usize = 16;
pub const BYTES_PER_CHANNEL: usize = 4;
/// Largest duty value (12 bits).
pub const MAX_DUTY: u16 = 0x0FFF;

const REGISTER_BLOCK_LEN: usize = CHANNELS_PER_CHIP * BYTES_PER_CHANNEL;
const HALF_CHANNELS: usize = CHANNELS_PER_CHIP / 2;

pub const MODE1: u8 = 0x00;
pub const MODE2: u8 = 0x01;
pub const LED0_ON_L: u8 = 0x06;

/// Highest 7-bit bus address a chip may answer at.
pub const MAX_ADDRESS: u8 = 0x7F;

/// RESTART=0, EXTCLK=0, AI=1, SLEEP=0, SUB1..3=0, ALLCALL=0
const MODE1_AUTO_INCREMENT: u8 = 0x20;
/// INVRT=1, OUTDRV=0 (open drain sink for the LED drivers)
const MODE2_INVERT: u8 = 0x10;

/// First register of channel `n`.
pub const fn led_base(n: usize) -> u8 {
    LED0_ON_L + (BYTES_PER_CHANNEL * n) as u8
}

/// One PCA9685 on the bus.  Holds nothing but its address; every update
/// overwrites the full register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pca9685 {
    address: u8,
}

impl Pca9685 {
    pub fn new(address: u8) -> Self {
        Self { address }
    }

    /// Put the chip in auto-increment mode with inverted outputs.
    pub fn initialize(&self, bus: &mut impl BusPort) -> Result<(), TransportError> {
        bus.write_block(self.address, MODE1, &[MODE1_AUTO_INCREMENT])?;
        bus.write_block(self.address, MODE2, &[MODE2_INVERT])?;
        debug!("PCA9685 0x{:02x} initialised", self.address);
        Ok(())
    }

    /// Write all 16 duty values (12-bit; higher bits are dropped).
    pub fn update(
        &self,
        bus: &mut impl BusPort,
        levels: &[u16; CHANNELS_PER_CHIP],
    ) -> Result<(), TransportError> {
        let regs = encode_registers(levels);

        if REGISTER_BLOCK_LEN <= bus.max_block_len() {
            return bus.write_block(self.address, LED0_ON_L, &regs);
        }

        for first in [0, HALF_CHANNELS] {
            let bytes = &regs[first * BYTES_PER_CHANNEL..(first + HALF_CHANNELS) * BYTES_PER_CHANNEL];
            bus.write_block(self.address, led_base(first), bytes)?;
        }
        Ok(())
    }
}

/// Lay out ON_L, ON_H, OFF_L, OFF_H for each channel.
fn encode_registers(levels: &[u16; CHANNELS_PER_CHIP]) -> [u8; REGISTER_BLOCK_LEN] {
    let mut regs = [0u8; REGISTER_BLOCK_LEN];
    for (record, &value) in regs.chunks_exact_mut(BYTES_PER_CHANNEL).zip(levels) {
        record[2] = (value & 0xFF) as u8;
        record[3] = ((value >> 8) & 0x0F) as u8;
    }
    regs
}
