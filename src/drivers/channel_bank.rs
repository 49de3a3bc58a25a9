//! Channel bank — N PCA9685 chips presented as one flat channel array.
//!
//! Chip `k` sits at `base_address + k` and owns channels `[16k, 16k + 16)`.
//! The final chip may have fewer usable channels; its unused tail is always
//! written as 0 (off) so every chip receives a full 16-value frame.
//!
//! There is no dirty tracking: every update refreshes every chip, in chip
//! order, before returning.

use log::info;

use super::pca9685::{CHANNELS_PER_CHIP, MAX_ADDRESS, Pca9685};
use crate::app::ports::BusPort;
use crate::error::{RangeError, Result, TransportError};

pub struct ChannelBank<B: BusPort> {
    bus: B,
    chips: Vec<Pca9685>,
    channel_count: usize,
}

impl<B: BusPort> ChannelBank<B> {
    /// Build the bank and initialise every chip.
    pub fn new(mut bus: B, base_address: u8, channel_count: usize) -> Result<Self> {
        if channel_count == 0 {
            return Err(RangeError::NoChannels.into());
        }
        let chip_count = channel_count.div_ceil(CHANNELS_PER_CHIP);
        let last_address = u8::try_from(usize::from(base_address) + chip_count - 1)
            .ok()
            .filter(|&a| a <= MAX_ADDRESS)
            .ok_or(RangeError::AddressOverflow {
                base: base_address,
                chips: chip_count,
            })?;
        let chips: Vec<Pca9685> = (base_address..=last_address).map(Pca9685::new).collect();

        for chip in &chips {
            chip.initialize(&mut bus)?;
        }
        info!(
            "Channel bank: {} channels on {} chip(s) from 0x{:02x}",
            channel_count, chip_count, base_address
        );

        Ok(Self {
            bus,
            chips,
            channel_count,
        })
    }

    /// Usable channels (≤ chips × 16).
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn chip_count(&self) -> usize {
        self.chips.len()
    }

    /// `(chip index, in-chip offset)` for a flat channel index.
    pub fn locate(&self, channel: usize) -> Option<(usize, usize)> {
        (channel < self.channel_count)
            .then(|| (channel / CHANNELS_PER_CHIP, channel % CHANNELS_PER_CHIP))
    }

    /// Push one full frame of duty values, one per usable channel.
    pub fn update(&mut self, duties: &[u16]) -> Result<()> {
        if duties.len() != self.channel_count {
            return Err(RangeError::LengthMismatch {
                expected: self.channel_count,
                actual: duties.len(),
            }
            .into());
        }
        self.write_frame(duties)?;
        Ok(())
    }

    fn write_frame(&mut self, duties: &[u16]) -> core::result::Result<(), TransportError> {
        for (chip, slice) in self.chips.iter().zip(duties.chunks(CHANNELS_PER_CHIP)) {
            let mut levels = [0u16; CHANNELS_PER_CHIP];
            levels[..slice.len()].copy_from_slice(slice);
            chip.update(&mut self.bus, &levels)?;
        }
        Ok(())
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}
