//! `BusPort` over any `embedded-hal` 1.0 I2C implementation.
//!
//! A register block write is one I2C write transaction: the start register
//! followed by the data bytes.  The payload limit is configured rather than
//! probed; SMBus-style adapters cap it at 32 bytes.

use embedded_hal::i2c::{Error as _, I2c};
use heapless::Vec;
use log::warn;

use crate::app::ports::BusPort;
use crate::error::TransportError;

/// Register byte plus one full PCA9685 register set.
const FRAME_CAPACITY: usize = 65;

pub struct I2cBus<I2C> {
    i2c: I2C,
    max_block_len: usize,
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C, max_block_len: usize) -> Self {
        Self {
            i2c,
            max_block_len: max_block_len.min(FRAME_CAPACITY - 1),
        }
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BusPort for I2cBus<I2C> {
    fn max_block_len(&self) -> usize {
        self.max_block_len
    }

    fn write_block(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        let too_large = TransportError::PayloadTooLarge {
            len: data.len(),
            max: self.max_block_len,
        };
        if data.len() > self.max_block_len {
            return Err(too_large);
        }

        let mut frame: Vec<u8, FRAME_CAPACITY> = Vec::new();
        frame.push(register).map_err(|_| too_large)?;
        frame.extend_from_slice(data).map_err(|_| too_large)?;

        self.i2c.write(address, &frame).map_err(|e| {
            let kind = e.kind();
            warn!("I2C write 0x{:02x}/0x{:02x} failed: {:?}", address, register, kind);
            TransportError::Write {
                address,
                register,
                kind,
            }
        })
    }
}
