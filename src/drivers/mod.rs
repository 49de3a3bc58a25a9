//! PWM chip drivers and the bus they share.

pub mod bus;
pub mod channel_bank;
pub mod pca9685;
