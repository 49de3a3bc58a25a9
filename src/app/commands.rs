//! Inbound commands to the application service.
//!
//! Raw key codes are decoded into a [`KeyAction`] once, at the input
//! boundary; everything downstream matches on this closed set.

/// What a key press asks the display to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Fade to the constellation at this catalog index.
    SelectConstellation(usize),
    /// Fade every channel to zero.
    AllOff,
    /// Fade to an independent uniform random level per channel.
    Random,
    /// Raise global brightness one step.
    Brighten,
    /// Lower global brightness one step.
    Dim,
}
