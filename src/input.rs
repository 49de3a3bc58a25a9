//! Keypad decoding and key-down edge detection.
//!
//! The key source reports the set of keys held *now*.  [`KeyboardInput`]
//! turns that level signal into single key-down events: a key is reported
//! when it appears in the set and stays silent until it has left it again,
//! whatever the other keys do meanwhile.  When several keys go down between
//! two polls only the lowest code is reported.
//!
//! | Key       | Code | Action                     |
//! |-----------|------|----------------------------|
//! | KP0       | 82   | all off                    |
//! | KP1..KP9  | 79.. | constellation 0..8         |
//! | KP.       | 83   | random pattern             |
//! | KP+       | 78   | brighten                   |
//! | KP-       | 74   | dim                        |

use core::time::Duration;

use log::debug;

use crate::app::commands::KeyAction;
use crate::app::ports::KeySource;

pub const KEY_KP7: u16 = 71;
pub const KEY_KP8: u16 = 72;
pub const KEY_KP9: u16 = 73;
pub const KEY_KPMINUS: u16 = 74;
pub const KEY_KP4: u16 = 75;
pub const KEY_KP5: u16 = 76;
pub const KEY_KP6: u16 = 77;
pub const KEY_KPPLUS: u16 = 78;
pub const KEY_KP1: u16 = 79;
pub const KEY_KP2: u16 = 80;
pub const KEY_KP3: u16 = 81;
pub const KEY_KP0: u16 = 82;
pub const KEY_KPDOT: u16 = 83;

/// Keypad digit for a key code.
fn keypad_digit(code: u16) -> Option<usize> {
    let digit = match code {
        KEY_KP0 => 0,
        KEY_KP1 => 1,
        KEY_KP2 => 2,
        KEY_KP3 => 3,
        KEY_KP4 => 4,
        KEY_KP5 => 5,
        KEY_KP6 => 6,
        KEY_KP7 => 7,
        KEY_KP8 => 8,
        KEY_KP9 => 9,
        _ => return None,
    };
    Some(digit)
}

/// Decode a key code through the fixed keypad table.
pub fn decode(code: u16) -> Option<KeyAction> {
    if let Some(digit) = keypad_digit(code) {
        return Some(match digit {
            0 => KeyAction::AllOff,
            n => KeyAction::SelectConstellation(n - 1),
        });
    }
    match code {
        KEY_KPDOT => Some(KeyAction::Random),
        KEY_KPPLUS => Some(KeyAction::Brighten),
        KEY_KPMINUS => Some(KeyAction::Dim),
        _ => None,
    }
}

/// Edge-triggered wrapper around a [`KeySource`].
pub struct KeyboardInput<K> {
    source: K,
    /// Keys seen held at the previous report.
    held: Vec<u16>,
}

impl<K: KeySource> KeyboardInput<K> {
    pub fn new(source: K) -> Self {
        Self {
            source,
            held: Vec::new(),
        }
    }

    /// Wait up to `timeout`; yield a key code only on a fresh key-down.
    pub fn poll(&mut self, timeout: Duration) -> Option<u16> {
        let active = self.source.poll_active(timeout)?;

        let pressed = active.iter().copied().find(|code| !self.held.contains(code));
        self.held = active;
        if let Some(code) = pressed {
            debug!("Key down: {}", code);
        }
        pressed
    }

    pub fn source(&self) -> &K {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut K {
        &mut self.source
    }
}
