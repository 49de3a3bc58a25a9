//! Keyboard adapters.
//!
//! - [`NoKeyboard`] — no input device; every poll just sleeps out its
//!   timeout, so the daemon keeps idle-cycling on its own.
//! - **`feature = "hardware"`** — [`EvdevKeyboard`] reads the first Linux
//!   input device (normally a USB numeric keypad) and grabs it so key
//!   presses do not leak into a console.

use core::time::Duration;

use crate::app::ports::KeySource;

/// Stand-in for a missing input device.
#[derive(Debug, Default)]
pub struct NoKeyboard;

impl KeySource for NoKeyboard {
    fn poll_active(&mut self, timeout: Duration) -> Option<Vec<u16>> {
        std::thread::sleep(timeout);
        None
    }
}

#[cfg(feature = "hardware")]
pub use evdev_impl::{EvdevKeyboard, Keyboard};

#[cfg(feature = "hardware")]
mod evdev_impl {
    use core::time::Duration;
    use std::os::fd::AsRawFd;

    use log::{info, warn};

    use super::NoKeyboard;
    use crate::app::ports::KeySource;

    enum Readiness {
        Timeout,
        Ready,
        /// Unplugged, or poll itself failed.
        Lost,
    }

    pub struct EvdevKeyboard {
        device: evdev::Device,
    }

    impl EvdevKeyboard {
        /// Open and grab the first enumerated input device.
        pub fn open_first() -> Option<Self> {
            let (path, mut device) = evdev::enumerate().next()?;
            info!(
                "Opening keyboard at {} ({})",
                path.display(),
                device.name().unwrap_or("unnamed")
            );
            if let Err(e) = device.grab() {
                warn!("Could not grab {}: {}", path.display(), e);
            }
            Some(Self { device })
        }

        /// Wait for the device fd to become readable.
        fn wait_readable(&self, timeout: Duration) -> Readiness {
            let mut pfd = libc::pollfd {
                fd: self.device.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            };
            let ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
            // SAFETY: `pfd` is a valid, exclusively borrowed pollfd and the
            // count passed matches the single entry.
            let ready = unsafe { libc::poll(&mut pfd, 1, ms) };
            if ready < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    return Readiness::Timeout;
                }
                warn!("Keyboard poll failed: {}", err);
                return Readiness::Lost;
            }
            if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
                return Readiness::Lost;
            }
            if ready > 0 && pfd.revents & libc::POLLIN != 0 {
                Readiness::Ready
            } else {
                Readiness::Timeout
            }
        }

        fn read_active(&mut self) -> std::io::Result<Vec<u16>> {
            // Drain the queue; only the resulting key state matters.
            for _event in self.device.fetch_events()? {}
            let keys = self.device.get_key_state()?;
            Ok(keys.iter().map(|k| k.code()).collect())
        }
    }

    /// Whichever input the host actually has.
    pub enum Keyboard {
        Evdev(EvdevKeyboard),
        Absent(NoKeyboard),
    }

    impl Keyboard {
        /// First input device, or [`NoKeyboard`] with a warning.
        pub fn detect() -> Self {
            match EvdevKeyboard::open_first() {
                Some(k) => Self::Evdev(k),
                None => {
                    warn!("No keyboard connected, running in idle-cycle mode");
                    Self::Absent(NoKeyboard)
                }
            }
        }
    }

    impl KeySource for Keyboard {
        fn poll_active(&mut self, timeout: Duration) -> Option<Vec<u16>> {
            let kbd = match self {
                Self::Absent(none) => return none.poll_active(timeout),
                Self::Evdev(kbd) => kbd,
            };

            match kbd.wait_readable(timeout) {
                Readiness::Timeout => None,
                Readiness::Ready => match kbd.read_active() {
                    Ok(keys) => Some(keys),
                    Err(e) => {
                        warn!("Keyboard read failed: {}", e);
                        None
                    }
                },
                Readiness::Lost => {
                    warn!("Keyboard lost, continuing without input");
                    *self = Self::Absent(NoKeyboard);
                    None
                }
            }
        }
    }
}
