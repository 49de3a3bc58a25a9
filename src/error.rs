//! Unified error types for the starfield daemon.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform.  Three families exist:
//!
//! - [`ConfigError`] — malformed or inconsistent resource/config files.
//!   Fatal at startup; the daemon never runs on a partial catalog.
//! - [`TransportError`] — a bus write failed.  Fatal, never retried.
//! - [`RangeError`] — a caller handed the fade engine or channel bank
//!   something of the wrong shape.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A resource or configuration file is invalid.
    Config(ConfigError),
    /// A bus write failed.
    Transport(TransportError),
    /// A vector or duration violated a shape precondition.
    Range(RangeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Range(e) => write!(f, "range: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration / resource errors
// ---------------------------------------------------------------------------

/// Errors raised while loading the mapping, constellation, or config files.
///
/// Line numbers are 1-based and refer to the offending resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    Io { path: String, kind: io::ErrorKind },
    /// A line could not be parsed.
    Parse { line: usize, reason: &'static str },
    /// The same star id appears twice in the mapping file.
    DuplicateStar { star: u32, line: usize },
    /// Two stars are mapped onto the same channel.
    DuplicateChannel { channel: usize, line: usize },
    /// A mapping entry names a channel outside the bank.
    ChannelOutOfRange {
        channel: usize,
        limit: usize,
        line: usize,
    },
    /// A constellation lists a star that has no mapping entry.
    UnknownStar { star: u32, line: usize },
    /// The mapping is empty and no channel count was configured.
    EmptyMapping,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

impl ConfigError {
    /// Star→channel mapping inconsistencies (the "MappingError" family).
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateStar { .. }
                | Self::DuplicateChannel { .. }
                | Self::ChannelOutOfRange { .. }
        )
    }

    /// A constellation references a star the mapping does not know.
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Self::UnknownStar { .. })
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, kind } => write!(f, "cannot read {path}: {kind}"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::DuplicateStar { star, line } => {
                write!(f, "line {line}: star {star} mapped more than once")
            }
            Self::DuplicateChannel { channel, line } => {
                write!(f, "line {line}: channel {channel} already has a star")
            }
            Self::ChannelOutOfRange {
                channel,
                limit,
                line,
            } => write!(
                f,
                "line {line}: channel {channel} out of range (bank has {limit})"
            ),
            Self::UnknownStar { star, line } => {
                write!(f, "line {line}: star {star} has no channel mapping")
            }
            Self::EmptyMapping => write!(f, "mapping file contains no entries"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Bus failures.  Never retried: a stuck bus fails identically on retry and
/// a visual device has no partial state worth recovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying bus rejected the block write.
    Write {
        address: u8,
        register: u8,
        kind: embedded_hal::i2c::ErrorKind,
    },
    /// The block exceeds the transport's maximum payload.
    PayloadTooLarge { len: usize, max: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write {
                address,
                register,
                kind,
            } => write!(
                f,
                "block write to 0x{address:02x} reg 0x{register:02x} failed: {kind}"
            ),
            Self::PayloadTooLarge { len, max } => {
                write!(f, "block of {len} bytes exceeds transport limit of {max}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Range errors
// ---------------------------------------------------------------------------

/// Shape violations.  These are programming errors that construction
/// normally prevents; they are still reported rather than panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// A channel vector has the wrong number of entries.
    LengthMismatch { expected: usize, actual: usize },
    /// A fade was requested with a zero duration.
    InvalidDuration,
    /// A channel bank was requested with no channels.
    NoChannels,
    /// The chips would run past the last 7-bit bus address.
    AddressOverflow { base: u8, chips: usize },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} channels, got {actual}")
            }
            Self::InvalidDuration => write!(f, "fade duration must be non-zero"),
            Self::NoChannels => write!(f, "channel bank needs at least one channel"),
            Self::AddressOverflow { base, chips } => {
                write!(f, "{chips} chips from 0x{base:02x} exceed the 7-bit address range")
            }
        }
    }
}

impl std::error::Error for RangeError {}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
