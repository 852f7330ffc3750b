//! Room code generation and parsing
//!
//! This module provides the short codes used to identify rooms. Codes are
//! six base-36 characters so they stay easy to read out loud or type on a
//! phone, and they are case-normalized so `a1b2c3` and `A1B2C3` refer to
//! the same room.

use std::{fmt::Display, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::constants::room::CODE_LENGTH;

/// Digits used for the base-36 display form
const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of distinct room codes (36^6)
const CODE_SPACE: u32 = 36u32.pow(CODE_LENGTH as u32);

/// A short identifier for a room
///
/// Room codes are generated randomly and displayed as six uppercase
/// base-36 characters. Uniqueness is only enforced among currently-live
/// rooms by the registry, not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay)]
pub struct RoomCode(u32);

impl RoomCode {
    /// Creates a new random room code
    ///
    /// The caller is responsible for checking collisions against live
    /// rooms; see [`crate::registry::RoomRegistry::create`].
    pub fn random() -> Self {
        Self(fastrand::u32(0..CODE_SPACE))
    }
}

impl Display for RoomCode {
    /// Formats the code as six uppercase base-36 characters
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buffer = [DIGITS[0]; CODE_LENGTH];
        let mut value = self.0;
        for slot in buffer.iter_mut().rev() {
            *slot = DIGITS[(value % 36) as usize];
            value /= 36;
        }
        f.write_str(std::str::from_utf8(&buffer).expect("base-36 digits are ascii"))
    }
}

/// Errors that can occur when parsing a room code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRoomCodeError {
    /// The string is not exactly [`CODE_LENGTH`] characters long
    #[error("room code must be {CODE_LENGTH} characters")]
    BadLength,
    /// The string contains a character outside 0-9 and A-Z
    #[error("room code contains an invalid character")]
    BadDigit,
}

impl FromStr for RoomCode {
    type Err = ParseRoomCodeError;

    /// Parses a room code, accepting either case
    ///
    /// # Errors
    ///
    /// Returns [`ParseRoomCodeError`] if the string has the wrong length
    /// or contains characters outside the base-36 alphabet. Sign prefixes
    /// are rejected too, so every accepted string is exactly six base-36
    /// digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != CODE_LENGTH {
            return Err(ParseRoomCodeError::BadLength);
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ParseRoomCodeError::BadDigit);
        }
        u32::from_str_radix(s, 36)
            .map(Self)
            .map_err(|_| ParseRoomCodeError::BadDigit)
    }
}
