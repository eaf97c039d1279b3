//! Time-based one-time passwords over the fixed profile used by the
//! marketplace backend: HMAC-SHA1, 6 digits, 30-second step, unpadded
//! base32 secrets.

pub mod base32;
pub mod hotp;
pub mod totp;
pub(crate) mod uri;

use core::num;
use std::fmt::Display;

pub use totp::{generate_secret, generate_secret_with, Totp};

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error("Invalid base32 character {character:?} at position {position} in secret")]
    InvalidSecretFormat { character: char, position: usize },
    #[error("System clock is set before the Unix epoch")]
    ClockBeforeUnixEpoch,
    #[error("Could not parse the URI")]
    UriParse(url::ParseError),
    #[error("The provided URI is not a TOTP provisioning URI, found {0}")]
    InvalidUriType(String),
    #[error("Could not retrieve the secret from the URI")]
    UriMissingSecret,
    #[error("Unsupported hashing algorithm, found {0}. Expected: SHA1")]
    UnsupportedAlgorithm(String),
    #[error("Unsupported digit count, found {0}. Expected: 6")]
    UnsupportedDigits(u32),
    #[error("Unsupported period, found {0}. Expected: 30")]
    UnsupportedPeriod(u64),
    #[error("Could not parse an integer. Failed parsing: {1}")]
    IntegerParse(num::ParseIntError, String),
}

/// A derived one-time code.
///
/// Displays as exactly six zero-padded decimal digits, the form a user
/// types back in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    code: u32,
}

impl Code {
    pub(crate) fn new(code: u32) -> Self {
        Self { code }
    }

    pub fn integer(&self) -> u32 {
        self.code
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0padding$}", self.code, padding = hotp::DIGITS as usize)
    }
}
