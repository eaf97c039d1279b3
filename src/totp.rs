//! Time-based one-time codes (RFC 6238) with a strict zero-drift policy.

use std::time::{SystemTime, UNIX_EPOCH};

use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};

use crate::hotp::hotp;
use crate::{base32, uri, Code, TotpError};

/// Width of a time bucket in seconds.
pub const STEP_SECONDS: u64 = 30;

/// Base32 characters in a generated secret, 160 bits of key material.
pub const SECRET_LENGTH: usize = 32;

/// Generates a fresh shared secret from the operating system CSPRNG.
pub fn generate_secret() -> String {
    generate_secret_with(&mut OsRng)
}

/// Generates a fresh shared secret from the provided random source.
///
/// The `CryptoRng` bound keeps non-cryptographic generators out of secret
/// material; tests can inject a seeded `StdRng`. The alphabet size divides
/// the generator's range, so the draw is uniform.
pub fn generate_secret_with<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    (0..SECRET_LENGTH)
        .map(|_| base32::ALPHABET[rng.gen_range(0..base32::ALPHABET.len())] as char)
        .collect()
}

/// A time-based code generator bound to one enrolled secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totp {
    pub(crate) secret: String,
}

impl Totp {
    /// Wraps a persisted base32 secret.
    ///
    /// The secret is validated when a code is first derived from it, not
    /// here; persistence and revocation stay with the caller.
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// The base32 secret, for the caller to persist.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Generates the code for the time bucket containing `unix_seconds`.
    pub fn generate_at(&self, unix_seconds: u64) -> Result<Code, TotpError> {
        let counter = unix_seconds / STEP_SECONDS;
        let key = base32::decode(&self.secret)?;

        Ok(hotp(&key, counter))
    }

    /// Generates the code for the current wall-clock time.
    pub fn generate(&self) -> Result<Code, TotpError> {
        self.generate_at(unix_now()?)
    }

    /// Checks a candidate code against the bucket containing
    /// `unix_seconds`.
    ///
    /// Only that bucket is accepted; callers needing clock-drift tolerance
    /// must check adjacent buckets themselves. A wrong code is `Ok(false)`,
    /// never an error. The comparison is constant-time.
    pub fn verify_at(&self, candidate: &str, unix_seconds: u64) -> Result<bool, TotpError> {
        let expected = self.generate_at(unix_seconds)?.to_string();

        Ok(constant_time_eq(
            expected.as_bytes(),
            candidate.as_bytes(),
        ))
    }

    /// Checks a candidate code against the current wall-clock bucket.
    pub fn verify(&self, candidate: &str) -> Result<bool, TotpError> {
        self.verify_at(candidate, unix_now()?)
    }

    /// Formats the provisioning URI consumed by authenticator apps.
    ///
    /// A missing issuer defaults to `"Marketplace Services"`. The account
    /// and issuer labels are percent-encoded.
    pub fn to_uri(&self, account: &str, issuer: Option<&str>) -> Result<String, TotpError> {
        uri::to_uri(self, account, issuer)
    }

    /// Parses a provisioning URI back into a generator.
    ///
    /// URIs declaring an algorithm, digit count, or period outside the
    /// fixed SHA-1/6/30 profile are rejected.
    pub fn from_uri(uri: &str) -> Result<Self, TotpError> {
        uri::from_uri(uri)
    }
}

fn unix_now() -> Result<u64, TotpError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|_| TotpError::ClockBeforeUnixEpoch)
}
