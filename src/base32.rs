//! Decoding of unpadded RFC 4648 base32 secrets.

use crate::TotpError;

/// The RFC 4648 base32 alphabet. A character's index is its 5-bit value.
pub(crate) const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Decodes an unpadded base32 secret (given as an ASCII string) into a
/// byte string.
///
/// Input is case-insensitive and no padding characters are accepted. Each
/// character contributes 5 bits, concatenated in input order; every
/// complete byte of the stream is emitted and trailing bits that do not
/// fill a byte are discarded. A character outside the alphabet fails fast
/// with [`TotpError::InvalidSecretFormat`].
pub fn decode(secret: &str) -> Result<Vec<u8>, TotpError> {
    let mut accumulator: u32 = 0;
    let mut pending_bits: u32 = 0;
    let mut bytes = Vec::with_capacity(secret.len() * 5 / 8);

    for (position, character) in secret.chars().enumerate() {
        let value = match character.to_ascii_uppercase() {
            upper @ 'A'..='Z' => upper as u32 - 'A' as u32,
            upper @ '2'..='7' => upper as u32 - '2' as u32 + 26,
            _ => return Err(TotpError::InvalidSecretFormat { character, position }),
        };

        accumulator = (accumulator << 5) | value;
        pending_bits += 5;

        if pending_bits >= 8 {
            pending_bits -= 8;
            bytes.push((accumulator >> pending_bits) as u8);
        }
    }

    Ok(bytes)
}
