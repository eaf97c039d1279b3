//! HMAC-based one-time codes (RFC 4226), fixed to SHA-1 and six digits.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::Code;

/// Digits in a derived code.
pub const DIGITS: u32 = 6;

/// Size of the code space, `10^DIGITS`.
const CODE_SPACE: u32 = 1_000_000;

/// Computes the one-time code for a raw key and counter.
///
/// The counter is encoded as 8 big-endian bytes and signed with HMAC-SHA1.
/// The 20-byte digest is then reduced with dynamic truncation (RFC 4226
/// §5.3): the low nibble of the last byte selects an offset, the 4 bytes
/// starting there are read as an unsigned big-endian word, and the top bit
/// is masked off before taking the result modulo the code space.
pub fn hotp(key: &[u8], counter: u64) -> Code {
    let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[19] & 0x0f) as usize;
    let word = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    Code::new((word & 0x7fff_ffff) % CODE_SPACE)
}
