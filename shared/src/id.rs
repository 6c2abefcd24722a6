//! Time-ordered identifier generation
//!
//! UUID version 7: 48-bit unix millisecond timestamp in the high bytes,
//! the rest cryptographically random, with the RFC 9562 version and variant
//! bits set. Identifiers sort by creation time, which keeps B-tree inserts
//! append-mostly and needs no central sequence.
//!
//! On top of the plain v7 layout the generator is process-wide monotonic:
//! ids issued in sequence compare strictly greater than their predecessor
//! even within one millisecond.

use parking_lot::Mutex;
use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

/// Last issued id, as a big-endian u128. Guards monotonicity.
static LAST_ISSUED: Mutex<u128> = Mutex::new(0);

/// Generate a new time-ordered unique identifier.
///
/// Layout per RFC 9562 §5.7:
/// - bytes 0-5: 48-bit unix millisecond timestamp, big-endian
/// - byte 6: version nibble `0x7` over 4 random bits
/// - byte 8: variant bits `10` over 6 random bits
/// - everything else: random from the OS CSPRNG
pub fn new_id() -> Uuid {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);

    let millis = unix_millis();
    bytes[0] = (millis >> 40) as u8;
    bytes[1] = (millis >> 32) as u8;
    bytes[2] = (millis >> 24) as u8;
    bytes[3] = (millis >> 16) as u8;
    bytes[4] = (millis >> 8) as u8;
    bytes[5] = millis as u8;

    // Version 7, RFC 4122 variant
    bytes[6] = (bytes[6] & 0x0F) | 0x70;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;

    let mut candidate = u128::from_be_bytes(bytes);

    let mut last = LAST_ISSUED.lock();
    if candidate <= *last {
        // Same-millisecond collision with the previous id: bump past it.
        // The increment lands in the 62-bit random tail, which cannot
        // realistically carry into the variant bits.
        candidate = *last + 1;
    }
    *last = candidate;

    Uuid::from_u128(candidate)
}

/// New identifier rendered as the canonical hyphenated string.
///
/// Entity ids are stored and exchanged as strings; hex encoding preserves
/// the byte order, so string comparison matches u128 comparison.
pub fn new_id_string() -> String {
    new_id().to_string()
}

fn unix_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
