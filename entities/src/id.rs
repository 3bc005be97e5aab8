//! Collision-resistant opaque ID generation.

use rand::RngExt;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_CHARS: usize = 6;

/// Generates an ID of the form `<prefix>_<token>`.
///
/// The token is the current Unix-millisecond timestamp in base 36 followed by
/// six random base-36 characters, which keeps same-millisecond collisions
/// negligible at this application's write volume. IDs are approximately
/// time-correlated, not sortable. Never blocks, never fails.
pub fn generate(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let mut token = base36(u128::from(millis));
    let mut rng = rand::rng();
    for _ in 0..RANDOM_CHARS {
        token.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
    }
    format!("{prefix}_{token}")
}

fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    let mut encoded = String::with_capacity(digits.len());
    for digit in digits.iter().rev() {
        encoded.push(*digit as char);
    }
    encoded
}
