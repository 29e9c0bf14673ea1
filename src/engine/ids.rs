//! Entity id generation.

use rand::Rng;

/// Generate a random 8-byte hex id with a short type prefix, e.g.
/// `grp_1f8a0c92d4e6b371`.
pub fn new_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 8] = rng.random();
    format!("{}_{}", prefix, hex::encode(bytes))
}
