//! Deterministic seed derivation for the technique generator (§4.H).

use sha2::{Digest, Sha256};

/// The 32-bit seed for `generate(wallet, classId, tier)`: the first 4
/// bytes of `SHA-256("{wallet}:{classId}:{tier}")`, big-endian.
#[must_use]
pub fn seed_from(wallet: &str, class_tag: &str, tier_tag: &str) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(wallet.as_bytes());
    hasher.update(b":");
    hasher.update(class_tag.as_bytes());
    hasher.update(b":");
    hasher.update(tier_tag.as_bytes());
    let digest = hasher.finalize();
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// The first 8 hex characters of a wallet address, lowercased, with an
/// optional `0x` prefix stripped -- used to build the technique id
/// `essence_{tier}_{hex8(wallet)}_{classId}`.
#[must_use]
pub fn hex8(wallet: &str) -> String {
    let trimmed = wallet.strip_prefix("0x").unwrap_or(wallet).to_lowercase();
    let mut out: String = trimmed.chars().filter(char::is_ascii_hexdigit).take(8).collect();
    while out.len() < 8 {
        out.push('0');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic() {
        let a = seed_from("0xabc123", "mage", "signature");
        let b = seed_from("0xabc123", "mage", "signature");
        assert_eq!(a, b);
    }

    #[test]
    fn seed_differs_by_tier() {
        let signature = seed_from("0xabc123", "mage", "signature");
        let ultimate = seed_from("0xabc123", "mage", "ultimate");
        assert_ne!(signature, ultimate);
    }

    #[test]
    fn hex8_strips_prefix_and_pads() {
        assert_eq!(hex8("0xAB").len(), 8);
        assert_eq!(&hex8("0xAB")[..2], "ab");
    }
}
