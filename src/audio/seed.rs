use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use crate::foundation::error::{MezzError, MezzResult};

/// A noise seed derived from free text.
///
/// Each character's code point is written as at least three decimal digits and the
/// digits are concatenated into one (arbitrarily large) integer. That integer, as
/// little-endian 32-bit words, is hashed into the generator seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseSeed {
    base: String,
    digits: String,
}

impl NoiseSeed {
    /// Derive a seed from `text`. Empty text is rejected.
    pub fn from_text(text: &str) -> MezzResult<Self> {
        if text.is_empty() {
            return Err(MezzError::invalid_parameter("noise seed must not be empty"));
        }
        let digits = text.chars().map(|c| format!("{:03}", u32::from(c))).collect();
        Ok(Self {
            base: text.to_string(),
            digits,
        })
    }

    /// The text the seed was derived from.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Concatenated decimal code points, leading zeros included.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The seed integer as little-endian 32-bit words. Zero is `[0]`.
    pub fn words(&self) -> Vec<u32> {
        let mut words: Vec<u32> = Vec::new();
        for d in self.digits.bytes() {
            let mut carry = u64::from(d - b'0');
            for w in &mut words {
                let v = u64::from(*w) * 10 + carry;
                *w = v as u32;
                carry = v >> 32;
            }
            if carry > 0 {
                words.push(carry as u32);
            }
        }
        if words.is_empty() {
            words.push(0);
        }
        words
    }

    /// 32-byte generator seed: SHA-256 over [`NoiseSeed::words`].
    pub fn rng_seed(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for w in self.words() {
            hasher.update(w.to_le_bytes());
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&hasher.finalize());
        seed
    }

    /// A freshly seeded generator. Same seed text, same stream, on every platform.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::from_seed(self.rng_seed())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/seed.rs"]
mod tests;
