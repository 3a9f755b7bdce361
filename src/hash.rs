//! Deterministic hashing utilities for structure fingerprints
//!
//! Provides cross-process deterministic hashing using blake3.

use std::hash::Hasher;

use crate::fingerprint::Fingerprint;

// =============================================================================
// StableHasher - Builder Pattern
// =============================================================================

/// A deterministic hasher using blake3
///
/// Works both as a by-value builder (`update_*`) and as a `std::hash::Hasher`,
/// so view models can feed it with `#[derive(Hash)]` data:
///
/// ```
/// use std::hash::Hash;
/// use structure_kit::StableHasher;
///
/// let mut hasher = StableHasher::new().update_str("city");
/// "Lisbon".hash(&mut hasher);
/// let fingerprint = hasher.into_fingerprint();
/// assert_eq!(fingerprint, {
///     let mut again = StableHasher::new().update_str("city");
///     "Lisbon".hash(&mut again);
///     again.into_fingerprint()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Update with a string (length-prefixed, so adjacent strings never alias)
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update_usize(s.len()).update(s.as_bytes())
    }

    /// Update with a u64 value (little-endian)
    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Update with a usize value (little-endian, widened to u64)
    #[inline]
    pub fn update_usize(self, v: usize) -> Self {
        self.update_u64(v as u64)
    }

    /// Finish and return the hash as u64
    ///
    /// Takes the first 8 bytes of blake3 output as little-endian u64.
    #[inline]
    pub fn finish_u64(&self) -> u64 {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Finish and wrap the hash as a [`Fingerprint`]
    #[inline]
    pub fn into_fingerprint(self) -> Fingerprint {
        Fingerprint::from_raw(self.finish_u64())
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for StableHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.finish_u64()
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }
}
