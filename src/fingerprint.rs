//! Identity and content fingerprints
//!
//! Two kinds of fingerprint drive the differ:
//! - **Identity**: Hash(surface + reuse identifier + model identity data).
//!   Stable across updates, used to match "the same logical row".
//! - **Content**: Hash(model content data). Changes when the row should
//!   be redrawn, used only to decide reloads.
//!
//! # Domain Tags
//!
//! Every constructor seeds the hasher with a domain tag (`__identity__`,
//! `__content__`, `__text__`), so an identity fingerprint can never compare
//! equal to a content fingerprint built from the same bytes.

use std::fmt;

use crate::hash::StableHasher;
use crate::structure::{ContentComparable, Identifiable, ReuseIdentifier};
use crate::surface::Surface;

// =============================================================================
// Fingerprint
// =============================================================================

/// 64-bit fingerprint of a row, header or footer
///
/// # Memory Layout
///
/// - 8 bytes (u64)
/// - Copy, no heap allocation
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct Fingerprint(pub(crate) u64);

impl Fingerprint {
    /// Create a Fingerprint from a raw u64 value.
    ///
    /// Prefer `identity()` or `content()` for fingerprints of real models.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 representation
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Identity fingerprint of a model
    ///
    /// Hash is computed from:
    /// - The target surface (identities are surface-scoped)
    /// - The reuse identifier of the model's view type
    /// - Whatever the model feeds into `identity_hash`
    ///
    /// Two models of different view types never share an identity, even
    /// when their identity data is equal.
    pub fn identity(
        model: &dyn Identifiable,
        reuse_identifier: &ReuseIdentifier,
        surface: Surface,
    ) -> Self {
        let mut hasher = StableHasher::new()
            .update_str("__identity__")
            .update_str(surface.as_str())
            .update_str(reuse_identifier.as_str());
        model.identity_hash(&mut hasher);
        hasher.into_fingerprint()
    }

    /// Content fingerprint of a model
    pub fn content(model: &dyn ContentComparable) -> Self {
        let mut hasher = StableHasher::new().update_str("__content__");
        model.content_hash(&mut hasher);
        hasher.into_fingerprint()
    }

    /// Content fingerprint of a literal text header or footer
    #[inline]
    pub fn text(text: &str) -> Self {
        StableHasher::new()
            .update_str("__text__")
            .update_str(text)
            .into_fingerprint()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:016x})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
