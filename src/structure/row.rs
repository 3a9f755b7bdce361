//! Row view models and their capabilities.
//!
//! # Capabilities
//!
//! A row opts into diffing through two optional capabilities, queried with
//! typed casts rather than reflection:
//!
//! | Capability | Enables | When absent |
//! |---|---|---|
//! | [`Identifiable`] | matching across updates (moves) | always delete + insert |
//! | [`ContentComparable`] | reload on content change | never reloaded |
//!
//! ```
//! use std::hash::Hash;
//! use structure_kit::{ContentComparable, Identifiable, Row, StableHasher};
//!
//! struct CityRow {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl Row for CityRow {
//!     fn as_identifiable(&self) -> Option<&dyn Identifiable> {
//!         Some(self)
//!     }
//!
//!     fn as_content_comparable(&self) -> Option<&dyn ContentComparable> {
//!         Some(self)
//!     }
//! }
//!
//! impl Identifiable for CityRow {
//!     fn identity_hash(&self, state: &mut StableHasher) {
//!         self.id.hash(state);
//!     }
//! }
//!
//! impl ContentComparable for CityRow {
//!     fn content_hash(&self, state: &mut StableHasher) {
//!         self.name.hash(state);
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use compact_str::CompactString;

use crate::hash::StableHasher;
use crate::surface::Surface;

// =============================================================================
// ReuseIdentifier
// =============================================================================

/// Identifier of the reusable view a model is displayed with.
///
/// Also the type discriminator of identity fingerprints: models of one
/// concrete type share it, and therefore share an identity namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReuseIdentifier(CompactString);

impl ReuseIdentifier {
    /// Create a reuse identifier from a name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self(name.into())
    }

    /// Reuse identifier derived from a type name, without its module path.
    ///
    /// `my_app::rows::CityRow` becomes `CityRow`; generic arguments are kept
    /// in their short form (`Wrapper<CityRow>`).
    pub fn of<T: ?Sized>() -> Self {
        Self(short_type_name(std::any::type_name::<T>()))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReuseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReuseIdentifier({})", self.0)
    }
}

impl fmt::Display for ReuseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn short_type_name(full: &str) -> CompactString {
    let mut out = CompactString::default();
    let mut segment_start = 0;
    for (i, ch) in full.char_indices() {
        match ch {
            ':' => segment_start = i + 1,
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                out.push_str(&full[segment_start..i]);
                out.push(ch);
                segment_start = i + ch.len_utf8();
            }
            _ => {}
        }
    }
    out.push_str(&full[segment_start..]);
    out
}

// =============================================================================
// Capabilities
// =============================================================================

/// Row capability: a stable identity across updates.
///
/// Feed only data that identifies the logical entity (a database id, a
/// slug). The row's view type and the target surface are mixed in by the
/// library.
pub trait Identifiable {
    /// Feed identity data into `state`.
    fn identity_hash(&self, state: &mut StableHasher);
}

/// Row capability: a fingerprint of what the row displays.
pub trait ContentComparable {
    /// Feed visual content into `state`.
    fn content_hash(&self, state: &mut StableHasher);
}

// =============================================================================
// Row
// =============================================================================

/// A row view model.
///
/// Owned by the caller; the library only reads fingerprints from it.
pub trait Row: Any {
    /// Reusable view identifier for `surface`.
    ///
    /// Defaults to the model's short type name on every surface.
    fn reuse_identifier(&self, surface: Surface) -> ReuseIdentifier {
        let _ = surface;
        ReuseIdentifier::of::<Self>()
    }

    /// The identity capability, if this model supports it.
    fn as_identifiable(&self) -> Option<&dyn Identifiable> {
        None
    }

    /// The content capability, if this model supports it.
    fn as_content_comparable(&self) -> Option<&dyn ContentComparable> {
        None
    }

    /// Called once the row belongs to a superseded structure.
    fn invalidated(&self) {}
}

impl dyn Row {
    /// Downcast to the concrete model type.
    pub fn downcast_ref<T: Row>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Whether the concrete model type is `T`.
    pub fn is<T: Row>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }
}

impl fmt::Debug for dyn Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("reuse_identifier", &self.reuse_identifier(Surface::Table))
            .field("identifiable", &self.as_identifiable().is_some())
            .field("content_comparable", &self.as_content_comparable().is_some())
            .finish()
    }
}
