//! structure-kit - Declarative sections and rows for native list views
//!
//! ## Core Concepts
//!
//! **Structures, not index paths**: the caller describes what a list shows
//! as an ordered list of keyed [`Section`]s holding row view models. Every
//! new structure is diffed against the previous one and applied to the
//! list view as a single animated batch.
//!
//! **Capability-based diffing**: rows opt into matching through
//! [`Identifiable`] and into in-place reloads through [`ContentComparable`].
//! Both are reduced to 64-bit [`Fingerprint`]s, so the previous structure is
//! retained as a light [`Snapshot`] only.
//!
//! ## Modules
//! - `structure`: Rows, sections, headers/footers and cast snapshots
//! - `algo`: Structure diff
//! - `controller`: Commit flow, batch application, user reorder
//! - `surface`: List view adapter trait and animation rules
//! - `fingerprint` / `hash`: Stable fingerprints
//!
//! ## Usage
//!
//! ```
//! use std::hash::Hash;
//! use structure_kit::{ContentComparable, Identifiable, Row, Section, Snapshot, StableHasher, Surface};
//!
//! struct City {
//!     id: u32,
//!     name: &'static str,
//! }
//!
//! impl Row for City {
//!     fn as_identifiable(&self) -> Option<&dyn Identifiable> {
//!         Some(self)
//!     }
//!
//!     fn as_content_comparable(&self) -> Option<&dyn ContentComparable> {
//!         Some(self)
//!     }
//! }
//!
//! impl Identifiable for City {
//!     fn identity_hash(&self, state: &mut StableHasher) {
//!         self.id.hash(state);
//!     }
//! }
//!
//! impl ContentComparable for City {
//!     fn content_hash(&self, state: &mut StableHasher) {
//!         self.name.hash(state);
//!     }
//! }
//!
//! let before = vec![Section::new("pt").with_rows([
//!     City { id: 1, name: "Lisbon" },
//!     City { id: 2, name: "Porto" },
//! ])];
//! let after = vec![Section::new("pt").with_rows([
//!     City { id: 2, name: "Oporto" },
//!     City { id: 1, name: "Lisbon" },
//! ])];
//!
//! let snapshot = Snapshot::cast(&before, Surface::Table);
//! let diff = structure_kit::diff(&snapshot, &after, Surface::Table).unwrap();
//! assert_eq!(diff.rows_to_move.len(), 2);
//! assert_eq!(diff.rows_to_reload.len(), 1);
//! ```
//!
//! With a list view, hand structures to a [`StructureController`] instead:
//! it keeps the snapshots, drives the [`ListView`] adapter and falls back to
//! a full reload whenever an animated update is not possible.

// =============================================================================
// Modules
// =============================================================================

/// Stable hashing
pub mod hash;

/// Identity and content fingerprints
pub mod fingerprint;

/// Index paths
pub mod index;

/// Error types
pub mod error;

/// Surfaces, animation rules and the list view adapter
pub mod surface;

/// Rows, sections and snapshots
pub mod structure;

/// Algorithms: structure diff
pub mod algo;

/// Commit flow and reload application
pub mod controller;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Hashing and identity
pub use fingerprint::Fingerprint;
pub use hash::StableHasher;
pub use index::{IndexPath, IndexSet};

// Error types
pub use error::{StructureError, StructureResult};

// Surfaces
pub use surface::{AnimationRule, ListView, RowAnimation, Surface};

// Structure types
pub use structure::{
    CastRow, CastSection, ContentComparable, HeaderFooter, HeaderFooterView, Identifiable,
    ReuseIdentifier, Row, Section, SectionId, Snapshot, Structure,
};

// Algorithms
pub use algo::{RowMove, SectionMove, StructureDiff, diff, diff_snapshots};

// Controller
pub use controller::{
    CommitOutcome, Completion, ControllerConfig, PendingUpdate, ReloadReason, SharedController,
    StructureController,
};
