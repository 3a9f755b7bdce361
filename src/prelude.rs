//! Prelude module for common imports.
//!
//! ```
//! use structure_kit::prelude::*;
//! ```

// Structure types
pub use crate::structure::{
    ContentComparable, HeaderFooter, HeaderFooterView, Identifiable, ReuseIdentifier, Row,
    Section, SectionId, Structure,
};

// Hashing
pub use crate::hash::StableHasher;

// Surfaces
pub use crate::surface::{AnimationRule, ListView, RowAnimation, Surface};

// Index paths
pub use crate::index::{IndexPath, IndexSet};

// Controller
pub use crate::controller::{CommitOutcome, Completion, ControllerConfig, StructureController};

// Error types
pub use crate::error::{StructureError, StructureResult};
