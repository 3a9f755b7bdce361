//! Structure types: rows, sections and their cast snapshots.
//!
//! A *structure* is an ordered list of [`Section`]s, each holding rows of
//! caller-owned view models. Before diffing, a structure is reduced to a
//! [`Snapshot`]: the same shape, but only fingerprints, so the previous
//! update can be compared without keeping its view models alive.

mod cast;
mod row;
mod section;

pub use cast::{CastRow, CastSection, Snapshot};
pub(crate) use cast::check_move;
pub use row::{ContentComparable, Identifiable, ReuseIdentifier, Row};
pub use section::{HeaderFooter, HeaderFooterView, Section, SectionId};

/// An ordered list of sections.
pub type Structure = Vec<Section>;
