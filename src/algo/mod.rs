//! Algorithms: structure diff

pub mod diff;

pub use diff::{RowMove, SectionMove, StructureDiff, diff, diff_snapshots};
