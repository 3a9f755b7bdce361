//! Error types for structure-kit.
//!
//! Every error here is recoverable the same way: the caller drops the
//! animated path and performs a full, unanimated reload.

use thiserror::Error;

use crate::fingerprint::Fingerprint;
use crate::index::IndexPath;
use crate::structure::SectionId;

/// Errors that can occur while diffing or applying a structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Two or more sections in the new structure share an identifier
    #[error("structure contains two or more sections with identifier {identifier:?}")]
    DuplicateSectionIdentifier {
        /// The repeated identifier
        identifier: SectionId,
    },

    /// Two or more rows in the new structure share an identity fingerprint
    #[error("structure contains two or more equal rows ({fingerprint} at {first} and {second})")]
    DuplicateRowIdentity {
        /// The repeated identity fingerprint
        fingerprint: Fingerprint,
        /// Position of the first occurrence
        first: IndexPath,
        /// Position of the repeated occurrence
        second: IndexPath,
    },

    /// A row deletion falls inside a section that is being moved
    #[error("attempt to delete row {path} in a moving section")]
    RowDeletionInMovedSection {
        /// Old position of the row
        path: IndexPath,
    },

    /// A row insertion falls inside a section that is being moved
    #[error("attempt to insert row {path} in a moving section")]
    RowInsertionInMovedSection {
        /// New position of the row
        path: IndexPath,
    },

    /// The list view's live counts disagree with the retained snapshot
    #[error("list view was mutated out of band: {}", describe_mismatch(.section, .expected, .found))]
    StructureMismatch {
        /// Section whose row count disagrees (`None` for the section count)
        section: Option<usize>,
        /// Count recorded in the snapshot
        expected: usize,
        /// Count reported by the list view
        found: usize,
    },

    /// The list view refused the batched update
    #[error("batch update rejected: {reason}")]
    BatchRejected {
        /// Reason reported by the list view adapter
        reason: String,
    },

    /// A shared controller was accessed while already in use further up
    /// the call stack
    #[error("controller is already in use by an enclosing commit or completion")]
    ReentrantAccess,

    /// An index path does not address an existing row
    #[error("index path {path} is out of bounds")]
    IndexOutOfBounds {
        /// Offending index path
        path: IndexPath,
    },
}

fn describe_mismatch(section: &Option<usize>, expected: &usize, found: &usize) -> String {
    match section {
        Some(section) => format!("section {section} has {found} rows, expected {expected}"),
        None => format!("{found} sections, expected {expected}"),
    }
}

/// Result type alias for structure operations.
pub type StructureResult<T> = Result<T, StructureError>;

impl StructureError {
    /// Create a batch rejection from any message.
    pub fn batch_rejected(reason: impl Into<String>) -> Self {
        Self::BatchRejected {
            reason: reason.into(),
        }
    }

    /// Whether the new structure itself is malformed (duplicate keys).
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSectionIdentifier { .. } | Self::DuplicateRowIdentity { .. }
        )
    }

    /// Whether the diff mixed row edits with a section move.
    pub fn is_moved_section_conflict(&self) -> bool {
        matches!(
            self,
            Self::RowDeletionInMovedSection { .. } | Self::RowInsertionInMovedSection { .. }
        )
    }
}
