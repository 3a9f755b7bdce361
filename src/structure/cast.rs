//! Cast snapshots: structures reduced to fingerprints.
//!
//! A [`Snapshot`] keeps exactly what the differ needs from the previous
//! commit (section keys, row identity/content fingerprints, header/footer
//! content fingerprints) and nothing else, so view models are released as
//! soon as they are superseded.

use std::ops::Deref;

use super::row::Row;
use super::section::{HeaderFooter, Section, SectionId};
use crate::error::{StructureError, StructureResult};
use crate::fingerprint::Fingerprint;
use crate::index::IndexPath;
use crate::surface::Surface;

// =============================================================================
// CastRow / CastSection
// =============================================================================

/// Fingerprints of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastRow {
    /// Identity fingerprint, if the model is identifiable
    pub identity: Option<Fingerprint>,
    /// Content fingerprint, if the model is content-comparable
    pub content: Option<Fingerprint>,
}

impl CastRow {
    /// Create a cast row from raw fingerprints.
    pub const fn new(identity: Option<Fingerprint>, content: Option<Fingerprint>) -> Self {
        Self { identity, content }
    }

    /// Fingerprint a row model for `surface`.
    pub fn of(row: &dyn Row, surface: Surface) -> Self {
        let identity = row.as_identifiable().map(|identifiable| {
            Fingerprint::identity(identifiable, &row.reuse_identifier(surface), surface)
        });
        let content = row.as_content_comparable().map(Fingerprint::content);
        Self { identity, content }
    }
}

/// Fingerprints of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastSection {
    /// Section key
    pub identifier: SectionId,
    /// Row fingerprints, in order
    pub rows: Vec<CastRow>,
    /// Header content fingerprint
    pub header_content: Option<Fingerprint>,
    /// Footer content fingerprint
    pub footer_content: Option<Fingerprint>,
}

impl CastSection {
    /// Create an empty cast section.
    pub fn new(identifier: impl Into<SectionId>) -> Self {
        Self {
            identifier: identifier.into(),
            rows: Vec::new(),
            header_content: None,
            footer_content: None,
        }
    }

    /// Fingerprint a live section for `surface`.
    pub fn of(section: &Section, surface: Surface) -> Self {
        Self {
            identifier: section.identifier.clone(),
            rows: section
                .rows
                .iter()
                .map(|row| CastRow::of(row.as_ref(), surface))
                .collect(),
            header_content: section.header.as_ref().and_then(header_footer_content),
            footer_content: section.footer.as_ref().and_then(header_footer_content),
        }
    }
}

/// Text hashes its title; a view hashes its content when it can.
fn header_footer_content(header_footer: &HeaderFooter) -> Option<Fingerprint> {
    match header_footer {
        HeaderFooter::Text(text) => Some(Fingerprint::text(text)),
        HeaderFooter::View(view) => view.as_content_comparable().map(Fingerprint::content),
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Immutable fingerprint copy of a committed structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    sections: Vec<CastSection>,
}

impl Snapshot {
    /// Empty snapshot (nothing rendered yet).
    pub const fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Build a snapshot from cast sections.
    pub fn from_sections(sections: Vec<CastSection>) -> Self {
        Self { sections }
    }

    /// Fingerprint a live structure for `surface`.
    ///
    /// Pure: reads the models, keeps no reference to them.
    pub fn cast(structure: &[Section], surface: Surface) -> Self {
        Self {
            sections: structure
                .iter()
                .map(|section| CastSection::of(section, surface))
                .collect(),
        }
    }

    /// Cast sections, in order.
    pub fn sections(&self) -> &[CastSection] {
        &self.sections
    }

    /// Number of rows in `section`, if it exists.
    pub fn row_count(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(|s| s.rows.len())
    }

    /// Row counts of every section.
    pub fn row_counts(&self) -> Vec<usize> {
        self.sections.iter().map(|s| s.rows.len()).collect()
    }

    /// Cast row at `path`.
    pub fn row(&self, path: IndexPath) -> Option<&CastRow> {
        self.sections.get(path.section)?.rows.get(path.item)
    }

    /// First position holding a row with identity `identity`.
    pub fn index_path_of(&self, identity: Fingerprint) -> Option<IndexPath> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_index, section)| {
                section
                    .rows
                    .iter()
                    .position(|row| row.identity == Some(identity))
                    .map(|item| IndexPath::new(section_index, item))
            })
    }

    /// Whether any row has identity `identity`.
    pub fn contains_identity(&self, identity: Fingerprint) -> bool {
        self.index_path_of(identity).is_some()
    }

    /// Mirror an in-place reorder performed by the user on the list view.
    ///
    /// `to` is interpreted after removal from `from`, like the live
    /// structure the snapshot mirrors.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfBounds`] if `from` does not
    /// address a row, or `to` is not a valid insertion point.
    pub fn move_row(&mut self, from: IndexPath, to: IndexPath) -> StructureResult<()> {
        check_move(&self.row_counts(), from, to)?;
        let row = self.sections[from.section].rows.remove(from.item);
        self.sections[to.section].rows.insert(to.item, row);
        Ok(())
    }

    /// Consume the snapshot, returning its sections.
    pub fn into_sections(self) -> Vec<CastSection> {
        self.sections
    }
}

impl Deref for Snapshot {
    type Target = [CastSection];

    fn deref(&self) -> &Self::Target {
        &self.sections
    }
}

impl FromIterator<CastSection> for Snapshot {
    fn from_iter<I: IntoIterator<Item = CastSection>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

/// Validate a single-row move against per-section row counts.
pub(crate) fn check_move(counts: &[usize], from: IndexPath, to: IndexPath) -> StructureResult<()> {
    let from_ok = counts.get(from.section).is_some_and(|&n| from.item < n);
    if !from_ok {
        return Err(StructureError::IndexOutOfBounds { path: from });
    }
    // Destination count after the source row has been removed
    let to_ok = counts.get(to.section).is_some_and(|&n| {
        let n = if to.section == from.section { n - 1 } else { n };
        to.item <= n
    });
    if !to_ok {
        return Err(StructureError::IndexOutOfBounds { path: to });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
