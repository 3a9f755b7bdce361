//! Structure Diff Algorithm
//!
//! Computes the batch operations that turn the previously rendered
//! structure (a [`Snapshot`]) into a new one.
//! This is a **pure algorithm module**: no list view, no I/O.
//!
//! # Architecture: Diff/Apply Separation
//!
//! ```text
//! diff(old_snapshot, new_structure) -> StructureDiff   // pure data
//!       |
//!       v
//! perform_batch(view, diff) + apply_deferred(view, diff)  // list view calls
//! ```
//!
//! # Algorithm
//!
//! 0. Reject duplicate section keys and duplicate row identities
//! 1. Walk old sections: record section moves/deletions, header/footer
//!    reloads, and for every old row its move, reload or deletion
//! 2. Walk new sections: record section and row insertions
//! 3. Resolve conflicts between operation classes that native batch APIs
//!    cannot mix on one element
//! 4. Reject row deletions/insertions inside moving sections
//!
//! # Coordinates
//!
//! Deletions and move sources use old positions. Insertions, move
//! destinations and reloads use new positions. Reloads are applied after
//! the batch, so a moved row may also be reloaded at its destination.
//!
//! # Complexity
//!
//! - Time: O(n) in the total number of rows (hash lookups)
//! - Space: O(n) for the lookup tables

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{StructureError, StructureResult};
use crate::fingerprint::Fingerprint;
use crate::index::{IndexPath, IndexSet};
use crate::structure::{Section, SectionId, Snapshot};
use crate::surface::Surface;

// =============================================================================
// Public Types
// =============================================================================

/// A section moving from one index to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionMove {
    /// Old section index
    pub from: usize,
    /// New section index
    pub to: usize,
}

/// A row moving from one position to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowMove {
    /// Old position
    pub from: IndexPath,
    /// New position
    pub to: IndexPath,
}

/// Operations bridging two structure snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct StructureDiff {
    /// Section moves, in old order
    pub sections_to_move: Vec<SectionMove>,
    /// Deleted sections (old indices)
    pub sections_to_delete: IndexSet,
    /// Inserted sections (new indices)
    pub sections_to_insert: IndexSet,
    /// Sections whose header changed (new indices)
    pub headers_to_reload: IndexSet,
    /// Sections whose footer changed (new indices)
    pub footers_to_reload: IndexSet,
    /// Row moves, in old order
    pub rows_to_move: Vec<RowMove>,
    /// Deleted rows (old positions, sorted)
    pub rows_to_delete: Vec<IndexPath>,
    /// Inserted rows (new positions, sorted)
    pub rows_to_insert: Vec<IndexPath>,
    /// Reloaded rows (new positions, sorted)
    pub rows_to_reload: Vec<IndexPath>,
}

impl StructureDiff {
    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.sections_to_move.is_empty()
            && self.sections_to_delete.is_empty()
            && self.sections_to_insert.is_empty()
            && self.headers_to_reload.is_empty()
            && self.footers_to_reload.is_empty()
            && self.rows_to_move.is_empty()
            && self.rows_to_delete.is_empty()
            && self.rows_to_insert.is_empty()
            && self.rows_to_reload.is_empty()
    }

    /// Total number of operations across all nine collections.
    pub fn operation_count(&self) -> usize {
        self.sections_to_move.len()
            + self.sections_to_delete.len()
            + self.sections_to_insert.len()
            + self.headers_to_reload.len()
            + self.footers_to_reload.len()
            + self.rows_to_move.len()
            + self.rows_to_delete.len()
            + self.rows_to_insert.len()
            + self.rows_to_reload.len()
    }

    /// Whether any operation must run inside a batched update scope.
    pub fn has_batch_operations(&self) -> bool {
        !(self.sections_to_move.is_empty()
            && self.sections_to_delete.is_empty()
            && self.sections_to_insert.is_empty()
            && self.rows_to_move.is_empty()
            && self.rows_to_delete.is_empty()
            && self.rows_to_insert.is_empty())
    }
}

impl fmt::Display for StructureDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sections to move: {:?}", self.sections_to_move)?;
        writeln!(f, "sections to delete: {:?}", self.sections_to_delete)?;
        writeln!(f, "sections to insert: {:?}", self.sections_to_insert)?;
        writeln!(f, "headers to reload: {:?}", self.headers_to_reload)?;
        writeln!(f, "footers to reload: {:?}", self.footers_to_reload)?;
        writeln!(f, "rows to move: {:?}", self.rows_to_move)?;
        writeln!(f, "rows to delete: {:?}", self.rows_to_delete)?;
        writeln!(f, "rows to insert: {:?}", self.rows_to_insert)?;
        write!(f, "rows to reload: {:?}", self.rows_to_reload)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff the previously rendered snapshot against a new live structure.
///
/// `surface` must be the surface `old` was cast for, since identity
/// fingerprints are surface-scoped.
///
/// # Errors
///
/// See [`diff_snapshots`].
pub fn diff(old: &Snapshot, new: &[Section], surface: Surface) -> StructureResult<StructureDiff> {
    diff_snapshots(old, &Snapshot::cast(new, surface))
}

/// Diff two snapshots.
///
/// No partial result is ever returned: on error the caller is expected to
/// reload the list view without animation.
///
/// # Errors
///
/// - [`StructureError::DuplicateSectionIdentifier`] if `new` repeats a section key
/// - [`StructureError::DuplicateRowIdentity`] if `new` repeats a row identity
/// - [`StructureError::RowDeletionInMovedSection`] if a row leaves a moving section
/// - [`StructureError::RowInsertionInMovedSection`] if a row enters a moving section
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> StructureResult<StructureDiff> {
    let mut ctx = DiffContext::new(old, new)?;
    ctx.detect_moves_and_deletions();
    ctx.detect_insertions();
    ctx.resolve_conflicts();
    ctx.check_moved_sections()?;
    let result = ctx.into_result();

    tracing::debug!(
        sections_moved = result.sections_to_move.len(),
        sections_deleted = result.sections_to_delete.len(),
        sections_inserted = result.sections_to_insert.len(),
        headers_reloaded = result.headers_to_reload.len(),
        footers_reloaded = result.footers_to_reload.len(),
        rows_moved = result.rows_to_move.len(),
        rows_deleted = result.rows_to_delete.len(),
        rows_inserted = result.rows_to_insert.len(),
        rows_reloaded = result.rows_to_reload.len(),
        "structure diff computed"
    );
    Ok(result)
}

// =============================================================================
// Internal Context
// =============================================================================

/// A reload remembers where the row came from, for conflict filtering.
#[derive(Debug, Clone, Copy)]
struct Reload {
    from: IndexPath,
    to: IndexPath,
}

struct DiffContext<'a> {
    old: &'a Snapshot,
    new: &'a Snapshot,
    old_sections: FxHashMap<&'a SectionId, usize>,
    new_sections: FxHashMap<&'a SectionId, usize>,
    old_rows: FxHashMap<Fingerprint, IndexPath>,
    new_rows: FxHashMap<Fingerprint, IndexPath>,
    reloads: Vec<Reload>,
    result: StructureDiff,
}

impl<'a> DiffContext<'a> {
    fn new(old: &'a Snapshot, new: &'a Snapshot) -> StructureResult<Self> {
        Ok(Self {
            old,
            new,
            old_sections: index_sections_lenient(old),
            new_sections: index_sections_strict(new)?,
            old_rows: index_rows_lenient(old),
            new_rows: index_rows_strict(new)?,
            reloads: Vec::new(),
            result: StructureDiff::default(),
        })
    }

    fn into_result(mut self) -> StructureDiff {
        self.result.rows_to_reload = self.reloads.iter().map(|reload| reload.to).collect();
        self.result.rows_to_delete.sort_unstable();
        self.result.rows_to_delete.dedup();
        self.result.rows_to_insert.sort_unstable();
        self.result.rows_to_insert.dedup();
        self.result.rows_to_reload.sort_unstable();
        self.result.rows_to_reload.dedup();
        self.result
    }

    /// Pass 1: old order.
    fn detect_moves_and_deletions(&mut self) {
        let old = self.old;
        let new = self.new;

        for (old_section_index, old_section) in old.iter().enumerate() {
            match self.new_sections.get(&old_section.identifier) {
                Some(&new_section_index) => {
                    if new_section_index != old_section_index {
                        self.result.sections_to_move.push(SectionMove {
                            from: old_section_index,
                            to: new_section_index,
                        });
                    }
                    let new_section = &new[new_section_index];
                    if old_section.header_content != new_section.header_content {
                        self.result.headers_to_reload.insert(new_section_index);
                    }
                    if old_section.footer_content != new_section.footer_content {
                        self.result.footers_to_reload.insert(new_section_index);
                    }
                }
                None => {
                    self.result.sections_to_delete.insert(old_section_index);
                }
            }

            for (old_row_index, old_row) in old_section.rows.iter().enumerate() {
                let from = IndexPath::new(old_section_index, old_row_index);
                let matched = old_row
                    .identity
                    // A repeated identity in the old snapshot only matches once
                    .filter(|identity| self.old_rows.get(identity) == Some(&from))
                    .and_then(|identity| self.new_rows.get(&identity).copied());

                let Some(to) = matched else {
                    self.result.rows_to_delete.push(from);
                    continue;
                };

                if from != to {
                    self.result.rows_to_move.push(RowMove { from, to });
                }

                let new_content = new.row(to).and_then(|row| row.content);
                if let (Some(old_content), Some(new_content)) = (old_row.content, new_content)
                    && old_content != new_content
                {
                    self.reloads.push(Reload { from, to });
                }
            }
        }
    }

    /// Pass 2: new order.
    fn detect_insertions(&mut self) {
        for (new_section_index, new_section) in self.new.iter().enumerate() {
            if !self.old_sections.contains_key(&new_section.identifier) {
                self.result.sections_to_insert.insert(new_section_index);
            }

            for (new_row_index, new_row) in new_section.rows.iter().enumerate() {
                let known = new_row
                    .identity
                    .is_some_and(|identity| self.old_rows.contains_key(&identity));
                if !known {
                    self.result
                        .rows_to_insert
                        .push(IndexPath::new(new_section_index, new_row_index));
                }
            }
        }
    }

    /// Drop or demote operations that one batch cannot carry together.
    fn resolve_conflicts(&mut self) {
        let moved_sections: FxHashMap<usize, usize> = self
            .result
            .sections_to_move
            .iter()
            .map(|m| (m.from, m.to))
            .collect();
        let moved_destinations: FxHashSet<usize> = moved_sections.values().copied().collect();
        let deleted = &self.result.sections_to_delete;
        let inserted = &self.result.sections_to_insert;

        // A move supersedes a deletion of the same old position
        let move_sources: FxHashSet<IndexPath> =
            self.result.rows_to_move.iter().map(|m| m.from).collect();
        self.result
            .rows_to_delete
            .retain(|path| !move_sources.contains(path));

        // Section operations supersede row moves that touch them
        let mut demoted_inserts = Vec::new();
        let mut demoted_deletes = Vec::new();
        self.result.rows_to_move.retain(|m| {
            if deleted.contains(&m.from.section) {
                // The source disappears with its section: the row is new
                // to its destination, unless that section is new as well
                if !inserted.contains(&m.to.section) {
                    demoted_inserts.push(m.to);
                }
                return false;
            }
            if inserted.contains(&m.to.section) {
                // The destination arrives with its section: the row only
                // leaves its source
                demoted_deletes.push(m.from);
                return false;
            }
            // Carried along by its section's move. A row leaving a moving
            // section is kept and rejected by check_moved_sections.
            moved_sections.get(&m.from.section) != Some(&m.to.section)
        });
        self.result.rows_to_insert.extend(demoted_inserts);
        self.result.rows_to_delete.extend(demoted_deletes);

        // Rows of deleted sections go with them; rows of inserted sections
        // come with them
        self.result
            .rows_to_delete
            .retain(|path| !deleted.contains(&path.section));
        self.result
            .rows_to_insert
            .retain(|path| !inserted.contains(&path.section));

        // Reloads yield to deletions and to section moves
        let deleted_rows: FxHashSet<IndexPath> =
            self.result.rows_to_delete.iter().copied().collect();
        self.reloads.retain(|reload| {
            !deleted.contains(&reload.from.section)
                && !inserted.contains(&reload.to.section)
                && !deleted_rows.contains(&reload.from)
                && !moved_sections.contains_key(&reload.from.section)
                && !moved_destinations.contains(&reload.to.section)
        });
    }

    /// Row deletions and insertions cannot share a batch with a move of
    /// their section.
    fn check_moved_sections(&self) -> StructureResult<()> {
        if self.result.sections_to_move.is_empty() {
            return Ok(());
        }
        let sources: FxHashSet<usize> =
            self.result.sections_to_move.iter().map(|m| m.from).collect();
        let destinations: FxHashSet<usize> =
            self.result.sections_to_move.iter().map(|m| m.to).collect();

        let deletions = self
            .result
            .rows_to_delete
            .iter()
            .copied()
            .chain(self.result.rows_to_move.iter().map(|m| m.from));
        for path in deletions {
            if sources.contains(&path.section) {
                return Err(StructureError::RowDeletionInMovedSection { path });
            }
        }

        let insertions = self
            .result
            .rows_to_insert
            .iter()
            .copied()
            .chain(self.result.rows_to_move.iter().map(|m| m.to));
        for path in insertions {
            if destinations.contains(&path.section) {
                return Err(StructureError::RowInsertionInMovedSection { path });
            }
        }
        Ok(())
    }
}

fn index_sections_lenient(snapshot: &Snapshot) -> FxHashMap<&SectionId, usize> {
    let mut sections = FxHashMap::with_capacity_and_hasher(snapshot.len(), Default::default());
    for (index, section) in snapshot.iter().enumerate() {
        sections.entry(&section.identifier).or_insert(index);
    }
    sections
}

fn index_sections_strict(snapshot: &Snapshot) -> StructureResult<FxHashMap<&SectionId, usize>> {
    let mut sections = FxHashMap::with_capacity_and_hasher(snapshot.len(), Default::default());
    for (index, section) in snapshot.iter().enumerate() {
        if sections.insert(&section.identifier, index).is_some() {
            return Err(StructureError::DuplicateSectionIdentifier {
                identifier: section.identifier.clone(),
            });
        }
    }
    Ok(sections)
}

fn identified_rows(snapshot: &Snapshot) -> impl Iterator<Item = (Fingerprint, IndexPath)> + '_ {
    snapshot
        .iter()
        .enumerate()
        .flat_map(|(section_index, section)| {
            section
                .rows
                .iter()
                .enumerate()
                .filter_map(move |(row_index, row)| {
                    row.identity
                        .map(|identity| (identity, IndexPath::new(section_index, row_index)))
                })
        })
}

fn index_rows_lenient(snapshot: &Snapshot) -> FxHashMap<Fingerprint, IndexPath> {
    let mut rows = FxHashMap::default();
    for (identity, path) in identified_rows(snapshot) {
        rows.entry(identity).or_insert(path);
    }
    rows
}

fn index_rows_strict(snapshot: &Snapshot) -> StructureResult<FxHashMap<Fingerprint, IndexPath>> {
    let mut rows = FxHashMap::default();
    for (identity, path) in identified_rows(snapshot) {
        if let Some(first) = rows.insert(identity, path) {
            return Err(StructureError::DuplicateRowIdentity {
                fingerprint: identity,
                first,
                second: path,
            });
        }
    }
    Ok(rows)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::hash::Hash;

    use proptest::prelude::*;

    use super::*;
    use crate::hash::StableHasher;
    use crate::structure::{
        CastRow, CastSection, ContentComparable, HeaderFooter, HeaderFooterView, Identifiable, Row,
    };

    // ─────────────────────────────────────────────────────────────────────────
    // Fixtures
    // ─────────────────────────────────────────────────────────────────────────

    #[derive(Clone)]
    struct Item {
        key: &'static str,
        text: &'static str,
    }

    impl Row for Item {
        fn as_identifiable(&self) -> Option<&dyn Identifiable> {
            Some(self)
        }

        fn as_content_comparable(&self) -> Option<&dyn ContentComparable> {
            Some(self)
        }
    }

    impl Identifiable for Item {
        fn identity_hash(&self, state: &mut StableHasher) {
            self.key.hash(state);
        }
    }

    impl ContentComparable for Item {
        fn content_hash(&self, state: &mut StableHasher) {
            self.text.hash(state);
        }
    }

    /// Neither identifiable nor content-comparable.
    struct Anonymous;
    impl Row for Anonymous {}

    struct Badge(&'static str);

    impl HeaderFooterView for Badge {
        fn as_content_comparable(&self) -> Option<&dyn ContentComparable> {
            Some(self)
        }
    }

    impl ContentComparable for Badge {
        fn content_hash(&self, state: &mut StableHasher) {
            self.0.hash(state);
        }
    }

    fn item(key: &'static str) -> Item {
        Item { key, text: key }
    }

    fn edited(key: &'static str, text: &'static str) -> Item {
        Item { key, text }
    }

    fn section(id: &str, keys: &[&'static str]) -> Section {
        Section::new(id).with_rows(keys.iter().map(|&k| item(k)))
    }

    fn snapshot(structure: &[Section]) -> Snapshot {
        Snapshot::cast(structure, Surface::Table)
    }

    fn run(old: &[Section], new: &[Section]) -> StructureResult<StructureDiff> {
        diff(&snapshot(old), new, Surface::Table)
    }

    fn path(section: usize, item: usize) -> IndexPath {
        IndexPath::new(section, item)
    }

    fn row_move(from: (usize, usize), to: (usize, usize)) -> RowMove {
        RowMove {
            from: from.into(),
            to: to.into(),
        }
    }

    fn set(indices: &[usize]) -> IndexSet {
        indices.iter().copied().collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Basic behaviour
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_identical_structures_produce_empty_diff() {
        let build = || {
            vec![
                section("a", &["1", "2"]).with_header("A").with_footer("end"),
                section("b", &["3"]),
            ]
        };
        let result = run(&build(), &build()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.operation_count(), 0);
        assert!(!result.has_batch_operations());
    }

    #[test]
    fn test_empty_to_empty() {
        let result = diff_snapshots(&Snapshot::empty(), &Snapshot::empty()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_row_insert_and_delete() {
        let old = vec![section("a", &["1", "2", "3"])];
        let new = vec![section("a", &["1", "3", "4"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.rows_to_delete, vec![path(0, 1)]);
        assert_eq!(result.rows_to_insert, vec![path(0, 2)]);
        // "3" shifted up by the deletion
        assert_eq!(result.rows_to_move, vec![row_move((0, 2), (0, 1))]);
        assert!(result.rows_to_reload.is_empty());
    }

    #[test]
    fn test_content_change_in_place_reloads() {
        let old = vec![section("a", &["1", "2"])];
        let new = vec![Section::new("a").with_rows([item("1"), edited("2", "two")])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.rows_to_reload, vec![path(0, 1)]);
        assert!(result.rows_to_move.is_empty());
        assert!(result.rows_to_delete.is_empty());
        assert!(result.rows_to_insert.is_empty());
    }

    #[test]
    fn test_rotation_moves_and_reloads() {
        // [a, b, c] -> [c, a, b'] with b's content changed
        let old = vec![section("countries", &["a", "b", "c"])];
        let new = vec![
            Section::new("countries").with_rows([item("c"), item("a"), edited("b", "B")]),
        ];
        let result = run(&old, &new).unwrap();

        assert_eq!(
            result.rows_to_move,
            vec![
                row_move((0, 0), (0, 1)),
                row_move((0, 1), (0, 2)),
                row_move((0, 2), (0, 0)),
            ]
        );
        assert_eq!(result.rows_to_reload, vec![path(0, 2)]);
        assert!(result.rows_to_delete.is_empty());
        assert!(result.rows_to_insert.is_empty());
        assert!(result.sections_to_move.is_empty());
        assert!(result.sections_to_delete.is_empty());
        assert!(result.sections_to_insert.is_empty());
    }

    #[test]
    fn test_row_moves_between_sections() {
        let old = vec![section("x", &["a", "b"]), section("y", &["c"])];
        let new = vec![section("x", &["b"]), section("y", &["c", "a"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(
            result.rows_to_move,
            vec![row_move((0, 0), (1, 1)), row_move((0, 1), (0, 0))]
        );
        assert!(result.rows_to_delete.is_empty());
        assert!(result.rows_to_insert.is_empty());
    }

    #[test]
    fn test_row_moved_across_sections_with_new_content_reloads() {
        let old = vec![section("x", &["a", "b"]), section("y", &["c"])];
        let new = vec![
            section("x", &["b"]),
            Section::new("y").with_rows([item("c"), edited("a", "renamed")]),
        ];
        let result = run(&old, &new).unwrap();

        assert_eq!(
            result.rows_to_move,
            vec![row_move((0, 0), (1, 1)), row_move((0, 1), (0, 0))]
        );
        // Reloaded at its destination, after the batch
        assert_eq!(result.rows_to_reload, vec![path(1, 1)]);
        assert!(result.rows_to_delete.is_empty());
        assert!(result.rows_to_insert.is_empty());
    }

    #[test]
    fn test_unmatched_row_deleted_when_section_survives() {
        // "a" moves out of X into Y; "b" disappears while X stays
        let old = vec![section("x", &["a", "b"]), section("y", &["c"])];
        let new = vec![section("x", &[]), section("y", &["c", "a"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.rows_to_move, vec![row_move((0, 0), (1, 1))]);
        assert_eq!(result.rows_to_delete, vec![path(0, 1)]);
        assert!(result.sections_to_delete.is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sections
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_deleted_section_swallows_row_operations() {
        let old = vec![section("x", &["1", "2"]), section("y", &["3"])];
        let new = vec![section("y", &["3"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.sections_to_delete, set(&[0]));
        assert_eq!(result.sections_to_move, vec![SectionMove { from: 1, to: 0 }]);
        assert!(result.rows_to_delete.is_empty());
        // "3" travels with its section
        assert!(result.rows_to_move.is_empty());
        assert!(result.rows_to_insert.is_empty());
    }

    /// Demoted to an insertion rather than kept as a move, so the batch's
    /// per-section row counts stay consistent.
    #[test]
    fn test_row_leaving_deleted_section_becomes_insertion() {
        // Y precedes X, so Y keeps its index and is not a moving section
        let old = vec![section("y", &["c"]), section("x", &["a", "b"])];
        let new = vec![section("y", &["c", "a"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.sections_to_delete, set(&[1]));
        assert!(result.sections_to_move.is_empty());
        assert!(result.rows_to_move.is_empty());
        assert!(result.rows_to_delete.is_empty());
        assert_eq!(result.rows_to_insert, vec![path(0, 1)]);
    }

    #[test]
    fn test_inserted_section_brings_its_rows() {
        let old = vec![section("a", &["1", "2"])];
        let new = vec![section("a", &["1"]), section("b", &["2", "3"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.sections_to_insert, set(&[1]));
        // "2" moved into the new section: only its old slot is deleted
        assert_eq!(result.rows_to_delete, vec![path(0, 1)]);
        assert!(result.rows_to_insert.is_empty());
        assert!(result.rows_to_move.is_empty());
    }

    #[test]
    fn test_section_reorder_carries_rows() {
        let old = vec![section("a", &["1"]), section("b", &["2"])];
        let new = vec![section("b", &["2"]), section("a", &["1"])];
        let result = run(&old, &new).unwrap();

        assert_eq!(
            result.sections_to_move,
            vec![SectionMove { from: 0, to: 1 }, SectionMove { from: 1, to: 0 }]
        );
        assert!(result.rows_to_move.is_empty());
    }

    #[test]
    fn test_reload_dropped_in_moved_section() {
        let old = vec![section("a", &["1"]), section("b", &["2"])];
        let new = vec![
            Section::new("b").with_rows([edited("2", "changed")]),
            section("a", &["1"]),
        ];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.sections_to_move.len(), 2);
        assert!(result.rows_to_reload.is_empty());
    }

    #[test]
    fn test_header_and_footer_reload() {
        let old = vec![
            section("a", &["1"]).with_header("Old title"),
            section("b", &["2"]).with_footer(HeaderFooter::view(Badge("1 item"))),
        ];
        let new = vec![
            section("a", &["1"]).with_header("New title"),
            section("b", &["2"]).with_footer(HeaderFooter::view(Badge("2 items"))),
        ];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.headers_to_reload, set(&[0]));
        assert_eq!(result.footers_to_reload, set(&[1]));
        assert!(result.rows_to_reload.is_empty());
    }

    #[test]
    fn test_header_added_or_removed_reloads() {
        let old = vec![section("a", &[]), section("b", &[]).with_header("B")];
        let new = vec![section("a", &[]).with_header("A"), section("b", &[])];
        let result = run(&old, &new).unwrap();

        assert_eq!(result.headers_to_reload, set(&[0, 1]));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Capabilities
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_anonymous_rows_are_always_replaced() {
        let build = || {
            let mut s = Section::new("a");
            s.push(item("1"));
            s.push(Anonymous);
            vec![s]
        };
        let result = run(&build(), &build()).unwrap();

        assert_eq!(result.rows_to_delete, vec![path(0, 1)]);
        assert_eq!(result.rows_to_insert, vec![path(0, 1)]);
        assert!(result.rows_to_reload.is_empty());
        assert!(result.rows_to_move.is_empty());
    }

    #[test]
    fn test_missing_content_never_reloads() {
        let old = Snapshot::from_sections(vec![CastSection {
            rows: vec![CastRow::new(Some(Fingerprint::from_raw(1)), None)],
            ..CastSection::new("a")
        }]);
        let new = Snapshot::from_sections(vec![CastSection {
            rows: vec![CastRow::new(
                Some(Fingerprint::from_raw(1)),
                Some(Fingerprint::from_raw(9)),
            )],
            ..CastSection::new("a")
        }]);
        let result = diff_snapshots(&old, &new).unwrap();
        assert!(result.is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_duplicate_section_identifier() {
        let old = vec![section("a", &["1"])];
        let new = vec![section("A", &["1"]), section("A", &["2"])];
        let err = run(&old, &new).unwrap_err();
        assert_eq!(
            err,
            StructureError::DuplicateSectionIdentifier {
                identifier: SectionId::from("A")
            }
        );
    }

    #[test]
    fn test_duplicate_row_identity_across_sections() {
        let old = vec![section("a", &["1"])];
        let new = vec![section("a", &["1"]), section("b", &["2", "1"])];
        match run(&old, &new).unwrap_err() {
            StructureError::DuplicateRowIdentity { first, second, .. } => {
                assert_eq!(first, path(0, 0));
                assert_eq!(second, path(1, 1));
            }
            other => panic!("Expected DuplicateRowIdentity, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_in_old_snapshot_matches_once() {
        let old = Snapshot::from_sections(vec![CastSection {
            rows: vec![
                CastRow::new(Some(Fingerprint::from_raw(1)), None),
                CastRow::new(Some(Fingerprint::from_raw(1)), None),
            ],
            ..CastSection::new("a")
        }]);
        let new = Snapshot::from_sections(vec![CastSection {
            rows: vec![CastRow::new(Some(Fingerprint::from_raw(1)), None)],
            ..CastSection::new("a")
        }]);
        let result = diff_snapshots(&old, &new).unwrap();
        assert_eq!(result.rows_to_delete, vec![path(0, 1)]);
        assert!(result.rows_to_move.is_empty());
    }

    #[test]
    fn test_row_deletion_in_moved_section() {
        let old = vec![section("a", &["1"]), section("b", &["2", "3"])];
        let new = vec![section("b", &["2"]), section("a", &["1"])];
        let err = run(&old, &new).unwrap_err();
        assert_eq!(err, StructureError::RowDeletionInMovedSection { path: path(1, 1) });
    }

    #[test]
    fn test_row_insertion_in_moved_section() {
        let old = vec![section("a", &["1"]), section("b", &["2"])];
        let new = vec![section("b", &["2", "9"]), section("a", &["1"])];
        let err = run(&old, &new).unwrap_err();
        assert_eq!(err, StructureError::RowInsertionInMovedSection { path: path(0, 1) });
    }

    #[test]
    fn test_row_crossing_moved_sections() {
        let old = vec![section("a", &["1", "x"]), section("b", &["2"])];
        let new = vec![section("b", &["2"]), section("a", &["1"]), section("c", &["x"])];
        // "x" leaves moving section "a" for the new section "c"
        let err = run(&old, &new).unwrap_err();
        assert!(err.is_moved_section_conflict());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Display
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_display_lists_every_collection() {
        let old = vec![section("a", &["1"])];
        let new = vec![section("a", &["1", "2"])];
        let text = run(&old, &new).unwrap().to_string();
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("rows to insert: [[0, 1]]"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Properties
    // ─────────────────────────────────────────────────────────────────────────

    const KEYS: [&str; 12] = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"];
    const TEXTS: [&str; 2] = ["plain", "bold"];
    const SECTION_KEYS: [&str; 4] = ["s0", "s1", "s2", "s3"];

    /// (section key, rows as (key, text variant)) with unique keys throughout.
    type Shape = Vec<(usize, Vec<(usize, usize)>)>;

    fn structure_strategy() -> impl Strategy<Value = Shape> {
        (
            Just((0..KEYS.len()).collect::<Vec<usize>>()).prop_shuffle(),
            prop::collection::vec(0..TEXTS.len(), KEYS.len()),
            Just((0..SECTION_KEYS.len()).collect::<Vec<usize>>()).prop_shuffle(),
            prop::collection::vec(0..4usize, 1..=SECTION_KEYS.len()),
            0..=KEYS.len(),
        )
            .prop_map(|(keys, texts, section_keys, sizes, take)| {
                let mut remaining = keys.into_iter().take(take).map(|k| (k, texts[k]));
                section_keys
                    .into_iter()
                    .zip(sizes)
                    .map(|(section_key, size)| {
                        (section_key, remaining.by_ref().take(size).collect())
                    })
                    .collect()
            })
    }

    fn build(shape: &Shape) -> Vec<Section> {
        shape
            .iter()
            .map(|(section_key, rows)| {
                Section::new(SECTION_KEYS[*section_key])
                    .with_rows(rows.iter().map(|&(k, t)| edited(KEYS[k], TEXTS[t])))
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_self_diff_is_empty(shape in structure_strategy()) {
            let structure = build(&shape);
            let result = run(&structure, &build(&shape)).unwrap();
            prop_assert!(result.is_empty());
        }

        #[test]
        fn prop_unmoved_rows_never_move(old in structure_strategy(), new in structure_strategy()) {
            let (old, new) = (build(&old), build(&new));
            if let Ok(result) = run(&old, &new) {
                for m in &result.rows_to_move {
                    prop_assert_ne!(m.from, m.to);
                }
            }
        }

        #[test]
        fn prop_batch_operations_are_exclusive(old in structure_strategy(), new in structure_strategy()) {
            let (old, new) = (build(&old), build(&new));
            if let Ok(result) = run(&old, &new) {
                let sources: FxHashSet<IndexPath> = result.rows_to_move.iter().map(|m| m.from).collect();
                let destinations: FxHashSet<IndexPath> = result.rows_to_move.iter().map(|m| m.to).collect();
                prop_assert_eq!(sources.len(), result.rows_to_move.len());
                prop_assert_eq!(destinations.len(), result.rows_to_move.len());
                for path in &result.rows_to_delete {
                    prop_assert!(!sources.contains(path));
                    prop_assert!(!result.sections_to_delete.contains(&path.section));
                }
                for path in &result.rows_to_insert {
                    prop_assert!(!destinations.contains(path));
                    prop_assert!(!result.sections_to_insert.contains(&path.section));
                    prop_assert!(!result.rows_to_reload.contains(path));
                }

                // A reloaded row comes from an old position that is not deleted
                let old_snapshot = snapshot(&old);
                let new_snapshot = snapshot(&new);
                for path in &result.rows_to_reload {
                    let identity = new_snapshot.row(*path).and_then(|row| row.identity);
                    prop_assert!(identity.is_some());
                    let source = identity.and_then(|identity| old_snapshot.index_path_of(identity));
                    prop_assert!(source.is_some_and(|source| !result.rows_to_delete.contains(&source)));
                }
            }
        }

        #[test]
        fn prop_batch_preserves_row_counts(old in structure_strategy(), new in structure_strategy()) {
            let (old, new) = (build(&old), build(&new));
            if let Ok(result) = run(&old, &new) {
                // Every section that survives without moving must end with
                // the new row count after applying deletions, insertions and
                // moves in native batch semantics.
                let old_snapshot = snapshot(&old);
                let new_snapshot = snapshot(&new);
                let moved: FxHashSet<usize> = result.sections_to_move.iter().map(|m| m.from).collect();
                for (old_index, section) in old_snapshot.iter().enumerate() {
                    if result.sections_to_delete.contains(&old_index) || moved.contains(&old_index) {
                        continue;
                    }
                    let mut count = section.rows.len() as isize;
                    count -= result.rows_to_delete.iter().filter(|p| p.section == old_index).count() as isize;
                    count -= result.rows_to_move.iter().filter(|m| m.from.section == old_index).count() as isize;
                    count += result.rows_to_insert.iter().filter(|p| p.section == old_index).count() as isize;
                    count += result.rows_to_move.iter().filter(|m| m.to.section == old_index).count() as isize;
                    prop_assert_eq!(count, new_snapshot[old_index].rows.len() as isize);
                }
            }
        }
    }
}
