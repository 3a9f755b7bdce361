//! Reload applicator: drives a [`ListView`] from a [`StructureDiff`].
//!
//! Two phases:
//!
//! 1. [`perform_batch`]: structural changes inside one batched update
//! 2. [`apply_deferred`]: row reloads and header/footer reconfiguration,
//!    once the batch animation has finished

use crate::algo::StructureDiff;
use crate::error::StructureResult;
use crate::structure::Section;
use crate::surface::{AnimationRule, ListView};

/// Apply moves, deletions and insertions in one batched update.
///
/// Order inside the batch: section moves, section deletions, section
/// insertions, row moves, row deletions, row insertions. Empty collections
/// are not forwarded.
///
/// # Errors
///
/// Propagates the rejection reported by [`ListView::end_updates`].
pub fn perform_batch<V: ListView + ?Sized>(
    view: &mut V,
    diff: &StructureDiff,
    rule: &AnimationRule,
) -> StructureResult<()> {
    view.begin_updates();

    for movement in &diff.sections_to_move {
        view.move_section(movement.from, movement.to);
    }
    if !diff.sections_to_delete.is_empty() {
        view.delete_sections(&diff.sections_to_delete, rule.delete);
    }
    if !diff.sections_to_insert.is_empty() {
        view.insert_sections(&diff.sections_to_insert, rule.insert);
    }

    for movement in &diff.rows_to_move {
        view.move_row(movement.from, movement.to);
    }
    if !diff.rows_to_delete.is_empty() {
        view.delete_rows(&diff.rows_to_delete, rule.delete);
    }
    if !diff.rows_to_insert.is_empty() {
        view.insert_rows(&diff.rows_to_insert, rule.insert);
    }

    view.end_updates()
}

/// Reload changed rows, then reconfigure changed headers and footers in
/// place.
///
/// Positions are new positions in `structure`. A header or footer that no
/// longer exists is skipped.
pub fn apply_deferred<V: ListView + ?Sized>(
    view: &mut V,
    diff: &StructureDiff,
    structure: &[Section],
    rule: &AnimationRule,
) {
    if !diff.rows_to_reload.is_empty() {
        view.reload_rows(&diff.rows_to_reload, rule.reload);
    }

    for &index in &diff.headers_to_reload {
        if let Some(header) = structure.get(index).and_then(|s| s.header.as_ref()) {
            view.reconfigure_header(index, header);
        }
    }
    for &index in &diff.footers_to_reload {
        if let Some(footer) = structure.get(index).and_then(|s| s.footer.as_ref()) {
            view.reconfigure_footer(index, footer);
        }
    }
}
