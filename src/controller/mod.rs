//! Structure controller: owns the live structure and commits new ones.
//!
//! # Commit flow
//!
//! ```text
//! set_structure(new, view)
//!   ├─ animations disabled        -> reload_data
//!   ├─ nothing rendered before    -> reload_data
//!   ├─ view counts != snapshot    -> reload_data
//!   ├─ diff error                 -> reload_data
//!   ├─ empty diff                 -> Unchanged
//!   ├─ too many operations        -> reload_data
//!   ├─ batch rejected             -> reload_data
//!   └─ batch applied              -> Animated(PendingUpdate)
//!
//! complete_update(pending, view)  // once the batch animation finished
//!   └─ reload rows, reconfigure headers/footers
//! ```
//!
//! Every fallback is a full unanimated reload, so a commit never fails.

pub mod apply;

#[cfg(test)]
pub(crate) mod recording;

use std::any::Any;
use std::cell::RefCell;
use std::ptr;
use std::rc::Rc;

use crate::algo::{StructureDiff, diff_snapshots};
use crate::error::{StructureError, StructureResult};
use crate::index::IndexPath;
use crate::structure::{CastRow, HeaderFooter, Row, Section, Snapshot, Structure, check_move};
use crate::surface::{AnimationRule, ListView, Surface};

/// Default operation limit before falling back to a full reload.
pub const DEFAULT_MAX_OPS: usize = 2000;

// =============================================================================
// Configuration
// =============================================================================

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Animation settings. Disabled means every commit reloads.
    /// Default: [`AnimationRule::FADE`]
    pub animation: AnimationRule,
    /// Maximum number of diff operations before fallback to full reload.
    /// Default: 2000
    pub max_ops: usize,
    /// Compare the view's rendered counts with the retained snapshot
    /// before diffing. Default: true
    pub verify_counts: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            animation: AnimationRule::default(),
            max_ops: DEFAULT_MAX_OPS,
            verify_counts: true,
        }
    }
}

impl ControllerConfig {
    /// Create config with a custom animation rule.
    pub fn new(animation: AnimationRule) -> Self {
        Self {
            animation,
            ..Self::default()
        }
    }

    /// Create config that always reloads without animation.
    pub fn unanimated() -> Self {
        Self::new(AnimationRule::DISABLED)
    }

    /// Set the animation rule.
    pub fn with_animation(mut self, animation: AnimationRule) -> Self {
        self.animation = animation;
        self
    }

    /// Set the operation limit.
    pub fn with_max_ops(mut self, max_ops: usize) -> Self {
        self.max_ops = max_ops;
        self
    }

    /// Enable or disable the rendered count check.
    pub fn with_verify_counts(mut self, verify_counts: bool) -> Self {
        self.verify_counts = verify_counts;
        self
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a commit fell back to a full reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadReason {
    /// The animation rule is disabled
    AnimationsDisabled,
    /// Nothing was rendered before this commit
    FirstCommit,
    /// The view's counts disagree with the retained snapshot
    StructureMismatch(StructureError),
    /// The differ rejected the structures
    DiffFailed(StructureError),
    /// The diff exceeds the configured operation limit
    TooManyOperations {
        /// Operations in the diff
        count: usize,
        /// Configured limit
        limit: usize,
    },
    /// The view refused the batched update
    BatchRejected(StructureError),
}

impl ReloadReason {
    /// The error behind this reload, if any.
    pub fn error(&self) -> Option<&StructureError> {
        match self {
            Self::StructureMismatch(err) | Self::DiffFailed(err) | Self::BatchRejected(err) => {
                Some(err)
            }
            Self::AnimationsDisabled | Self::FirstCommit | Self::TooManyOperations { .. } => None,
        }
    }
}

/// A batch that has been applied but whose deferred work has not run yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingUpdate {
    generation: u64,
    diff: StructureDiff,
}

impl PendingUpdate {
    /// Commit generation this update belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The applied diff.
    pub fn diff(&self) -> &StructureDiff {
        &self.diff
    }
}

/// Result of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum CommitOutcome {
    /// The structures are equivalent; the view was not touched
    Unchanged,
    /// The view was fully reloaded
    Reloaded(ReloadReason),
    /// The batch was applied; pass the update to
    /// [`StructureController::complete_update`] once its animation ends
    Animated(PendingUpdate),
}

impl CommitOutcome {
    /// Whether the batch was applied with animation.
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// Whether the view was fully reloaded.
    pub fn is_reloaded(&self) -> bool {
        matches!(self, Self::Reloaded(_))
    }
}

/// Result of completing a pending update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Rows reloaded and headers/footers reconfigured
    Applied,
    /// A newer commit superseded the update; the next completion reloads
    Stale,
    /// The view was fully reloaded to recover from a stale update
    Reloaded,
}

// =============================================================================
// StructureController
// =============================================================================

/// Owns the live structure bound to one list view surface.
///
/// Keeps the current structure plus two cast snapshots: the one rendered
/// before the last commit and the one rendered now.
pub struct StructureController {
    surface: Surface,
    config: ControllerConfig,
    structure: Structure,
    previous: Snapshot,
    current: Snapshot,
    generation: u64,
    needs_reload: bool,
}

impl StructureController {
    /// Create a controller with default configuration.
    pub fn new(surface: Surface) -> Self {
        Self::with_config(surface, ControllerConfig::default())
    }

    /// Create a controller with custom configuration.
    pub fn with_config(surface: Surface, config: ControllerConfig) -> Self {
        Self {
            surface,
            config,
            structure: Vec::new(),
            previous: Snapshot::empty(),
            current: Snapshot::empty(),
            generation: 0,
            needs_reload: false,
        }
    }

    /// Surface this controller is bound to.
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Current configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replace the animation rule for subsequent commits.
    pub fn set_animation(&mut self, animation: AnimationRule) {
        self.config.animation = animation;
    }

    /// Generation of the latest commit.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Commit a new structure and bring `view` up to date with it.
    ///
    /// Never fails: anything that prevents an animated update degrades to
    /// [`ListView::reload_data`], reported as [`CommitOutcome::Reloaded`].
    pub fn set_structure<V: ListView + ?Sized>(
        &mut self,
        structure: Structure,
        view: &mut V,
    ) -> CommitOutcome {
        tracing::trace!(
            surface = self.surface.as_str(),
            sections = structure.len(),
            rows = structure.iter().map(Section::len).sum::<usize>(),
            "committing structure"
        );

        let cast = Snapshot::cast(&structure, self.surface);
        self.previous = std::mem::replace(&mut self.current, cast);
        for row in self.structure.iter().flat_map(|section| &section.rows) {
            row.invalidated();
        }
        self.structure = structure;
        self.generation += 1;

        if !self.config.animation.enabled {
            return self.reload(view, ReloadReason::AnimationsDisabled);
        }
        if self.previous.is_empty() {
            return self.reload(view, ReloadReason::FirstCommit);
        }
        if self.config.verify_counts
            && let Err(err) = verify_counts(view, &self.previous)
        {
            return self.reload(view, ReloadReason::StructureMismatch(err));
        }

        let diff = match diff_snapshots(&self.previous, &self.current) {
            Ok(diff) => diff,
            Err(err) => return self.reload(view, ReloadReason::DiffFailed(err)),
        };
        if diff.is_empty() {
            return CommitOutcome::Unchanged;
        }
        let count = diff.operation_count();
        if count > self.config.max_ops {
            let limit = self.config.max_ops;
            return self.reload(view, ReloadReason::TooManyOperations { count, limit });
        }

        if let Err(err) = apply::perform_batch(view, &diff, &self.config.animation) {
            return self.reload(view, ReloadReason::BatchRejected(err));
        }
        CommitOutcome::Animated(PendingUpdate {
            generation: self.generation,
            diff,
        })
    }

    /// Run the deferred part of an animated commit.
    ///
    /// Call once the batch animation has finished. An update superseded by
    /// a newer commit does nothing, and the following completion reloads
    /// the whole view instead.
    pub fn complete_update<V: ListView + ?Sized>(
        &mut self,
        pending: &PendingUpdate,
        view: &mut V,
    ) -> Completion {
        if self.needs_reload {
            self.needs_reload = false;
            view.reload_data();
            return Completion::Reloaded;
        }
        if pending.generation != self.generation {
            tracing::debug!(
                pending = pending.generation,
                current = self.generation,
                "ignoring stale update completion"
            );
            self.needs_reload = true;
            return Completion::Stale;
        }
        apply::apply_deferred(view, &pending.diff, &self.structure, &self.config.animation);
        Completion::Applied
    }

    /// Commit and immediately complete, for views without batch animation.
    pub fn apply<V: ListView + ?Sized>(&mut self, structure: Structure, view: &mut V) -> CommitOutcome {
        let outcome = self.set_structure(structure, view);
        if let CommitOutcome::Animated(pending) = &outcome {
            let _ = self.complete_update(pending, view);
        }
        outcome
    }

    fn reload<V: ListView + ?Sized>(&mut self, view: &mut V, reason: ReloadReason) -> CommitOutcome {
        match reason.error() {
            Some(err) => tracing::warn!(error = %err, "cannot reload animated, reloading data"),
            None => tracing::debug!(reason = ?reason, "reloading data"),
        }
        self.needs_reload = false;
        view.reload_data();
        CommitOutcome::Reloaded(reason)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The live structure.
    pub fn structure(&self) -> &[Section] {
        &self.structure
    }

    /// Section at `index`.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.structure.get(index)
    }

    /// Number of sections in the live structure.
    pub fn number_of_sections(&self) -> usize {
        self.structure.len()
    }

    /// Number of rows in `section`, zero if it does not exist.
    pub fn number_of_rows(&self, section: usize) -> usize {
        self.structure.get(section).map_or(0, Section::len)
    }

    /// Row counts of every section.
    pub fn row_counts(&self) -> Vec<usize> {
        self.structure.iter().map(Section::len).collect()
    }

    /// Row model at `path`.
    pub fn row(&self, path: IndexPath) -> Option<&dyn Row> {
        self.structure.get(path.section)?.row(path.item)
    }

    /// Header of `section`.
    pub fn header(&self, section: usize) -> Option<&HeaderFooter> {
        self.structure.get(section)?.header.as_ref()
    }

    /// Footer of `section`.
    pub fn footer(&self, section: usize) -> Option<&HeaderFooter> {
        self.structure.get(section)?.footer.as_ref()
    }

    /// Position of `row` in the live structure.
    ///
    /// Identifiable rows are found by identity, so an equal model built
    /// elsewhere matches. Other rows must be the very instance held by the
    /// structure. Instances of zero-sized models have no distinct address
    /// and are never found.
    pub fn index_path_of(&self, row: &dyn Row) -> Option<IndexPath> {
        if let Some(identity) = CastRow::of(row, self.surface).identity {
            return self.current.index_path_of(identity);
        }
        if std::mem::size_of_val(row) == 0 {
            return None;
        }
        let type_id = (row as &dyn Any).type_id();
        self.structure
            .iter()
            .enumerate()
            .find_map(|(section_index, section)| {
                section
                    .rows
                    .iter()
                    .position(|candidate| {
                        let candidate = candidate.as_ref();
                        (candidate as &dyn Any).type_id() == type_id
                            && ptr::addr_eq(candidate, row)
                    })
                    .map(|item| IndexPath::new(section_index, item))
            })
    }

    /// Snapshot of the live structure.
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Snapshot rendered before the latest commit.
    pub fn previous_snapshot(&self) -> &Snapshot {
        &self.previous
    }

    // -------------------------------------------------------------------------
    // User reorder
    // -------------------------------------------------------------------------

    /// Mirror a reorder the user already performed on the view.
    ///
    /// Moves the row in both the live structure and its snapshot, so the
    /// next diff starts from what is on screen.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfBounds`] for an invalid source or
    /// destination; nothing is moved in that case.
    pub fn move_row(&mut self, from: IndexPath, to: IndexPath) -> StructureResult<()> {
        check_move(&self.row_counts(), from, to)?;
        self.current.move_row(from, to)?;
        let row = self.structure[from.section].rows.remove(from.item);
        self.structure[to.section].rows.insert(to.item, row);
        Ok(())
    }
}

impl std::fmt::Debug for StructureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureController")
            .field("surface", &self.surface)
            .field("config", &self.config)
            .field("row_counts", &self.row_counts())
            .field("generation", &self.generation)
            .field("needs_reload", &self.needs_reload)
            .finish()
    }
}

fn verify_counts<V: ListView + ?Sized>(view: &V, expected: &Snapshot) -> StructureResult<()> {
    let found = view.number_of_sections();
    if found != expected.len() {
        return Err(StructureError::StructureMismatch {
            section: None,
            expected: expected.len(),
            found,
        });
    }
    for (index, section) in expected.iter().enumerate() {
        let found = view.number_of_rows(index);
        if found != section.rows.len() {
            return Err(StructureError::StructureMismatch {
                section: Some(index),
                expected: section.rows.len(),
                found,
            });
        }
    }
    Ok(())
}

// =============================================================================
// SharedController
// =============================================================================

/// Shared handle to a controller.
///
/// Lets completion callbacks reach the controller that issued an update.
/// The controller holds caller-owned row models and stays on the thread
/// that drives the list view. Access from inside a commit or completion
/// (a view running its completion synchronously) is refused with
/// [`StructureError::ReentrantAccess`].
pub struct SharedController {
    inner: Rc<RefCell<StructureController>>,
}

impl Clone for SharedController {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl SharedController {
    /// Wrap a controller.
    pub fn new(controller: StructureController) -> Self {
        Self {
            inner: Rc::new(RefCell::new(controller)),
        }
    }

    /// Execute a closure with exclusive access to the controller.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ReentrantAccess`] if the controller is
    /// already borrowed further up the call stack.
    pub fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut StructureController) -> R,
    ) -> StructureResult<R> {
        let mut guard = self
            .inner
            .try_borrow_mut()
            .map_err(|_| StructureError::ReentrantAccess)?;
        Ok(f(&mut guard))
    }

    /// Commit a new structure.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ReentrantAccess`] when called from inside
    /// another commit or completion.
    pub fn set_structure<V: ListView + ?Sized>(
        &self,
        structure: Structure,
        view: &mut V,
    ) -> StructureResult<CommitOutcome> {
        self.with_controller(|c| c.set_structure(structure, view))
    }

    /// Complete a pending update.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ReentrantAccess`] when called from inside
    /// another commit or completion.
    pub fn complete_update<V: ListView + ?Sized>(
        &self,
        pending: &PendingUpdate,
        view: &mut V,
    ) -> StructureResult<Completion> {
        self.with_controller(|c| c.complete_update(pending, view))
    }
}

impl From<StructureController> for SharedController {
    fn from(controller: StructureController) -> Self {
        Self::new(controller)
    }
}

impl std::fmt::Debug for SharedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_borrow() {
            Ok(controller) => f.debug_tuple("SharedController").field(&*controller).finish(),
            Err(_) => f.write_str("SharedController(<in use>)"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
