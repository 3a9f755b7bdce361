//! List view surfaces and the adapter the reload applicator drives.
//!
//! The library never touches a native control directly. A host writes one
//! [`ListView`] implementation per toolkit surface (a table view, a
//! collection view) and the controller calls into it.

use crate::error::StructureResult;
use crate::index::{IndexPath, IndexSet};
use crate::structure::HeaderFooter;

// =============================================================================
// Surface
// =============================================================================

/// Kind of list control a structure is bound to.
///
/// Identity fingerprints are scoped by surface, since the same model may
/// map to different reusable views on a table and on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Single-column table view
    Table,
    /// Collection (grid / flow) view
    Collection,
}

impl Surface {
    /// Stable name, used as the surface discriminator in fingerprints.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Collection => "collection",
        }
    }
}

// =============================================================================
// Animation
// =============================================================================

/// Animation a list view uses for one kind of change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAnimation {
    /// Let the list view choose
    #[default]
    Automatic,
    /// Cross-fade
    Fade,
    /// Slide towards / from the right
    Right,
    /// Slide towards / from the left
    Left,
    /// Slide towards / from the top
    Top,
    /// Slide towards / from the bottom
    Bottom,
    /// Collapse into / expand from the middle
    Middle,
    /// Apply the change without animation
    None,
}

/// Animation settings for structure updates.
///
/// Covers both the table flavour (one animation per change kind) and the
/// collection flavour (on / off, with optional update animation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRule {
    /// Whether diffs are applied at all. When false every commit is a
    /// full reload.
    pub enabled: bool,
    /// Animation for inserted sections and rows
    pub insert: RowAnimation,
    /// Animation for deleted sections and rows
    pub delete: RowAnimation,
    /// Animation for reloaded rows
    pub reload: RowAnimation,
}

impl AnimationRule {
    /// Same animation for every change kind.
    pub const fn uniform(animation: RowAnimation) -> Self {
        Self {
            enabled: true,
            insert: animation,
            delete: animation,
            reload: animation,
        }
    }

    /// Fade everything.
    pub const FADE: Self = Self::uniform(RowAnimation::Fade);
    /// Slide right.
    pub const RIGHT: Self = Self::uniform(RowAnimation::Right);
    /// Slide left.
    pub const LEFT: Self = Self::uniform(RowAnimation::Left);
    /// Slide up.
    pub const TOP: Self = Self::uniform(RowAnimation::Top);
    /// Slide down.
    pub const BOTTOM: Self = Self::uniform(RowAnimation::Bottom);
    /// Collapse to the middle.
    pub const MIDDLE: Self = Self::uniform(RowAnimation::Middle);
    /// Let the list view pick.
    pub const AUTOMATIC: Self = Self::uniform(RowAnimation::Automatic);

    /// Animate inserts, deletes and moves, but reload rows in place.
    pub const NO_RELOAD_ANIMATION: Self = Self {
        enabled: true,
        insert: RowAnimation::Automatic,
        delete: RowAnimation::Automatic,
        reload: RowAnimation::None,
    };

    /// No diffing: every commit reloads the whole list view.
    pub const DISABLED: Self = Self {
        enabled: false,
        insert: RowAnimation::None,
        delete: RowAnimation::None,
        reload: RowAnimation::None,
    };
}

impl Default for AnimationRule {
    fn default() -> Self {
        Self::FADE
    }
}

// =============================================================================
// ListView adapter
// =============================================================================

/// Minimal operation set of a native list control.
///
/// Batched operations arrive between [`begin_updates`](Self::begin_updates)
/// and [`end_updates`](Self::end_updates) with native batch semantics:
/// deletions and move sources use old positions, insertions and move
/// destinations use new positions.
///
/// Reloads and header/footer reconfiguration arrive after the batch, with
/// new positions.
pub trait ListView {
    /// Number of sections currently rendered.
    fn number_of_sections(&self) -> usize;

    /// Number of rows currently rendered in `section`.
    fn number_of_rows(&self, section: usize) -> usize;

    /// Discard everything and re-query the data source, without animation.
    fn reload_data(&mut self);

    /// Open a batched update scope.
    fn begin_updates(&mut self);

    /// Close the batched update scope.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::BatchRejected`](crate::StructureError::BatchRejected)
    /// when the control refuses the batch. The caller falls back to
    /// [`reload_data`](Self::reload_data).
    fn end_updates(&mut self) -> StructureResult<()>;

    /// Move a whole section.
    fn move_section(&mut self, from: usize, to: usize);

    /// Delete sections (old indices).
    fn delete_sections(&mut self, sections: &IndexSet, animation: RowAnimation);

    /// Insert sections (new indices).
    fn insert_sections(&mut self, sections: &IndexSet, animation: RowAnimation);

    /// Move a row.
    fn move_row(&mut self, from: IndexPath, to: IndexPath);

    /// Delete rows (old positions).
    fn delete_rows(&mut self, rows: &[IndexPath], animation: RowAnimation);

    /// Insert rows (new positions).
    fn insert_rows(&mut self, rows: &[IndexPath], animation: RowAnimation);

    /// Reload rows (new positions).
    fn reload_rows(&mut self, rows: &[IndexPath], animation: RowAnimation);

    /// Reconfigure the visible header of `section` in place.
    fn reconfigure_header(&mut self, section: usize, header: &HeaderFooter);

    /// Reconfigure the visible footer of `section` in place.
    fn reconfigure_footer(&mut self, section: usize, footer: &HeaderFooter);
}
