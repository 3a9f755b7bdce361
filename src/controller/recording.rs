//! Recording list view used by the applicator and controller tests.

use crate::error::{StructureError, StructureResult};
use crate::index::{IndexPath, IndexSet};
use crate::structure::HeaderFooter;
use crate::surface::{ListView, RowAnimation};

/// One call received by [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ReloadData,
    BeginUpdates,
    EndUpdates,
    MoveSection(usize, usize),
    DeleteSections(Vec<usize>, RowAnimation),
    InsertSections(Vec<usize>, RowAnimation),
    MoveRow(IndexPath, IndexPath),
    DeleteRows(Vec<IndexPath>, RowAnimation),
    InsertRows(Vec<IndexPath>, RowAnimation),
    ReloadRows(Vec<IndexPath>, RowAnimation),
    /// Section and text title (`None` for view headers)
    ReconfigureHeader(usize, Option<String>),
    ReconfigureFooter(usize, Option<String>),
}

/// List view double that records calls and reports `counts` as its
/// rendered row counts.
#[derive(Default)]
pub(crate) struct RecordingView {
    pub counts: Vec<usize>,
    pub calls: Vec<Call>,
    /// Reject every batch with this reason
    pub reject: Option<String>,
    /// Runs inside end_updates, like a synchronous completion handler
    pub on_end_updates: Option<Box<dyn FnMut()>>,
}

impl RecordingView {
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl ListView for RecordingView {
    fn number_of_sections(&self) -> usize {
        self.counts.len()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        self.counts.get(section).copied().unwrap_or(0)
    }

    fn reload_data(&mut self) {
        self.calls.push(Call::ReloadData);
    }

    fn begin_updates(&mut self) {
        self.calls.push(Call::BeginUpdates);
    }

    fn end_updates(&mut self) -> StructureResult<()> {
        self.calls.push(Call::EndUpdates);
        if let Some(hook) = self.on_end_updates.as_mut() {
            hook();
        }
        match &self.reject {
            Some(reason) => Err(StructureError::batch_rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn move_section(&mut self, from: usize, to: usize) {
        self.calls.push(Call::MoveSection(from, to));
    }

    fn delete_sections(&mut self, sections: &IndexSet, animation: RowAnimation) {
        self.calls
            .push(Call::DeleteSections(sections.iter().copied().collect(), animation));
    }

    fn insert_sections(&mut self, sections: &IndexSet, animation: RowAnimation) {
        self.calls
            .push(Call::InsertSections(sections.iter().copied().collect(), animation));
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.calls.push(Call::MoveRow(from, to));
    }

    fn delete_rows(&mut self, rows: &[IndexPath], animation: RowAnimation) {
        self.calls.push(Call::DeleteRows(rows.to_vec(), animation));
    }

    fn insert_rows(&mut self, rows: &[IndexPath], animation: RowAnimation) {
        self.calls.push(Call::InsertRows(rows.to_vec(), animation));
    }

    fn reload_rows(&mut self, rows: &[IndexPath], animation: RowAnimation) {
        self.calls.push(Call::ReloadRows(rows.to_vec(), animation));
    }

    fn reconfigure_header(&mut self, section: usize, header: &HeaderFooter) {
        self.calls.push(Call::ReconfigureHeader(
            section,
            header.as_text().map(str::to_owned),
        ));
    }

    fn reconfigure_footer(&mut self, section: usize, footer: &HeaderFooter) {
        self.calls.push(Call::ReconfigureFooter(
            section,
            footer.as_text().map(str::to_owned),
        ));
    }
}
