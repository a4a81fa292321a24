use crate::blob::{BlobRegistry, PreviewHandle};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An accepted image, exclusively owned by the session.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// A selected file together with the one live preview handle backing it.
#[derive(Debug)]
pub(crate) struct Selection {
    pub(crate) file: SelectedFile,
    pub(crate) preview: PreviewHandle,
}

/// Decoded response of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Annotated image bytes, already decoded from base64.
    pub annotated_image: Arc<[u8]>,
    /// Category label to detection count.
    pub summary: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
}

/// The user-visible error overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
    /// Distinguishes successive notices that carry the same text.
    pub serial: u64,
}

/// Single source of truth for the upload / analyze / present workflow.
///
/// Mutated only through `submit_candidate`, `begin_analysis`,
/// `complete_analysis`, `reset` and `dismiss_error`.
#[derive(Debug)]
pub struct WorkflowState {
    pub(crate) registry: BlobRegistry,
    pub(crate) selection: Option<Selection>,
    pub(crate) result: Option<AnalysisResult>,
    pub(crate) error: Option<ErrorNotice>,
    pub(crate) analyzing: bool,
    /// Bumped whenever an in-flight response must no longer be accepted.
    pub(crate) generation: u64,
    error_serial: u64,
}

impl WorkflowState {
    pub fn new(registry: BlobRegistry) -> Self {
        Self {
            registry,
            selection: None,
            result: None,
            error: None,
            analyzing: false,
            generation: 0,
            error_serial: 0,
        }
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.as_ref().map(|s| &s.file)
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.selection.as_ref().map(|s| &s.preview)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorNotice> {
        self.error.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn registry(&self) -> &BlobRegistry {
        &self.registry
    }

    pub(crate) fn set_error(&mut self, kind: ErrorKind, message: &str) {
        self.error_serial += 1;
        self.error = Some(ErrorNotice {
            kind,
            message: message.to_string(),
            serial: self.error_serial,
        });
    }

    /// Invalidates any outstanding request.
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Returns the workflow to its initial state. Idempotent.
    pub fn reset(&mut self) {
        // Dropping the selection revokes its preview handle.
        self.selection = None;
        self.result = None;
        self.error = None;
        self.analyzing = false;
        self.next_generation();
        tracing::info!("Workflow reset");
    }

    /// Clears the error notice if it is still the one identified by `serial`.
    pub fn dismiss_error(&mut self, serial: u64) -> bool {
        match &self.error {
            Some(notice) if notice.serial == serial => {
                self.error = None;
                true
            }
            _ => false,
        }
    }
}
