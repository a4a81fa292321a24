//! Analysis request orchestration.
//!
//! A run is split in three steps so the caller can render between them:
//! `begin_analysis` (synchronous state transition), the service call (the only
//! suspension point), and `complete_analysis`. Every request carries the
//! generation it was started under, and a response is applied only if the
//! workflow is still on that generation. A reset, a newly accepted file or a
//! newer request therefore discards it.

use crate::api::{AnalysisService, ApiError, UploadFile};
use crate::constants::ANALYSIS_FAILED_MESSAGE;
use crate::state::{AnalysisResult, ErrorKind, WorkflowState};
use std::cell::RefCell;

/// A request tagged with the generation it belongs to.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub generation: u64,
    pub upload: UploadFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed,
    /// The response belonged to an older generation and was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No file was selected.
    Skipped,
    Completed(Completion),
}

impl WorkflowState {
    /// Enters the analyzing state and packages the selected file.
    ///
    /// Returns `None` when no file is selected. A call while another request
    /// is in flight starts an independent request and supersedes the first.
    pub fn begin_analysis(&mut self) -> Option<AnalysisRequest> {
        let file = self.selected_file()?.clone();
        let upload = UploadFile {
            file_name: file.name,
            media_type: file.media_type,
            bytes: file.bytes,
        };

        if self.analyzing {
            tracing::warn!("Analysis already in flight; superseding it");
        }
        self.analyzing = true;
        self.error = None;
        self.result = None;
        let generation = self.next_generation();

        Some(AnalysisRequest { generation, upload })
    }

    /// Applies a response if it still belongs to the current generation.
    pub fn complete_analysis(
        &mut self,
        generation: u64,
        outcome: Result<AnalysisResult, ApiError>,
    ) -> Completion {
        if generation != self.generation {
            tracing::debug!(
                "Discarding response for generation {} (current {})",
                generation,
                self.generation
            );
            return Completion::Stale;
        }

        self.analyzing = false;
        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Analysis complete: {} categories, {} objects",
                    result.summary.len(),
                    result.summary.values().sum::<u64>()
                );
                self.result = Some(result);
                Completion::Succeeded
            }
            Err(e) => {
                tracing::error!("Analysis failed: {}", e);
                self.result = None;
                self.set_error(ErrorKind::Transport, ANALYSIS_FAILED_MESSAGE);
                Completion::Failed
            }
        }
    }
}

/// Runs one analysis against `service`.
///
/// `on_started` is called once the workflow has entered the analyzing state
/// and before the request is awaited. No borrow of `workflow` is held while
/// the request is outstanding.
pub async fn run_analysis<F>(
    workflow: &RefCell<WorkflowState>,
    service: &dyn AnalysisService,
    on_started: F,
) -> RunOutcome
where
    F: FnOnce(),
{
    let request = workflow.borrow_mut().begin_analysis();
    let Some(request) = request else {
        tracing::debug!("Analysis requested without a selected file");
        return RunOutcome::Skipped;
    };
    on_started();

    tracing::debug!(
        "Sending generation {} to {}",
        request.generation,
        service.endpoint()
    );
    let outcome = service.analyze(request.upload).await;
    let completion = workflow
        .borrow_mut()
        .complete_analysis(request.generation, outcome);
    RunOutcome::Completed(completion)
}
