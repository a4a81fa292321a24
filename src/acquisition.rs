//! Input acquisition: validates offered files and installs the accepted one.

use crate::constants::{IMAGE_MEDIA_PREFIX, INVALID_IMAGE_MESSAGE};
use crate::state::{ErrorKind, SelectedFile, Selection, WorkflowState};
use std::sync::Arc;
use thiserror::Error;

/// A file offered by the user, before validation.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    /// Declared media type, as reported by the file source.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The declared media type does not start with `image/`.
    #[error("{} (declared type: {media_type:?})", INVALID_IMAGE_MESSAGE)]
    NotAnImage { media_type: String },
}

/// Outcome of offering a candidate to the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing was offered.
    Ignored,
    Accepted,
    Rejected(ValidationError),
}

/// Checks the declared media type only. The bytes are never sniffed, so a
/// mislabeled file passes and a correctly encoded image with the wrong label
/// does not.
pub fn validate_candidate(candidate: Candidate) -> Result<SelectedFile, ValidationError> {
    if !candidate.media_type.starts_with(IMAGE_MEDIA_PREFIX) {
        return Err(ValidationError::NotAnImage {
            media_type: candidate.media_type,
        });
    }

    Ok(SelectedFile {
        name: candidate.name,
        media_type: candidate.media_type,
        bytes: Arc::from(candidate.bytes),
    })
}

/// Picks the first of the offered items. Drops and picker selections both go
/// through here so extra files are ignored the same way.
pub fn first_offered<T, I>(offered: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
{
    let mut iter = offered.into_iter();
    let first = iter.next()?;
    let ignored = iter.count();
    if ignored > 0 {
        tracing::debug!("Ignoring {} additional file(s); only the first is used", ignored);
    }
    Some(first)
}

impl WorkflowState {
    /// Validates `candidate` and, if accepted, makes it the selected file.
    ///
    /// Acceptance replaces the previous preview handle, clears any error and
    /// stale result, and orphans an in-flight request. Rejection only sets
    /// the error notice.
    pub fn submit_candidate(&mut self, candidate: Option<Candidate>) -> Submission {
        let Some(candidate) = candidate else {
            tracing::debug!("No candidate offered");
            return Submission::Ignored;
        };

        let name = candidate.name.clone();
        match validate_candidate(candidate) {
            Ok(file) => {
                // Release the old handle before registering the new one.
                self.selection = None;
                let preview = self.registry.create(&file.media_type, file.bytes.clone());
                tracing::info!(
                    "Accepted {} ({}, {} bytes)",
                    file.name,
                    file.media_type,
                    file.bytes.len()
                );
                self.selection = Some(Selection { file, preview });
                self.error = None;
                self.result = None;
                if self.analyzing {
                    tracing::debug!("Orphaning in-flight analysis for previous file");
                }
                self.analyzing = false;
                self.next_generation();
                Submission::Accepted
            }
            Err(e) => {
                tracing::warn!("Rejected {}: {}", name, e);
                self.set_error(ErrorKind::Validation, INVALID_IMAGE_MESSAGE);
                Submission::Rejected(e)
            }
        }
    }
}
