use crate::errors::{ScanError, MISSING_JOB_DESCRIPTION, NO_RESUMES_PROVIDED};
use crate::intake::file_set::{FileSet, SubmittedFile};
use crate::models::PriorityConfiguration;

/// Everything one scan sends to the ranking service. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    job_description: String,
    files: Vec<SubmittedFile>,
    priorities: PriorityConfiguration,
}

impl ScanRequest {
    /// Checks preconditions in order and stops at the first failure:
    /// job description first, then the file set.
    pub fn build(
        job_description: &str,
        files: &FileSet,
        priorities: &PriorityConfiguration,
    ) -> Result<Self, ScanError> {
        if job_description.trim().is_empty() {
            return Err(ScanError::Validation(MISSING_JOB_DESCRIPTION.to_string()));
        }
        if files.is_empty() {
            return Err(ScanError::Validation(NO_RESUMES_PROVIDED.to_string()));
        }

        Ok(Self {
            job_description: job_description.to_string(),
            files: files.iter().cloned().collect(),
            priorities: *priorities,
        })
    }

    /// Sent as typed by the user; only the emptiness check trims.
    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn files(&self) -> &[SubmittedFile] {
        &self.files
    }

    pub fn priorities(&self) -> &PriorityConfiguration {
        &self.priorities
    }
}
