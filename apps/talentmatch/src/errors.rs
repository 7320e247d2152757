use serde_json::Value;
use thiserror::Error;

/// Shown for every failure that is not a client-side validation problem.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Analysis failed. Please check your connection or file formats and try again.";

pub const MISSING_JOB_DESCRIPTION: &str = "missing job description";
pub const NO_RESUMES_PROVIDED: &str = "no resumes provided";

/// Everything that can go wrong between pressing "analyze" and holding a ranked result set.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A precondition checked before any network traffic.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No response came back, or the error body could not be read as JSON.
    #[error("Network error: {0}")]
    Network(String),

    /// The ranking service answered with a non-success status and a structured body.
    #[error("Ranking service error (status {status}): {payload}")]
    Service { status: u16, payload: Value },

    /// Success status, but the body did not carry a usable `results` sequence.
    #[error("Response format error: {0}")]
    ResponseFormat(String),
}

impl ScanError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ScanError::Validation(_))
    }

    /// Collapses the error into the single line shown to the user.
    /// The underlying detail only goes to the diagnostic log.
    pub fn user_message(&self) -> String {
        match self {
            ScanError::Validation(reason) => match reason.as_str() {
                MISSING_JOB_DESCRIPTION => {
                    "Please provide a Job Description to begin analysis.".to_string()
                }
                NO_RESUMES_PROVIDED => "Please upload at least one resume PDF.".to_string(),
                other => format!("Please check your input: {other}."),
            },
            ScanError::Network(detail) => {
                tracing::error!("Network error: {detail}");
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
            ScanError::Service { status, payload } => {
                tracing::error!("Ranking service returned {status}: {payload}");
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
            ScanError::ResponseFormat(detail) => {
                tracing::error!("Invalid response format: {detail}");
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(e: reqwest::Error) -> Self {
        ScanError::Network(e.to_string())
    }
}
