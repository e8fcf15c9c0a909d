//! Error taxonomy for the analysis engine
//!
//! Two recoverable-vs-terminal families:
//! - `ValidationError`: intake rejections, surfaced inline, session untouched
//! - `AnalysisError`: model-call failures, drive the session to Error
//!
//! `SessionError` wraps the submission-sequencing faults on top of intake.

use thiserror::Error;

/// Rejections from document intake. Recovered locally; the session status
/// is never changed by a validation failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// MIME type outside {application/pdf, image/jpeg, image/png, image/webp}
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Byte size over the upload limit
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
}

/// Failures from the analysis call. Not recoverable locally; the session
/// moves to Error and the user must reset to try again.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The model response carried no text payload
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The response text did not parse as the expected analysis shape
    #[error("model response did not match the expected shape: {0}")]
    MalformedResponse(String),

    /// Request construction, network, or HTTP-level failure
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl AnalysisError {
    /// The single generic message shown to the user. Transport-level detail
    /// stays in the logs.
    pub fn user_message(&self) -> &'static str {
        "Failed to analyze the document. Ensure it contains clear Balance Sheet and Cash Flow data."
    }
}

/// Faults returned by `SessionController::upload` without touching session
/// state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An upload or analysis is already in flight
    #[error("an analysis is already in progress")]
    Busy,

    /// A previous result is still displayed; reset before uploading again
    #[error("session holds a finished analysis; reset before uploading again")]
    NotReset,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
