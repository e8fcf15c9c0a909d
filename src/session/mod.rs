//! Upload session state machine
//!
//! Sequences intake and analysis for a single view surface:
//! `Idle → Uploading → Analyzing → Complete | Error`, with explicit reset
//! back to `Idle`. The controller owns the one session record and is the
//! only writer; at most one analysis is in flight.

use crate::ai::{Analyzer, FinancialAnalysis};
use crate::error::SessionError;
use crate::intake;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Cosmetic pause between accepting the upload and starting the analysis.
/// A UX artifact, not a queuing stage.
pub const UPLOAD_DELAY: Duration = Duration::from_millis(800);

/// Status of an upload session
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for a document
    Idle,
    /// Document accepted, cosmetic delay running
    Uploading,
    /// Analysis call in flight
    Analyzing,
    /// Analysis succeeded; result held until reset
    Complete,
    /// Analysis failed; message held until reset
    Error,
}

impl SessionStatus {
    /// Uploading or Analyzing: a submission is being worked on
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Uploading | Self::Analyzing)
    }

    /// Complete or Error: only reset leads out
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

/// The session record a view layer renders. One per surface, re-created on
/// reset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    /// Unique session identifier, regenerated on reset
    pub session_id: Uuid,
    /// Current status
    pub status: SessionStatus,
    /// Name of the accepted document, cleared on reset
    pub file_name: Option<String>,
    /// Analysis result, present only in Complete
    pub result: Option<FinancialAnalysis>,
    /// User-facing message, present only in Error
    pub error_message: Option<String>,
    /// When the last transition happened
    pub updated_at: DateTime<Utc>,
}

impl UploadSession {
    fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            status: SessionStatus::Idle,
            file_name: None,
            result: None,
            error_message: None,
            updated_at: Utc::now(),
        }
    }

    fn transition(&mut self, status: SessionStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Callback invoked with a fresh snapshot after every transition
pub type SessionObserver = Box<dyn Fn(&UploadSession) + Send + Sync>;

/// Drives the upload lifecycle: validates the document, runs the cosmetic
/// upload delay, invokes the analyzer once, and lands the session in
/// Complete or Error.
pub struct SessionController {
    analyzer: Arc<dyn Analyzer>,
    session: Arc<Mutex<UploadSession>>,
    observer: Option<SessionObserver>,
    upload_delay: Duration,
}

impl SessionController {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            session: Arc::new(Mutex::new(UploadSession::new())),
            observer: None,
            upload_delay: UPLOAD_DELAY,
        }
    }

    /// Override the cosmetic upload delay (tests run with zero)
    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    /// Register a callback invoked with a snapshot after every transition
    pub fn with_observer(
        mut self,
        observer: impl Fn(&UploadSession) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Clone of the current session record
    pub async fn snapshot(&self) -> UploadSession {
        self.session.lock().await.clone()
    }

    /// Run one upload through the lifecycle.
    ///
    /// Validation failures are returned to the caller and leave the session
    /// exactly as it was. An accepted document always lands the session in
    /// Complete or Error; the analyzer is invoked exactly once.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadSession, SessionError> {
        // Guard, validate, and enter Uploading under one lock so a racing
        // submission cannot slip past the single-flight check.
        let document = {
            let mut session = self.session.lock().await;
            match session.status {
                SessionStatus::Idle => {}
                SessionStatus::Uploading | SessionStatus::Analyzing => {
                    return Err(SessionError::Busy)
                }
                SessionStatus::Complete | SessionStatus::Error => {
                    return Err(SessionError::NotReset)
                }
            }

            let document = intake::validate(file_name, bytes)?;
            session.transition(SessionStatus::Uploading);
            session.file_name = Some(document.file_name.clone());
            document
        };
        self.notify().await;

        tokio::time::sleep(self.upload_delay).await;

        self.apply(|session| session.transition(SessionStatus::Analyzing))
            .await;

        let snapshot = match self.analyzer.analyze(&document).await {
            Ok(result) => {
                tracing::info!(
                    "[Session] Analysis complete for {} (confidence {:.2})",
                    document.file_name,
                    result.confidence_score
                );
                self.apply(move |session| {
                    session.transition(SessionStatus::Complete);
                    session.result = Some(result);
                })
                .await
            }
            Err(err) => {
                tracing::error!("[Session] Analysis failed for {}: {}", document.file_name, err);
                let message = err.user_message();
                self.apply(move |session| {
                    session.transition(SessionStatus::Error);
                    session.error_message = Some(message.to_string());
                })
                .await
            }
        };

        Ok(snapshot)
    }

    /// Return to Idle from a terminal state, clearing the record. Idle is a
    /// no-op; reset during an in-flight analysis is ignored (cancellation is
    /// unsupported).
    pub async fn reset(&self) -> UploadSession {
        let snapshot = {
            let mut session = self.session.lock().await;
            if session.status.is_in_flight() {
                tracing::warn!("[Session] Ignoring reset while an analysis is in flight");
                return session.clone();
            }
            if session.status == SessionStatus::Idle {
                return session.clone();
            }

            *session = UploadSession::new();
            session.clone()
        };

        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
        snapshot
    }

    /// Mutate the record under the lock, then notify the observer with the
    /// resulting snapshot outside it
    async fn apply<F>(&self, f: F) -> UploadSession
    where
        F: FnOnce(&mut UploadSession),
    {
        let snapshot = {
            let mut session = self.session.lock().await;
            f(&mut session);
            session.clone()
        };

        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
        snapshot
    }

    async fn notify(&self) {
        if let Some(observer) = &self.observer {
            let snapshot = self.snapshot().await;
            observer(&snapshot);
        }
    }
}
