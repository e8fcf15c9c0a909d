//! credscope — AI credit analysis engine for financial statements
//!
//! Forwards an uploaded statement (PDF or image) to a vision/JSON model with
//! a fixed four-step credit prompt and a structured-output schema, parses
//! the response into a typed [`FinancialAnalysis`], and sequences the upload
//! lifecycle through a small state machine ([`SessionController`]) for a
//! view layer to render. All ratio math and verdicts come from the model;
//! nothing is recomputed locally and nothing is persisted.

pub mod ai;
pub mod error;
pub mod intake;
pub mod session;

pub use ai::{
    Analyzer, CredentialManager, DscrVerdict, FinancialAnalysis, GeminiAnalyzer, GeminiConfig,
    RatioVerdict,
};
pub use error::{AnalysisError, SessionError, ValidationError};
pub use intake::AcceptedDocument;
pub use session::{SessionController, SessionStatus, UploadSession};

use tracing_subscriber::EnvFilter;

/// One-time process setup: load `.env` (the API credential) and install the
/// tracing subscriber. Call once from the host shell before any analysis.
pub fn init() {
    // Try the working directory first, then the parent (dev shells often run
    // from a subdirectory of the checkout)
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    // Default: warn for dependencies, info for the engine (session and
    // analysis summaries visible). RUST_LOG overrides.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,credscope=info")),
        )
        .try_init();
}

/// Build a controller wired to the production Gemini analyzer, with the API
/// key resolved from the keychain or environment.
pub fn default_controller() -> Result<SessionController, String> {
    let analyzer = GeminiAnalyzer::from_env()?;
    Ok(SessionController::new(std::sync::Arc::new(analyzer)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
