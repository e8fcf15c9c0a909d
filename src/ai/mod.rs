//! Analysis capability layer
//!
//! The engine's only computation is delegated: a document goes out to a
//! vision/JSON model, a typed `FinancialAnalysis` comes back. The `Analyzer`
//! trait isolates that call so the production Gemini client is substitutable
//! with a deterministic rule engine or a test fake.

pub mod credentials;
pub mod gemini;
pub mod http_client;

pub use credentials::CredentialManager;
pub use gemini::{
    sanitize_model_json, DscrVerdict, FinancialAnalysis, GeminiAnalyzer, GeminiConfig,
    RatioVerdict,
};

use crate::error::AnalysisError;
use crate::intake::AcceptedDocument;
use async_trait::async_trait;

/// Capability interface for the external analysis call:
/// document bytes + MIME type in, typed analysis or classified failure out.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, document: &AcceptedDocument) -> Result<FinancialAnalysis, AnalysisError>;
}
