//! Gemini structured-output analysis pipeline
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  1. PREPARE: downscale oversized images, base64-encode bytes   │
//! │  2. REQUEST: one generateContent call (prompt + schema, t=0.1) │
//! │  3. EXTRACT: first candidate text part                         │
//! │  4. SANITIZE: strip code fences and trailing commas            │
//! │  5. PARSE: typed FinancialAnalysis, verdicts as closed enums   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries anywhere in the pipeline: a failure surfaces once as a single
//! classified `AnalysisError` and the user must reset to try again.

mod client;
mod prompts;
mod sanitize;
mod schema;
mod vision;

pub mod types;

pub use client::GeminiAnalyzer;
pub use sanitize::{sanitize_model_json, strip_data_url_prefix};
pub use types::{DscrVerdict, FinancialAnalysis, GeminiConfig, RatioVerdict};
