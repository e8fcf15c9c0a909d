//! Gemini API Client
//!
//! Handles communication with the Gemini generateContent API:
//! - inline document payload (base64) plus the fixed analysis instruction
//! - structured-output schema with near-deterministic decoding
//! - response sanitization and typed parsing

use super::prompts::CREDIT_ANALYSIS_PROMPT;
use super::sanitize::{sanitize_model_json, strip_data_url_prefix};
use super::schema::analysis_response_schema;
use super::types::{FinancialAnalysis, GeminiConfig};
use super::vision::prepare_inline_data;
use crate::ai::credentials::CredentialManager;
use crate::ai::http_client::gemini_client;
use crate::ai::Analyzer;
use crate::error::AnalysisError;
use crate::intake::AcceptedDocument;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini-backed analyzer: one generateContent call per document
pub struct GeminiAnalyzer {
    config: GeminiConfig,
}

impl GeminiAnalyzer {
    /// Create a new analyzer with an explicit configuration
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer with the default configuration and the API key
    /// resolved from the keychain or environment
    pub fn from_env() -> Result<Self, String> {
        let api_key = CredentialManager::get_api_key()?;
        Ok(Self::new(GeminiConfig {
            api_key,
            ..GeminiConfig::default()
        }))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn build_request(&self, mime_type: &str, base64_data: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: strip_data_url_prefix(base64_data).to_string(),
                        },
                    },
                    Part::Text {
                        text: CREDIT_ANALYSIS_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: analysis_response_schema(),
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }

    /// Send the request once. No retry: a transport fault surfaces as a
    /// single classified failure.
    async fn send_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AnalysisError> {
        let resp = gemini_client()
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::TransportFailure(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(
                "[Gemini] API error ({}): {}",
                status,
                body.chars().take(500).collect::<String>()
            );
            return Err(AnalysisError::TransportFailure(format!(
                "API error ({})",
                status
            )));
        }

        resp.json().await.map_err(|e| {
            AnalysisError::TransportFailure(format!("undecodable response envelope: {}", e))
        })
    }

    /// Sanitize and parse the model's text payload
    fn parse_analysis(text: &str) -> Result<FinancialAnalysis, AnalysisError> {
        let sanitized = sanitize_model_json(text);

        let analysis: FinancialAnalysis = serde_json::from_str(&sanitized)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        analysis
            .validate()
            .map_err(AnalysisError::MalformedResponse)?;

        Ok(analysis)
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, document: &AcceptedDocument) -> Result<FinancialAnalysis, AnalysisError> {
        let (mime_type, bytes) = prepare_inline_data(document.mime_type, &document.bytes);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let request = self.build_request(mime_type, &encoded);

        tracing::info!(
            "[Gemini] Analyzing {} ({}, {} bytes inline, sha256 {})",
            document.file_name,
            mime_type,
            bytes.len(),
            &document.checksum[..12]
        );

        let response = self.send_request(&request).await?;

        let text = response.first_text().ok_or(AnalysisError::EmptyResponse)?;
        Self::parse_analysis(text)
    }
}

// API request/response types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First non-empty text part of the first candidate
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::SAMPLE_ANALYSIS_JSON;
    use super::*;
    use crate::ai::gemini::types::DscrVerdict;

    fn analyzer() -> GeminiAnalyzer {
        GeminiAnalyzer::new(GeminiConfig {
            api_key: "test-key".to_string(),
            ..GeminiConfig::default()
        })
    }

    #[test]
    fn test_request_shape() {
        let request = analyzer().build_request("application/pdf", "JVBERi0x");
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[0]["inlineData"]["data"], "JVBERi0x");
        assert!(parts[1]["text"]
            .as_str()
            .unwrap()
            .contains("credit analysis"));

        let config = &value["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert!((config["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!(config["responseSchema"]["required"].is_array());
    }

    #[test]
    fn test_request_strips_data_url_prefix() {
        let request =
            analyzer().build_request("application/pdf", "data:application/pdf;base64,JVBERi0x");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["data"], "JVBERi0x");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let url = analyzer().endpoint();
        assert!(url.ends_with("/v1beta/models/gemini-3-pro-preview:generateContent"));
    }

    #[test]
    fn test_parse_fenced_payload_equals_clean_parse() {
        let clean: FinancialAnalysis = serde_json::from_str(SAMPLE_ANALYSIS_JSON).unwrap();

        // Same payload wrapped in fences, with a trailing comma injected
        let wrapped = format!(
            "```json\n{}\n```",
            SAMPLE_ANALYSIS_JSON.replace("\"confidenceScore\": 0.92", "\"confidenceScore\": 0.92,")
        );
        let parsed = GeminiAnalyzer::parse_analysis(&wrapped).unwrap();

        assert_eq!(parsed, clean);
        assert_eq!(parsed.dscr_verdict, DscrVerdict::Approved);
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let broken = SAMPLE_ANALYSIS_JSON.replace("\"dscrVerdict\": \"APPROVED\",", "");
        let err = GeminiAnalyzer::parse_analysis(&broken).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = GeminiAnalyzer::parse_analysis("the statement looks fine to me").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_first_text_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_first_text_blank_part() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#,
        )
        .unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_first_text_reads_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{}"}]}}, {"content": {"parts": [{"text": "ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("{}"));
    }
}
