//! Typed model for the credit analysis response

use serde::{Deserialize, Serialize};

/// Verdict on repayment capacity (DSCR against the 1.25 threshold)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DscrVerdict {
    Approved,
    Rejected,
    Review,
}

impl DscrVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Review => "REVIEW",
        }
    }
}

/// Verdict on a benchmark ratio (leverage, liquidity, solvency)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RatioVerdict {
    Safe,
    Risky,
    Review,
}

impl RatioVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Risky => "RISKY",
            Self::Review => "REVIEW",
        }
    }
}

/// The four-ratio credit assessment returned by the model.
///
/// Ratios and verdicts are trusted as given; the engine never recomputes
/// them locally. Constructed once per successful analysis and held
/// immutably by the session until reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    // Repayment capacity
    pub operating_cash_flow: f64,
    pub total_debt_service: f64,
    pub dscr: f64,
    pub dscr_verdict: DscrVerdict,

    // Leverage
    pub funded_debt: f64,
    pub ebitda: f64,
    pub debt_to_ebitda: f64,
    pub leverage_verdict: RatioVerdict,

    // Liquidity
    pub current_assets: f64,
    pub current_liabilities: f64,
    pub current_ratio: f64,
    pub liquidity_verdict: RatioVerdict,

    // Solvency
    pub total_liabilities: f64,
    pub total_equity: f64,
    pub debt_to_equity: f64,
    pub solvency_verdict: RatioVerdict,

    // Meta
    pub currency: String,
    /// Reporting period. The request asks the model for it, but parsing
    /// never fails solely on its absence.
    #[serde(default)]
    pub period: Option<String>,
    pub summary: String,
    pub confidence_score: f64,
}

impl FinancialAnalysis {
    /// Every raw figure and ratio must be a finite number.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in self.figures() {
            if !value.is_finite() {
                return Err(format!("non-finite value for {}", name));
            }
        }
        Ok(())
    }

    fn figures(&self) -> [(&'static str, f64); 13] {
        [
            ("operatingCashFlow", self.operating_cash_flow),
            ("totalDebtService", self.total_debt_service),
            ("dscr", self.dscr),
            ("fundedDebt", self.funded_debt),
            ("ebitda", self.ebitda),
            ("debtToEbitda", self.debt_to_ebitda),
            ("currentAssets", self.current_assets),
            ("currentLiabilities", self.current_liabilities),
            ("currentRatio", self.current_ratio),
            ("totalLiabilities", self.total_liabilities),
            ("totalEquity", self.total_equity),
            ("debtToEquity", self.debt_to_equity),
            ("confidenceScore", self.confidence_score),
        ]
    }
}

/// Configuration for the Gemini analysis client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for Google AI
    pub api_key: String,

    /// Base URL for the API
    pub base_url: String,

    /// Model to use
    pub model: String,

    /// Sampling temperature. Scoring, not creative generation: keep low.
    pub temperature: f32,

    /// Output cap for the structured response
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            temperature: 0.1,
            max_output_tokens: 2048,
        }
    }
}

/// Canonical well-formed response payload shared across the crate's tests
#[cfg(test)]
pub(crate) const SAMPLE_ANALYSIS_JSON: &str = r#"{
        "operatingCashFlow": 420000.0,
        "totalDebtService": 300000.0,
        "dscr": 1.4,
        "dscrVerdict": "APPROVED",
        "fundedDebt": 900000.0,
        "ebitda": 500000.0,
        "debtToEbitda": 1.8,
        "leverageVerdict": "SAFE",
        "currentAssets": 600000.0,
        "currentLiabilities": 400000.0,
        "currentRatio": 1.5,
        "liquidityVerdict": "SAFE",
        "totalLiabilities": 1200000.0,
        "totalEquity": 800000.0,
        "debtToEquity": 1.5,
        "solvencyVerdict": "SAFE",
        "currency": "USD",
        "period": "FY2025",
        "summary": "Strong repayment capacity with moderate leverage.",
        "confidenceScore": 0.92
    }"#;
