//! Structured-output schema for the analysis response

use serde_json::{json, Value};

/// The `responseSchema` sent with every analysis request. Mirrors
/// `FinancialAnalysis`; every field is required except `period`.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            // Step 1: DSCR
            "operatingCashFlow": {
                "type": "NUMBER",
                "description": "Net Operating Cash Flow."
            },
            "totalDebtService": {
                "type": "NUMBER",
                "description": "Total annual debt service (Principal + Interest)."
            },
            "dscr": {
                "type": "NUMBER",
                "description": "Operating Cash Flow / Total Debt Service."
            },
            "dscrVerdict": {
                "type": "STRING",
                "enum": ["APPROVED", "REJECTED", "REVIEW"],
                "description": "APPROVED if DSCR >= 1.25, REJECTED if < 1.25."
            },
            // Step 2: Leverage
            "fundedDebt": {
                "type": "NUMBER",
                "description": "Total Funded Debt (Short Term Debt + Long Term Debt)."
            },
            "ebitda": {
                "type": "NUMBER",
                "description": "Earnings Before Interest, Taxes, Depreciation, and Amortization."
            },
            "debtToEbitda": {
                "type": "NUMBER",
                "description": "Funded Debt / EBITDA."
            },
            "leverageVerdict": {
                "type": "STRING",
                "enum": ["SAFE", "RISKY", "REVIEW"],
                "description": "SAFE if Debt/EBITDA < 3.0, RISKY if >= 3.0."
            },
            // Step 3: Liquidity
            "currentAssets": {
                "type": "NUMBER",
                "description": "Total Current Assets."
            },
            "currentLiabilities": {
                "type": "NUMBER",
                "description": "Total Current Liabilities."
            },
            "currentRatio": {
                "type": "NUMBER",
                "description": "Current Assets / Current Liabilities."
            },
            "liquidityVerdict": {
                "type": "STRING",
                "enum": ["SAFE", "RISKY", "REVIEW"],
                "description": "SAFE if Current Ratio >= 1.2, RISKY if < 1.2."
            },
            // Step 4: Solvency
            "totalLiabilities": {
                "type": "NUMBER",
                "description": "Total Liabilities."
            },
            "totalEquity": {
                "type": "NUMBER",
                "description": "Total Owner's Equity."
            },
            "debtToEquity": {
                "type": "NUMBER",
                "description": "Total Liabilities / Total Equity."
            },
            "solvencyVerdict": {
                "type": "STRING",
                "enum": ["SAFE", "RISKY", "REVIEW"],
                "description": "SAFE if Debt/Equity <= 2.5, RISKY if > 2.5."
            },
            // Meta
            "currency": { "type": "STRING" },
            "period": { "type": "STRING" },
            "summary": {
                "type": "STRING",
                "description": "Executive summary covering DSCR, Leverage, Liquidity, and Solvency."
            },
            "confidenceScore": { "type": "NUMBER" }
        },
        "required": [
            "operatingCashFlow",
            "totalDebtService",
            "dscr",
            "dscrVerdict",
            "fundedDebt",
            "ebitda",
            "debtToEbitda",
            "leverageVerdict",
            "currentAssets",
            "currentLiabilities",
            "currentRatio",
            "liquidityVerdict",
            "totalLiabilities",
            "totalEquity",
            "debtToEquity",
            "solvencyVerdict",
            "currency",
            "summary",
            "confidenceScore"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_is_not_required() {
        let schema = analysis_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        assert_eq!(required.len(), 19);
        assert!(!required.contains(&"period"));
        assert!(required.contains(&"dscrVerdict"));
        assert!(required.contains(&"confidenceScore"));
    }

    #[test]
    fn test_every_required_field_has_a_property() {
        let schema = analysis_response_schema();
        let properties = schema["properties"].as_object().unwrap();

        for field in schema["required"].as_array().unwrap() {
            let name = field.as_str().unwrap();
            assert!(properties.contains_key(name), "missing property: {}", name);
        }
        assert!(properties.contains_key("period"));
    }

    #[test]
    fn test_verdict_domains_are_closed() {
        let schema = analysis_response_schema();
        assert_eq!(
            schema["properties"]["dscrVerdict"]["enum"],
            json!(["APPROVED", "REJECTED", "REVIEW"])
        );
        assert_eq!(
            schema["properties"]["leverageVerdict"]["enum"],
            json!(["SAFE", "RISKY", "REVIEW"])
        );
    }
}
