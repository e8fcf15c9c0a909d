//! Fixed instruction for the four-step credit analysis

/// Analysis prompt sent alongside the inline document. The thresholds here
/// must agree with the verdict descriptions in the response schema.
pub const CREDIT_ANALYSIS_PROMPT: &str = r#"Perform a comprehensive credit analysis on this financial statement for a banker.

STEP 1: Verify Repayment Capacity (Cash Flow)
- Goal: "Can they make the monthly payments?"
- Calculate DSCR = Net Operating Cash Flow / Total Debt Service.
- Benchmark: DSCR >= 1.25 is APPROVED. Below is REJECTED.

STEP 2: Measure Total Debt Load (Leverage)
- Goal: "Is the company borrowing more than it is worth?"
- Calculate Funded Debt to EBITDA = Total Interest Bearing Debt / EBITDA.
- Benchmark: Ratio < 3.0x is SAFE. Ratio >= 3.0x is RISKY.
- Note: Funded Debt = Short Term Debt + Long Term Debt.

STEP 3: Assess Short-Term Survival (Liquidity)
- Goal: "Can they pay their bills if a client pays late?"
- Calculate Current Ratio = Current Assets / Current Liabilities.
- Benchmark: Ratio >= 1.2x is SAFE. Below is RISKY.

STEP 4: Confirm Owner Commitment (Solvency)
- Goal: "Do the owners have skin in the game?"
- Calculate Debt-to-Equity Ratio = Total Liabilities / Total Equity.
- Benchmark: Ratio <= 2.5x is SAFE. Ratio > 2.5x is RISKY.

Provide a strict verdict for all four steps."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_all_benchmarks() {
        assert!(CREDIT_ANALYSIS_PROMPT.contains("1.25"));
        assert!(CREDIT_ANALYSIS_PROMPT.contains("3.0x"));
        assert!(CREDIT_ANALYSIS_PROMPT.contains("1.2x"));
        assert!(CREDIT_ANALYSIS_PROMPT.contains("2.5x"));
    }

    #[test]
    fn test_prompt_covers_four_steps() {
        for step in ["STEP 1", "STEP 2", "STEP 3", "STEP 4"] {
            assert!(CREDIT_ANALYSIS_PROMPT.contains(step));
        }
    }
}
