//! Classification of FIGARO row and column codes
//!
//! Each `Set_i`/`Set_j` code belongs to one of nine categories. The rules
//! are ordered; the first match wins, and anything left over is an
//! industry code (NACE).

use serde::Serialize;
use std::fmt;

/// Category of a FIGARO classification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CodeCategory {
    /// CPA product codes (`CPA_*`)
    Product,
    /// Distributive transactions (`D` followed by a digit)
    Distributive,
    /// Balancing items (`B*`)
    Balancing,
    /// Final expenditure codes (`P` short or followed by a digit)
    Expenditure,
    /// Financial transactions (`F` followed by a digit)
    Financial,
    /// Institutional sectors (`S` followed by a digit)
    Sector,
    /// Non-financial assets (`N` followed by a digit)
    Asset,
    /// NACE industry codes (everything else)
    Industry,
    /// Empty or missing code
    Unclassified,
}

impl CodeCategory {
    /// Human-readable label used in quality report tables.
    pub fn label(&self) -> &'static str {
        match self {
            CodeCategory::Product => "Products (CPA)",
            CodeCategory::Distributive => "Distributive (D)",
            CodeCategory::Balancing => "Balancing (B)",
            CodeCategory::Expenditure => "Expenditure (P)",
            CodeCategory::Financial => "Financial (F)",
            CodeCategory::Sector => "Sectors (S)",
            CodeCategory::Asset => "Assets (N)",
            CodeCategory::Industry => "Industries (NACE)",
            CodeCategory::Unclassified => "Unclassified",
        }
    }

}

impl fmt::Display for CodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classifies a single row or column code.
pub fn classify(code: &str) -> CodeCategory {
    if code.is_empty() {
        return CodeCategory::Unclassified;
    }
    let second_is_digit = code
        .as_bytes()
        .get(1)
        .map(u8::is_ascii_digit)
        .unwrap_or(false);

    if code.starts_with("CPA_") {
        CodeCategory::Product
    } else if code.starts_with('D') && second_is_digit {
        CodeCategory::Distributive
    } else if code.starts_with('B') {
        CodeCategory::Balancing
    } else if code.starts_with('P') && (code.len() < 4 || second_is_digit) {
        CodeCategory::Expenditure
    } else if code.starts_with('F') && second_is_digit {
        CodeCategory::Financial
    } else if code.starts_with('S') && second_is_digit {
        CodeCategory::Sector
    } else if code.starts_with('N') && second_is_digit {
        CodeCategory::Asset
    } else {
        CodeCategory::Industry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_products() {
        assert_eq!(classify("CPA_C29"), CodeCategory::Product);
        assert_eq!(classify("CPA_A01"), CodeCategory::Product);
    }

    #[test]
    fn test_classify_distributive() {
        assert_eq!(classify("D11"), CodeCategory::Distributive);
        assert_eq!(classify("D21X31"), CodeCategory::Distributive);
    }

    #[test]
    fn test_classify_balancing() {
        assert_eq!(classify("B2"), CodeCategory::Balancing);
        assert_eq!(classify("B2A3G"), CodeCategory::Balancing);
    }

    #[test]
    fn test_classify_expenditure() {
        assert_eq!(classify("P3_S14"), CodeCategory::Expenditure);
        assert_eq!(classify("P51G"), CodeCategory::Expenditure);
        assert_eq!(classify("P6"), CodeCategory::Expenditure);
    }

    #[test]
    fn test_expenditure_requires_short_or_digit() {
        assert_eq!(classify("P85"), CodeCategory::Expenditure);
        assert_eq!(classify("PXXX"), CodeCategory::Industry);
    }

    #[test]
    fn test_classify_financial_sector_asset() {
        assert_eq!(classify("F2"), CodeCategory::Financial);
        assert_eq!(classify("S14"), CodeCategory::Sector);
        assert_eq!(classify("N11"), CodeCategory::Asset);
    }

    #[test]
    fn test_classify_industries() {
        assert_eq!(classify("C29"), CodeCategory::Industry);
        assert_eq!(classify("J62_J63"), CodeCategory::Industry);
        assert_eq!(classify("T"), CodeCategory::Industry);
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(""), CodeCategory::Unclassified);
    }

    #[test]
    fn test_single_letter_edge_cases() {
        assert_eq!(classify("B"), CodeCategory::Balancing);
        assert_eq!(classify("P"), CodeCategory::Expenditure);
        assert_eq!(classify("D"), CodeCategory::Industry);
        assert_eq!(classify("N"), CodeCategory::Industry);
    }
}
