//! Reference tables: human-readable labels for FIGARO codes
//!
//! Static lookup tables for country names, NACE/CPA sector names and
//! ESA 2010 transaction codes, used when rendering tables and dashboard
//! JSON. Lookups never fail; an unknown code is returned as-is.

/// Country code to English name.
static COUNTRY_NAMES: &[(&str, &str)] = &[
    ("DE", "Germany"),
    ("FR", "France"),
    ("IT", "Italy"),
    ("ES", "Spain"),
    ("AT", "Austria"),
    ("PL", "Poland"),
    ("GR", "Greece"),
    ("NL", "Netherlands"),
    ("BE", "Belgium"),
    ("PT", "Portugal"),
    ("CZ", "Czechia"),
    ("HU", "Hungary"),
    ("SE", "Sweden"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
    ("IE", "Ireland"),
    ("SK", "Slovakia"),
    ("BG", "Bulgaria"),
    ("HR", "Croatia"),
    ("SI", "Slovenia"),
    ("LT", "Lithuania"),
    ("LV", "Latvia"),
    ("EE", "Estonia"),
    ("LU", "Luxembourg"),
    ("CY", "Cyprus"),
    ("MT", "Malta"),
    ("RO", "Romania"),
    ("GB", "United Kingdom"),
    ("CH", "Switzerland"),
    ("NO", "Norway"),
    ("US", "USA"),
    ("CN", "China"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("IN", "India"),
    ("BR", "Brazil"),
    ("RU", "Russia"),
    ("TR", "Turkey"),
    ("AU", "Australia"),
    ("CA", "Canada"),
    ("MX", "Mexico"),
    ("WRL_REST", "Rest of World"),
];

/// NACE/CPA sector code to English name. Keys use the hyphenated form
/// without the `CPA_` prefix.
static SECTOR_NAMES: &[(&str, &str)] = &[
    ("A01", "Agriculture"),
    ("A02", "Forestry"),
    ("A03", "Fishing"),
    ("B", "Mining"),
    ("C10-C12", "Food products"),
    ("C13-C15", "Textiles"),
    ("C16", "Wood products"),
    ("C17", "Paper"),
    ("C18", "Printing"),
    ("C19", "Coke and petroleum"),
    ("C20", "Chemicals"),
    ("C21", "Pharmaceuticals"),
    ("C22", "Rubber and plastics"),
    ("C23", "Glass, ceramics, building materials"),
    ("C24", "Basic metals"),
    ("C25", "Fabricated metals"),
    ("C26", "Computer, electronics, optics"),
    ("C27", "Electrical equipment"),
    ("C28", "Machinery"),
    ("C29", "Motor vehicles"),
    ("C30", "Other transport equipment"),
    ("C31-C32", "Furniture, other manufacturing"),
    ("C33", "Repair of machinery"),
    ("D35", "Energy supply"),
    ("E36", "Water supply"),
    ("E37-E39", "Sewerage, waste, recycling"),
    ("F", "Construction"),
    ("G45", "Motor vehicle trade and repair"),
    ("G46", "Wholesale trade"),
    ("G47", "Retail trade"),
    ("H49", "Land transport"),
    ("H50", "Water transport"),
    ("H51", "Air transport"),
    ("H52", "Warehousing, transport services"),
    ("H53", "Postal and courier services"),
    ("I", "Accommodation and food services"),
    ("J58", "Publishing"),
    ("J59-J60", "Film, TV, broadcasting"),
    ("J61", "Telecommunications"),
    ("J62-J63", "IT services"),
    ("K64", "Financial services"),
    ("K65", "Insurance"),
    ("K66", "Financial and insurance auxiliaries"),
    ("L", "Real estate"),
    ("M69-M70", "Legal, accounting, consulting"),
    ("M71", "Architecture and engineering"),
    ("M72", "Research and development"),
    ("M73", "Advertising and market research"),
    ("M74-M75", "Other professional services"),
    ("N77", "Rental and leasing"),
    ("N78", "Employment services"),
    ("N79", "Travel agencies"),
    ("N80-N82", "Security, building services"),
    ("O84", "Public administration"),
    ("P85", "Education"),
    ("Q86", "Health care"),
    ("Q87-Q88", "Residential care, social work"),
    ("R90-R92", "Arts, entertainment"),
    ("R93", "Sports and recreation"),
    ("S94", "Membership organizations"),
    ("S95", "Repair of consumer goods"),
    ("S96", "Other personal services"),
    ("T", "Households as employers"),
];

/// ESA 2010 transaction and final-use codes.
static CODE_LABELS: &[(&str, &str)] = &[
    ("D11", "Wages and salaries"),
    ("D12", "Employer social contributions"),
    ("D21X31", "Taxes minus subsidies on products"),
    ("D29X39", "Other taxes minus subsidies on production"),
    ("B2", "Operating surplus"),
    ("B3", "Mixed income"),
    ("P3_S13", "Government consumption"),
    ("P3_S14", "Household consumption"),
    ("P3_S15", "NPISH consumption"),
    ("P51G", "Gross fixed capital formation"),
    ("P6", "Exports"),
    ("P7", "Imports"),
];

/// Named product groups used by the trade composition breakdown.
pub static PRODUCT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Agriculture", &["CPA_A01", "CPA_A02", "CPA_A03"]),
    ("Mining", &["CPA_B"]),
    ("Food & Beverages", &["CPA_C10-C12"]),
    ("Textiles", &["CPA_C13-C15"]),
    ("Chemicals", &["CPA_C20", "CPA_C21"]),
    ("Machinery", &["CPA_C28"]),
    ("Vehicles", &["CPA_C29", "CPA_C30"]),
    ("Electronics", &["CPA_C26", "CPA_C27"]),
    (
        "Services",
        &[
            "CPA_G", "CPA_H", "CPA_I", "CPA_J", "CPA_K", "CPA_L", "CPA_M", "CPA_N",
        ],
    ),
];

/// Product group for a CPA code, by longest-prefix match against
/// [`PRODUCT_CATEGORIES`], with manufacturing and generic fallbacks.
pub fn product_category(code: &str) -> &'static str {
    for (category, prefixes) in PRODUCT_CATEGORIES {
        if prefixes.iter().any(|p| code.starts_with(p)) {
            return category;
        }
    }
    if code.starts_with("CPA_C") {
        "Manufacturing (Other)"
    } else if code.starts_with("CPA_") {
        "Other Products"
    } else {
        "Non-Product"
    }
}

/// English name for a country code; the code itself when unknown.
pub fn country_name(code: &str) -> &str {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// English label for a NACE/CPA sector code.
///
/// Tries a direct match first, then the code with its `CPA_` prefix
/// stripped and underscores converted to hyphens. Unknown codes are
/// returned as-is.
pub fn sector_name(code: &str) -> String {
    if let Some((_, name)) = SECTOR_NAMES.iter().find(|(c, _)| *c == code) {
        return (*name).to_string();
    }
    let clean = code.replace("CPA_", "").replace('_', "-");
    if let Some((_, name)) = SECTOR_NAMES.iter().find(|(c, _)| *c == clean) {
        return (*name).to_string();
    }
    code.to_string()
}

/// English label for an ESA 2010 code; the code itself when unknown.
pub fn code_label(code: &str) -> &str {
    CODE_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// All label tables, for the dashboard metadata file.
pub fn label_tables() -> (
    &'static [(&'static str, &'static str)],
    &'static [(&'static str, &'static str)],
    &'static [(&'static str, &'static str)],
) {
    (CODE_LABELS, COUNTRY_NAMES, SECTOR_NAMES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_name_known() {
        assert_eq!(country_name("DE"), "Germany");
        assert_eq!(country_name("WRL_REST"), "Rest of World");
    }

    #[test]
    fn test_country_name_unknown_passthrough() {
        assert_eq!(country_name("XX"), "XX");
    }

    #[test]
    fn test_sector_name_direct() {
        assert_eq!(sector_name("C29"), "Motor vehicles");
    }

    #[test]
    fn test_sector_name_cpa_prefix() {
        assert_eq!(sector_name("CPA_C29"), "Motor vehicles");
        assert_eq!(sector_name("CPA_C10_C12"), "Food products");
    }

    #[test]
    fn test_sector_name_unknown_passthrough() {
        assert_eq!(sector_name("ZZZ"), "ZZZ");
    }

    #[test]
    fn test_code_label() {
        assert_eq!(code_label("D11"), "Wages and salaries");
        assert_eq!(code_label("P3_S14"), "Household consumption");
        assert_eq!(code_label("UNKNOWN"), "UNKNOWN");
    }

    #[test]
    fn test_product_category_fallbacks() {
        assert_eq!(product_category("CPA_C29"), "Vehicles");
        assert_eq!(product_category("CPA_C16"), "Manufacturing (Other)");
        assert_eq!(product_category("CPA_D35"), "Other Products");
        assert_eq!(product_category("D11"), "Non-Product");
    }

    #[test]
    fn test_product_categories_cover_services() {
        let services = PRODUCT_CATEGORIES
            .iter()
            .find(|(name, _)| *name == "Services")
            .unwrap();
        assert!(services.1.contains(&"CPA_J"));
    }
}
