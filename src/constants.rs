/// Page the glossary tables are scraped from.
pub const SOURCE_URL: &str = "https://en.wikipedia.org/wiki/Glossary_of_chemical_formulae";

/// Output file, relative to the working directory.
pub const OUTPUT_PATH: &str = "data.csv";

/// Optional config file picked up from the working directory.
pub const CONFIG_FILE: &str = "chemtab.toml";

// Wikipedia answers 403 to requests without a descriptive agent
pub const USER_AGENT: &str = concat!(
    "chemtab/",
    env!("CARGO_PKG_VERSION"),
    " (glossary of chemical formulae scraper)"
);

// Column names as they appear in the glossary headers
pub const FORMULA_COLUMN: &str = "Chemical formula";
pub const SYNONYMS_COLUMN: &str = "Synonyms";
pub const CAS_COLUMN: &str = "CAS number";

// Environment overrides
pub const ENV_URL: &str = "CHEMTAB_URL";
pub const ENV_OUTPUT: &str = "CHEMTAB_OUTPUT";

/// Number of suggestions printed for a query without an exact match.
pub const DEFAULT_LOOKUP_LIMIT: usize = 5;

/// Column subsets tried against every table, most preferred first.
pub fn default_candidates() -> Vec<crate::types::ColumnSubset> {
    use crate::types::ColumnSubset;
    vec![
        ColumnSubset::new([FORMULA_COLUMN, SYNONYMS_COLUMN, CAS_COLUMN]),
        ColumnSubset::new([FORMULA_COLUMN, SYNONYMS_COLUMN]),
    ]
}
