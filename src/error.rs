use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChemtabError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Row has {found} cells but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    #[error("None of the {tables} extracted tables matched a column subset; nothing to write")]
    NothingSelected { tables: usize },
}

pub type Result<T> = std::result::Result<T, ChemtabError>;
