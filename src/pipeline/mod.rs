// Fetch -> extract -> select -> combine -> write

pub mod combine;
pub mod select;

pub use combine::combine;
pub use select::{select_columns, Selection};

use crate::app::ports::PageSource;
use crate::config::Config;
use crate::constants::default_candidates;
use crate::error::{ChemtabError, Result};
use crate::infra::ReqwestPageSource;
use crate::parser::extract_tables;
use crate::storage::CsvStorage;
use crate::types::{ColumnSubset, Table};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Result of a complete pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub tables_found: usize,
    pub tables_kept: usize,
    pub tables_skipped: usize,
    pub rows_written: usize,
    pub output_file: PathBuf,
    pub sha256: String,
}

pub struct Pipeline {
    candidates: Vec<ColumnSubset>,
    storage: CsvStorage,
}

impl Pipeline {
    pub fn new(candidates: Vec<ColumnSubset>, storage: CsvStorage) -> Self {
        Self {
            candidates,
            storage,
        }
    }

    /// Default candidates, writing where `config` says.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = CsvStorage::new(
            config.output.path.clone(),
            config.output.delimiter_byte()?,
        );
        Ok(Self::new(default_candidates(), storage))
    }

    /// Fetches the configured URL over HTTP and runs the pipeline on it.
    pub fn run(config: &Config) -> Result<PipelineResult> {
        let source = ReqwestPageSource::new(&config.source)?;
        Self::from_config(config)?.run_with_source(&source)
    }

    #[instrument(skip(self, source), fields(source = source.location()))]
    pub fn run_with_source(&self, source: &dyn PageSource) -> Result<PipelineResult> {
        let markup = source.fetch()?;
        self.run_on_markup(&markup)
    }

    /// Everything after the fetch.
    pub fn run_on_markup(&self, markup: &str) -> Result<PipelineResult> {
        let tables = extract_tables(markup)?;
        let tables_found = tables.len();

        let kept = self.select_all(&tables);
        let tables_kept = kept.len();
        info!(
            tables_found,
            tables_kept,
            tables_skipped = tables_found - tables_kept,
            "selected column subsets"
        );
        if kept.is_empty() {
            return Err(ChemtabError::NothingSelected {
                tables: tables_found,
            });
        }

        let combined = combine(kept);
        println!("Writing to {}", self.storage.path().display());
        let summary = self.storage.write(&combined)?;

        Ok(PipelineResult {
            tables_found,
            tables_kept,
            tables_skipped: tables_found - tables_kept,
            rows_written: summary.rows,
            output_file: summary.path,
            sha256: summary.sha256,
        })
    }

    /// Selected subsets of the tables that matched a candidate, in order.
    pub fn select_all(&self, tables: &[Table]) -> Vec<Table> {
        tables
            .iter()
            .filter_map(|t| select_columns(t, &self.candidates).into_table())
            .collect()
    }
}
