pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod types;

// Port traits and their adapters
pub mod app;
pub mod infra;

pub use error::{ChemtabError, Result};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{Cell, ColumnSubset, Table};
