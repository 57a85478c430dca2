//! Synonym lookup over a written formulae file.
//!
//! Exact synonyms answer directly; anything else gets the closest synonyms
//! by longest common subsequence.

use crate::constants::{CAS_COLUMN, FORMULA_COLUMN, SYNONYMS_COLUMN};
use crate::error::{ChemtabError, Result};
use crate::types::Table;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// One answer to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub synonym: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    entries: BTreeMap<String, String>,
}

impl LookupIndex {
    /// Indexes every row with a synonym. A later row with the same synonym
    /// replaces the earlier one.
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.column_index(SYNONYMS_COLUMN).is_none() {
            return Err(ChemtabError::MissingColumn(SYNONYMS_COLUMN.into()));
        }

        let mut index = Self::default();
        for row in 0..table.len() {
            let Some(synonym) = table.cell(row, SYNONYMS_COLUMN) else {
                continue;
            };
            let formula = table.cell(row, FORMULA_COLUMN).unwrap_or("");
            let description = match table.cell(row, CAS_COLUMN) {
                Some(cas) => format!("{formula}, CAS: {cas}"),
                None => formula.to_string(),
            };
            index.entries.insert(synonym.to_string(), description);
        }
        info!(entries = index.len(), "built lookup index");
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, synonym: &str) -> Option<&str> {
        self.entries.get(synonym).map(String::as_str)
    }

    /// Exact hit, or up to `limit` synonyms ranked by longest common
    /// subsequence with `input` (longest first). Ties go to the synonym whose
    /// length is closest to the input's, then alphabetical order.
    pub fn query(&self, input: &str, limit: usize) -> Vec<Match<'_>> {
        if let Some((synonym, description)) = self.entries.get_key_value(input) {
            return vec![Match {
                synonym: synonym.as_str(),
                description: description.as_str(),
            }];
        }

        let input_len = input.chars().count();
        let mut ranked: Vec<(usize, usize, &String, &String)> = self
            .entries
            .iter()
            .map(|(synonym, description)| {
                let lcs = longest_common_subsequence(input, synonym);
                let len_diff = input_len.abs_diff(synonym.chars().count());
                (lcs, len_diff, synonym, description)
            })
            .collect();
        // BTreeMap iteration is already alphabetical and the sort is stable
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        debug!(input, candidates = ranked.len(), "fuzzy lookup");
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, _, synonym, description)| Match {
                synonym: synonym.as_str(),
                description: description.as_str(),
            })
            .collect()
    }

    /// Prompts, then answers each input line until EOF.
    pub fn run_interactive<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
        limit: usize,
    ) -> Result<()> {
        writeln!(output, "Type your input:")?;
        output.flush()?;
        for line in input.lines() {
            let line = line?;
            let query = line.trim_end_matches('\r');
            for m in self.query(query, limit) {
                writeln!(output, " -> {} ({})", m.synonym, m.description)?;
            }
            output.flush()?;
        }
        Ok(())
    }
}

/// Length of the longest common subsequence of `a` and `b`, by characters.
pub fn longest_common_subsequence(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a.chars() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == *cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
