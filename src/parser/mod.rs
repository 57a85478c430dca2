//! HTML table extraction.
//!
//! Every `<table>` in the page becomes a [`Table`]: header rows give the
//! column names, spans are expanded, text is whitespace-normalized and
//! anything styled `display:none` is ignored.

pub mod span;

use crate::error::{ChemtabError, Result};
use crate::types::{to_cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use span::{expand, parse_span, RawCell};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

type Rows<'a> = Vec<ElementRef<'a>>;

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("static selector"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Extracts all tables from `markup`, in document order.
///
/// Fails only when the page holds no table with any visible text.
#[instrument(skip(markup), fields(markup_len = markup.len()))]
pub fn extract_tables(markup: &str) -> Result<Vec<Table>> {
    let document = Html::parse_document(markup);
    let mut tables = Vec::new();

    for (position, element) in document.select(&TABLE_SELECTOR).enumerate() {
        if is_hidden(element) || cell_text(element).is_empty() {
            debug!(position, "ignoring table without visible text");
            continue;
        }
        let table = parse_table(element)?;
        debug!(
            position,
            columns = ?table.columns(),
            rows = table.len(),
            "parsed table"
        );
        tables.push(table);
    }

    if tables.is_empty() {
        return Err(ChemtabError::Parse("No tables found".into()));
    }
    info!("Extracted {} tables", tables.len());
    Ok(tables)
}

fn parse_table(table: ElementRef<'_>) -> Result<Table> {
    let (mut head, mut body, foot) = table_sections(table);

    if head.is_empty() {
        while body.first().is_some_and(|row| is_header_row(*row)) {
            head.push(body.remove(0));
        }
    }

    let header_grid = expand(&raw_rows(&head));
    let mut body_grid = expand(&raw_rows(&body));
    body_grid.extend(expand(&raw_rows(&foot)));

    let width = header_grid
        .iter()
        .chain(body_grid.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let mut parsed = Table::new(column_names(&header_grid, width));
    for row in body_grid {
        let cells: Vec<_> = row.into_iter().map(to_cell).collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        parsed.push_row(cells)?;
    }
    Ok(parsed)
}

/// Splits a table's own rows into header, body and footer.
///
/// Only rows belonging to this table are collected; rows of nested tables
/// stay with those tables.
fn table_sections(table: ElementRef<'_>) -> (Rows<'_>, Rows<'_>, Rows<'_>) {
    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();

    for child in child_elements(table) {
        match child.value().name() {
            "thead" => head.extend(visible_rows(child)),
            "tbody" => body.extend(visible_rows(child)),
            "tfoot" => foot.extend(visible_rows(child)),
            "tr" if !is_hidden(child) => body.push(child),
            _ => {}
        }
    }
    (head, body, foot)
}

fn visible_rows(section: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    child_elements(section).filter(|el| el.value().name() == "tr" && !is_hidden(*el))
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

fn row_cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    child_elements(row)
        .filter(|el| matches!(el.value().name(), "td" | "th") && !is_hidden(*el))
}

fn is_header_row(row: ElementRef<'_>) -> bool {
    let mut cells = row_cells(row).peekable();
    cells.peek().is_some() && cells.all(|c| c.value().name() == "th")
}

fn raw_rows(rows: &[ElementRef<'_>]) -> Vec<Vec<RawCell>> {
    rows.iter()
        .map(|row| {
            row_cells(*row)
                .map(|cell| {
                    RawCell::spanning(
                        cell_text(cell),
                        parse_span(cell.value().attr("colspan")),
                        parse_span(cell.value().attr("rowspan")),
                    )
                })
                .collect()
        })
        .collect()
}

/// Column names from the expanded header rows.
///
/// A single header row is used as is. With several, each column joins its
/// distinct non-empty header texts with a space. Blank names become
/// `Unnamed: <index>`, columns without any header row are numbered, and
/// duplicates get `.1`, `.2`, ... suffixes.
fn column_names(header: &[Vec<String>], width: usize) -> Vec<String> {
    let names: Vec<String> = (0..width)
        .map(|col| {
            if header.is_empty() {
                return col.to_string();
            }
            let mut parts: Vec<&str> = Vec::new();
            for row in header {
                if let Some(text) = row.get(col).filter(|t| !t.is_empty()) {
                    if !parts.contains(&text.as_str()) {
                        parts.push(text.as_str());
                    }
                }
            }
            if parts.is_empty() {
                format!("Unnamed: {col}")
            } else {
                parts.join(" ")
            }
        })
        .collect();
    dedupe_names(names)
}

fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut suffix = 1;
            while seen.contains(&candidate) {
                candidate = format!("{name}.{suffix}");
                suffix += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Normalized visible text of an element.
fn cell_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    WHITESPACE.replace_all(&raw, " ").trim().to_string()
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if child_element.value().name() == "br" {
                out.push('\n');
            } else if !is_hidden(child_element) {
                push_text(child_element, out);
            }
        }
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    element.value().attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none")
    })
}
