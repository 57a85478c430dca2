use std::collections::VecDeque;

// Same ceilings browsers apply to span attributes
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// One cell as it appears in the markup, before span expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    pub colspan: usize,
    pub rowspan: usize,
}

impl RawCell {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            colspan: 1,
            rowspan: 1,
        }
    }

    pub fn spanning(text: impl Into<String>, colspan: usize, rowspan: usize) -> Self {
        Self {
            text: text.into(),
            colspan: colspan.clamp(1, MAX_COLSPAN),
            rowspan: rowspan.clamp(1, MAX_ROWSPAN),
        }
    }
}

/// Parses a `colspan`/`rowspan` attribute; anything unusable counts as 1.
pub fn parse_span(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
}

struct Carry {
    column: usize,
    text: String,
    rows_left: usize,
}

/// Expands colspan and rowspan into a grid of plain texts.
///
/// A colspan repeats the text across the spanned columns. A rowspan carries
/// the text down into the same column of the following rows, and appends
/// extra rows at the end if the span reaches past the last `<tr>`. Carried
/// cells keep their column, with empty text filling any gap to their left.
/// Rows are not padded on the right; callers square the grid off.
pub fn expand(rows: &[Vec<RawCell>]) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(rows.len());
    let mut pending: VecDeque<Carry> = VecDeque::new();

    for row in rows {
        let mut texts = Vec::new();
        let mut next = VecDeque::new();
        let mut column = 0;

        for cell in row {
            while pending.front().is_some_and(|c| c.column <= column) {
                if let Some(carry) = pending.pop_front() {
                    texts.push(carry.text.clone());
                    push_remaining(&mut next, carry);
                    column += 1;
                }
            }
            for _ in 0..cell.colspan {
                texts.push(cell.text.clone());
                if cell.rowspan > 1 {
                    next.push_back(Carry {
                        column,
                        text: cell.text.clone(),
                        rows_left: cell.rowspan - 1,
                    });
                }
                column += 1;
            }
        }

        // carried cells to the right of the last real cell
        for carry in pending.drain(..) {
            pad_to(&mut texts, carry.column);
            texts.push(carry.text.clone());
            push_remaining(&mut next, carry);
        }

        grid.push(texts);
        pending = next;
    }

    while !pending.is_empty() {
        let mut texts = Vec::new();
        let mut next = VecDeque::new();
        for carry in pending.drain(..) {
            pad_to(&mut texts, carry.column);
            texts.push(carry.text.clone());
            push_remaining(&mut next, carry);
        }
        grid.push(texts);
        pending = next;
    }

    grid
}

fn pad_to(texts: &mut Vec<String>, column: usize) {
    if texts.len() < column {
        texts.resize(column, String::new());
    }
}

fn push_remaining(next: &mut VecDeque<Carry>, carry: Carry) {
    if carry.rows_left > 1 {
        next.push_back(Carry {
            rows_left: carry.rows_left - 1,
            ..carry
        });
    }
}
