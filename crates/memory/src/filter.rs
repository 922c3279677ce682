//! Evaluation of [`RowFilter`] against stored cells

use hellotable_core::{Cell, Error, Result, RowFilter};
use regex::Regex;

/// A filter with its patterns compiled once per read
pub enum CompiledFilter {
    PassAll,
    Qualifier(Regex),
    Family(Regex),
    Limit(usize),
    Chain(Vec<CompiledFilter>),
}

/// Compile a pattern with full-match semantics
fn full_match(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| Error::InvalidArgument(format!("bad filter regex {:?}: {}", pattern, e)))
}

impl CompiledFilter {
    pub fn compile(filter: Option<&RowFilter>) -> Result<Self> {
        let Some(filter) = filter else {
            return Ok(CompiledFilter::PassAll);
        };
        Ok(match filter {
            RowFilter::PassAll => CompiledFilter::PassAll,
            RowFilter::ColumnQualifierRegex(p) => CompiledFilter::Qualifier(full_match(p)?),
            RowFilter::FamilyNameRegex(p) => CompiledFilter::Family(full_match(p)?),
            RowFilter::CellsPerColumnLimit(n) => CompiledFilter::Limit(*n as usize),
            RowFilter::Chain(filters) => CompiledFilter::Chain(
                filters
                    .iter()
                    .map(|f| Self::compile(Some(f)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Filter one row's cells, which must be in canonical order
    pub fn apply(&self, cells: Vec<Cell>) -> Vec<Cell> {
        match self {
            CompiledFilter::PassAll => cells,
            CompiledFilter::Qualifier(re) => {
                cells.into_iter().filter(|c| re.is_match(&c.qualifier)).collect()
            }
            CompiledFilter::Family(re) => {
                cells.into_iter().filter(|c| re.is_match(&c.family)).collect()
            }
            CompiledFilter::Limit(n) => {
                let mut kept: Vec<Cell> = Vec::with_capacity(cells.len());
                let mut seen = 0usize;
                for cell in cells {
                    let same_column = kept
                        .last()
                        .map(|p| p.family == cell.family && p.qualifier == cell.qualifier)
                        .unwrap_or(false);
                    seen = if same_column { seen + 1 } else { 1 };
                    if seen <= *n {
                        kept.push(cell);
                    }
                }
                kept
            }
            CompiledFilter::Chain(filters) => {
                filters.iter().fold(cells, |cells, f| f.apply(cells))
            }
        }
    }
}
