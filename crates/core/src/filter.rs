//! Read filters
//!
//! Filters decide which cells of a selected row are returned. Regex
//! patterns use full-match semantics, as the service does.

/// Cell filter applied on the server side of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// Keep every cell
    PassAll,
    /// Keep cells whose qualifier fully matches the pattern
    ColumnQualifierRegex(String),
    /// Keep cells whose family name fully matches the pattern
    FamilyNameRegex(String),
    /// Keep the newest `n` versions of each column
    CellsPerColumnLimit(u32),
    /// Apply each filter to the output of the previous one
    Chain(Vec<RowFilter>),
}

impl RowFilter {
    /// Keep cells of one column qualifier pattern
    pub fn column(pattern: impl Into<String>) -> Self {
        RowFilter::ColumnQualifierRegex(pattern.into())
    }

    /// Keep cells of exactly this column qualifier
    ///
    /// Regex metacharacters in `name` are escaped, so `hello+v1` matches only
    /// the qualifier `hello+v1`.
    pub fn exact_column(name: &str) -> Self {
        RowFilter::ColumnQualifierRegex(regex::escape(name))
    }

    /// Keep cells of one family name pattern
    pub fn family(pattern: impl Into<String>) -> Self {
        RowFilter::FamilyNameRegex(pattern.into())
    }

    /// Keep only the newest version of each column
    pub fn latest_only() -> Self {
        RowFilter::CellsPerColumnLimit(1)
    }

    /// Chain `self` with `next`
    pub fn then(self, next: RowFilter) -> Self {
        match self {
            RowFilter::Chain(mut filters) => {
                filters.push(next);
                RowFilter::Chain(filters)
            }
            RowFilter::PassAll => next,
            first => RowFilter::Chain(vec![first, next]),
        }
    }
}

impl Default for RowFilter {
    fn default() -> Self {
        RowFilter::PassAll
    }
}
