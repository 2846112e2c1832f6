use glob::Pattern;
use std::collections::HashSet;

/// Null literals recognized by default in text cells.
pub const DEFAULT_NULLS: &[&str] = &["", "nan", "NaN", "None", "null", "NULL", "N/A", "n/a", "NA", "#N/A", "-"];

/// Criteria for filtering and selecting data from uploads.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Sheet name patterns for filtering which sheets to process.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Maximum number of sheets to read.
    pub sheet_limit: Option<usize>,

    /// Maximum number of rows to read per sheet, counted from its first non-empty row.
    pub rows_limit: Option<usize>,

    /// Text literals read as missing (after trimming).
    pub nulls: HashSet<String>,

    /// Convert error cells to missing values instead of failing.
    pub error_as_null: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            sheet_name_patterns: None,
            sheet_limit: None,
            rows_limit: None,
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
            error_as_null: true,
        }
    }
}

impl Criteria {
    /// Restricts reading to sheets matching any of the glob `patterns`.
    /// Invalid patterns are ignored.
    pub fn with_sheet_patterns(mut self, patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .collect::<Vec<_>>();
        self.sheet_name_patterns = Some(patterns);
        self
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(sheet_name)),
            None => true,
        }
    }

    /// Returns true once `count` sheets have been read and the limit is reached.
    pub(crate) fn sheet_limit_reached(&self, count: usize) -> bool {
        self.sheet_limit.map(|limit| count >= limit).unwrap_or(false)
    }

    /// Checks whether a text cell denotes a missing value.
    pub(crate) fn is_null(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty() || self.nulls.contains(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_sheet_without_patterns() {
        let criteria = Criteria::default();
        assert!(criteria.accept("Vendas"));
        assert!(criteria.error_as_null);
    }

    #[test]
    fn filters_sheets_by_glob() {
        let criteria = Criteria::default().with_sheet_patterns(&["Jan*", "Fev"]);
        assert!(criteria.accept("Janeiro"));
        assert!(criteria.accept("Fev"));
        assert!(!criteria.accept("Capa"));
    }

    #[test]
    fn recognizes_null_literals() {
        let criteria = Criteria::default();
        assert!(criteria.is_null("  "));
        assert!(criteria.is_null(" N/A "));
        assert!(criteria.is_null("-"));
        assert!(!criteria.is_null("0"));
    }
}
