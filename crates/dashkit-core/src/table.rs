#![forbid(unsafe_code)]

//! Client-side table filter and sort helpers.
//!
//! These operate on row data (one `Vec<String>` per row) rather than on any
//! rendered table: filtering yields a visibility mask the page applies to its
//! rows, sorting reorders the rows in place. Matching is case-insensitive
//! substring search across all cells; sorting compares numerically when both
//! cells parse as numbers and lexicographically otherwise.

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Whether a row matches a search term (case-insensitive, any cell).
///
/// An empty or whitespace-only term matches everything.
#[must_use]
pub fn row_matches(row: &[String], term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    row.iter().any(|cell| cell.to_lowercase().contains(&term))
}

/// Visibility mask for `rows` under a search term.
#[must_use]
pub fn filter_rows(rows: &[Vec<String>], term: &str) -> Vec<bool> {
    rows.iter().map(|row| row_matches(row, term)).collect()
}

/// Sort rows in place by one column.
///
/// The column sorts numerically when every non-empty cell in it parses as a
/// number, lexicographically otherwise; deciding per column rather than per
/// pair keeps the comparison a total order. Cells missing in a row sort as
/// the empty string (numerically: before everything). The sort is stable, so
/// equal keys keep their relative order across repeated sorts.
pub fn sort_rows(rows: &mut [Vec<String>], column: usize, direction: SortDirection) {
    let numeric = rows.iter().all(|row| {
        let cell = row.get(column).map_or("", String::as_str).trim();
        cell.is_empty() || cell.parse::<f64>().is_ok()
    });

    rows.sort_by(|a, b| {
        let a_val = a.get(column).map_or("", String::as_str).trim();
        let b_val = b.get(column).map_or("", String::as_str).trim();
        let ordering = if numeric {
            numeric_key(a_val).total_cmp(&numeric_key(b_val))
        } else {
            a_val.cmp(b_val)
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn numeric_key(cell: &str) -> f64 {
    cell.parse::<f64>().unwrap_or(f64::NEG_INFINITY)
}
