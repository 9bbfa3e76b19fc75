//! Parsing of whitespace-separated numeric rows.

use crate::error::{ParseError, TableError};

/// Splits `line` on whitespace and parses every token as `f64`.
///
/// An empty line yields an empty row.
///
/// # Errors
/// Returns [`ParseError::InvalidToken`] for the first token that is not a
/// floating-point number.
///
/// # Examples
/// ```
/// use feynman_core::parse_row;
///
/// assert_eq!(parse_row("1.0 2.5 -3.25")?, vec![1.0, 2.5, -3.25]);
/// assert!(parse_row("1.0 two").is_err());
/// # Ok::<(), feynman_core::ParseError>(())
/// ```
pub fn parse_row(line: &str) -> Result<Vec<f64>, ParseError> {
    line.split_whitespace()
        .enumerate()
        .map(|(column, token)| {
            token.parse::<f64>().map_err(|_| ParseError::InvalidToken {
                column,
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Parsed block of rows stored row-major.
///
/// The table is as wide as its widest row. Shorter rows, including empty
/// ones, are padded with `NaN`, which the CSV writer emits as empty fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumericTable {
    width: usize,
    rows: usize,
    values: Vec<f64>,
}

impl NumericTable {
    /// Parses `lines`, numbering rows from `first_row` in error reports.
    ///
    /// # Errors
    /// Returns [`TableError`] naming the absolute row that contains a
    /// non-numeric token.
    ///
    /// # Examples
    /// ```
    /// use feynman_core::NumericTable;
    ///
    /// let table = NumericTable::from_lines(["1 2 3", "4 5"], 0)?;
    /// assert_eq!(table.rows(), 2);
    /// assert_eq!(table.width(), 3);
    /// assert_eq!(table.row(0), Some(&[1.0, 2.0, 3.0][..]));
    /// let padded = table.row(1).and_then(|row| row.get(2));
    /// assert!(padded.is_some_and(|value| value.is_nan()));
    /// # Ok::<(), feynman_core::TableError>(())
    /// ```
    pub fn from_lines<I, S>(lines: I, first_row: usize) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = lines
            .into_iter()
            .enumerate()
            .map(|(offset, line)| {
                parse_row(line.as_ref()).map_err(|source| TableError {
                    row: first_row.saturating_add(offset),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(&parsed))
    }

    /// Builds a table from parsed rows, padding short rows with `NaN`.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut values = Vec::with_capacity(width.saturating_mul(rows.len()));
        for row in rows {
            values.extend_from_slice(row);
            values.resize(values.len() + (width - row.len()), f64::NAN);
        }
        Self {
            width,
            rows: rows.len(),
            values,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of values per row, or zero when every row is empty.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns whether the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the values of row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        let start = index.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.values.get(start..end)
    }

    /// Iterates over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).filter_map(|index| self.row(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0 2.5 -3.25", vec![1.0, 2.5, -3.25])]
    #[case("  4\t5e-3   6E2 ", vec![4.0, 0.005, 600.0])]
    #[case("+0.5 .25 7.", vec![0.5, 0.25, 7.0])]
    #[case("", vec![])]
    fn parse_row_accepts_numeric_tokens(#[case] line: &str, #[case] expected: Vec<f64>) {
        assert_eq!(parse_row(line).expect("row must parse"), expected);
    }

    #[rstest]
    fn parse_row_accepts_non_finite_tokens() {
        let values = parse_row("inf -inf NaN").expect("non-finite tokens parse");
        assert_eq!(values.first(), Some(&f64::INFINITY));
        assert_eq!(values.get(1), Some(&f64::NEG_INFINITY));
        assert!(values.get(2).is_some_and(|value| value.is_nan()));
    }

    #[rstest]
    #[case("1.0 abc 2.0", 1, "abc")]
    #[case("x", 0, "x")]
    #[case("1,5 2", 0, "1,5")]
    fn parse_row_reports_invalid_tokens(
        #[case] line: &str,
        #[case] column: usize,
        #[case] token: &str,
    ) {
        let err = parse_row(line).expect_err("invalid token must fail");
        assert_eq!(
            err,
            ParseError::InvalidToken {
                column,
                token: token.to_owned()
            }
        );
    }

    #[rstest]
    fn table_reports_absolute_rows() {
        let err = NumericTable::from_lines(["1 2", "3 oops"], 8_000)
            .expect_err("second row is invalid");
        assert_eq!(err.row, 8_001);
        assert!(matches!(err.source, ParseError::InvalidToken { column: 1, .. }));
    }

    #[rstest]
    fn short_rows_are_padded_with_nan() {
        let table = NumericTable::from_lines(["1 2 3", "4 5"], 0).expect("ragged rows parse");
        assert_eq!(table.rows(), 2);
        assert_eq!(table.width(), 3);
        let short = table.row(1).expect("second row exists");
        assert_eq!(short.get(..2), Some(&[4.0, 5.0][..]));
        assert!(short.get(2).is_some_and(|value| value.is_nan()));
    }

    #[rstest]
    fn later_wider_rows_widen_the_table() {
        let table = NumericTable::from_lines(["1", "2 3"], 0).expect("ragged rows parse");
        assert_eq!(table.width(), 2);
        let first = table.row(0).expect("first row exists");
        assert_eq!(first.first(), Some(&1.0));
        assert!(first.get(1).is_some_and(|value| value.is_nan()));
        assert_eq!(table.row(1), Some(&[2.0, 3.0][..]));
    }

    #[rstest]
    fn empty_rows_become_all_nan() {
        let table = NumericTable::from_lines(["1 2", "   "], 10).expect("empty row parses");
        assert_eq!(table.rows(), 2);
        let empty = table.row(1).expect("second row exists");
        assert_eq!(empty.len(), 2);
        assert!(empty.iter().all(|value| value.is_nan()));
    }

    #[rstest]
    fn all_empty_rows_keep_their_count() {
        let table = NumericTable::from_lines(["", ""], 0).expect("empty rows parse");
        assert_eq!(table.rows(), 2);
        assert_eq!(table.width(), 0);
        assert_eq!(table.iter_rows().count(), 2);
    }

    #[rstest]
    fn empty_input_gives_empty_table() {
        let table = NumericTable::from_lines(Vec::<String>::new(), 0).expect("empty input parses");
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert_eq!(table.iter_rows().count(), 0);
        assert_eq!(table.row(0), None);
    }

    #[rstest]
    fn iter_rows_preserves_order() {
        let table = NumericTable::from_lines(["1 2", "3 4"], 0).expect("rows parse");
        let rows: Vec<&[f64]> = table.iter_rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
        assert_eq!(table.row(2), None);
    }
}
