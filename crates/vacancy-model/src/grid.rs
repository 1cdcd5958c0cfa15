use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The glyph the booking site renders in a cell that is free for one slot.
pub const AVAILABLE_MARKER: &str = "○";

/// One `<td>` as it literally appears in a reservation table row.
///
/// `span` is the parsed `rowspan` attribute (1 when absent): the number of
/// consecutive time-slot rows this cell visually covers, i.e. the length of
/// one continuous reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    pub text: String,
    pub span: u32,
}

impl RawCell {
    pub fn new(text: impl Into<String>, span: u32) -> Self {
        Self {
            text: text.into(),
            span: span.max(1),
        }
    }

    /// Grid value for this cell: 0 when available, otherwise the number of
    /// slots the reservation occupies.
    fn value(&self) -> u32 {
        if self.text == AVAILABLE_MARKER {
            0
        } else {
            self.span.max(1)
        }
    }
}

/// Cells of one `<tr>`, left-to-right as present in the HTML — NOT yet
/// expanded for reservations carried over from earlier rows.
pub type RawRow = Vec<RawCell>;

/// Dense rectangular availability matrix, `[time slot][room]`.
///
/// `0` = available; `k >= 1` = occupied, with `k` the carried-over remainder
/// counting down as you move down the grid.
pub type ExpandedGrid = Vec<Vec<u32>>;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("table has {rows} data rows but {slots} time-slot labels")]
    RowCountMismatch { rows: usize, slots: usize },

    #[error("data row {row}: expected {expected} columns after carry-over, found {found}")]
    MalformedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("data row {row} is empty and no reservation carries over into it")]
    EmptyRow { row: usize },
}

/// Expand span-encoded raw rows into a dense rectangular grid.
///
/// `raw_rows` holds only the DATA rows of the table (the header row with the
/// room names is excluded), one per time slot. A cell with text [`AVAILABLE_MARKER`]
/// becomes `0`; any other cell becomes its rowspan count, and that count is
/// carried into the following rows — decremented by one per row, inserted at
/// the same column index — until it reaches 1. A row with no cells at all is
/// reconstructed entirely from the previous row's carry-over.
///
/// The first finished row establishes the column count (the room count);
/// every later row must finish at exactly that width or the table is
/// rejected. Column identity never drifts: a carried value always lands at
/// the index its reservation held in the row above.
pub fn reconstruct(raw_rows: &[RawRow], slot_count: usize) -> Result<ExpandedGrid, GridError> {
    if raw_rows.len() != slot_count {
        return Err(GridError::RowCountMismatch {
            rows: raw_rows.len(),
            slots: slot_count,
        });
    }

    let mut grid: ExpandedGrid = Vec::with_capacity(slot_count);
    let mut width = 0;

    for (idx, raw) in raw_rows.iter().enumerate() {
        let mut row: Vec<u32> = raw.iter().map(RawCell::value).collect();

        match grid.last() {
            Some(prev) => {
                if row.is_empty() {
                    // Fully carried over: every column is the previous value
                    // minus one, with spent columns staying at 0.
                    row = prev.iter().map(|v| v.saturating_sub(1)).collect();
                } else {
                    for (col, &pre) in prev.iter().enumerate() {
                        if pre > 1 {
                            if col > row.len() {
                                return Err(GridError::MalformedTable {
                                    row: idx,
                                    expected: width,
                                    found: row.len(),
                                });
                            }
                            row.insert(col, pre - 1);
                        }
                    }
                }
            }
            None => {
                if row.is_empty() {
                    return Err(GridError::EmptyRow { row: idx });
                }
                width = row.len();
            }
        }

        if row.len() != width {
            return Err(GridError::MalformedTable {
                row: idx,
                expected: width,
                found: row.len(),
            });
        }

        grid.push(row);
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avail() -> RawCell {
        RawCell::new(AVAILABLE_MARKER, 1)
    }

    fn booked(span: u32) -> RawCell {
        RawCell::new("✗", span)
    }

    #[test]
    fn test_single_row_values() {
        let rows = vec![vec![avail(), booked(1), booked(3)]];
        let grid = reconstruct(&rows, 1).unwrap();
        assert_eq!(grid, vec![vec![0, 1, 3]]);
    }

    #[test]
    fn test_span_carries_over_and_decrements() {
        // A 3-slot reservation in column 1, fresh "○" cells around it.
        let rows = vec![
            vec![avail(), booked(3)],
            vec![avail()],
            vec![avail()],
            vec![avail(), avail()],
        ];
        let grid = reconstruct(&rows, 4).unwrap();
        assert_eq!(grid, vec![vec![0, 3], vec![0, 2], vec![0, 1], vec![0, 0]]);
    }

    #[test]
    fn test_empty_rows_fully_reconstructed_from_carry_over() {
        // Scenario from the live site: once a long reservation covers the
        // whole remaining column, the tr elements under it have no td at all.
        let rows = vec![vec![avail(), booked(3)], vec![], vec![], vec![]];
        let grid = reconstruct(&rows, 4).unwrap();
        assert_eq!(grid, vec![vec![0, 3], vec![0, 2], vec![0, 1], vec![0, 0]]);
    }

    #[test]
    fn test_adjacent_spans_carry_independently() {
        let rows = vec![
            vec![booked(2), booked(4)],
            vec![],
            vec![avail()],
            vec![avail()],
        ];
        let grid = reconstruct(&rows, 4).unwrap();
        assert_eq!(grid, vec![vec![2, 4], vec![1, 3], vec![0, 2], vec![0, 1]]);
    }

    #[test]
    fn test_carry_over_inserts_at_original_column() {
        // Column 0 occupied for 2 slots; the second row's single fresh cell
        // belongs to column 1 and must be shifted right by the insertion.
        let rows = vec![vec![booked(2), avail()], vec![booked(1)]];
        let grid = reconstruct(&rows, 2).unwrap();
        assert_eq!(grid, vec![vec![2, 0], vec![1, 1]]);
    }

    #[test]
    fn test_span_of_one_never_carries() {
        let rows = vec![vec![booked(1), avail()], vec![avail(), avail()]];
        let grid = reconstruct(&rows, 2).unwrap();
        assert_eq!(grid, vec![vec![1, 0], vec![0, 0]]);
    }

    #[test]
    fn test_rectangularity() {
        let rows = vec![
            vec![avail(), booked(2), avail()],
            vec![avail(), avail()],
            vec![booked(2), avail(), avail()],
            vec![avail(), avail()],
        ];
        let grid = reconstruct(&rows, 4).unwrap();
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_row_count_mismatch() {
        let rows = vec![vec![avail()]];
        let err = reconstruct(&rows, 3).unwrap_err();
        assert!(matches!(
            err,
            GridError::RowCountMismatch { rows: 1, slots: 3 }
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        // Second row has no carry-over to explain its missing cell.
        let rows = vec![vec![avail(), avail()], vec![avail()]];
        let err = reconstruct(&rows, 2).unwrap_err();
        assert!(matches!(
            err,
            GridError::MalformedTable {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_wide_row_is_malformed() {
        let rows = vec![vec![avail(), avail()], vec![avail(), avail(), avail()]];
        let err = reconstruct(&rows, 2).unwrap_err();
        assert!(matches!(
            err,
            GridError::MalformedTable {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_carry_over_insertion_cannot_overflow() {
        // Carried column 4 would have to be inserted past the end of a row
        // that only reconstructed 2 columns.
        let rows = vec![
            vec![booked(2), avail(), avail(), avail(), booked(2)],
            vec![avail()],
        ];
        let err = reconstruct(&rows, 2).unwrap_err();
        assert!(matches!(err, GridError::MalformedTable { row: 1, .. }));
    }

    #[test]
    fn test_empty_first_row_rejected() {
        let rows: Vec<RawRow> = vec![vec![], vec![avail()]];
        let err = reconstruct(&rows, 2).unwrap_err();
        assert!(matches!(err, GridError::EmptyRow { row: 0 }));
    }

    #[test]
    fn test_deterministic() {
        let rows = vec![
            vec![booked(2), booked(4)],
            vec![],
            vec![avail()],
            vec![avail()],
        ];
        let a = reconstruct(&rows, 4).unwrap();
        let b = reconstruct(&rows, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_span_defaults_to_at_least_one() {
        let cell = RawCell::new("✗", 0);
        assert_eq!(cell.span, 1);
    }
}
