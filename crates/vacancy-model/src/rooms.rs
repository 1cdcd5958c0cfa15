use crate::grid::RawRow;
use regex::Regex;
use std::sync::OnceLock;

/// Room identifiers on the reservation table look like "1st", "2nd", "10th":
/// one or two digits followed by an ordinal suffix.
fn room_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{1,2}(st|nd|rd|th)").expect("valid regex"))
}

/// Extract the room names from the LAST data row of a reservation table.
///
/// On this table layout the bottom row repeats the room labels; cells whose
/// text does not match the room-identifier pattern (time labels, notes) are
/// filtered out. Order is preserved and maps one-to-one onto the grid's
/// columns.
pub fn extract_rooms(last_data_row: &RawRow) -> Vec<String> {
    last_data_row
        .iter()
        .filter(|cell| room_pattern().is_match(&cell.text))
        .map(|cell| cell.text.clone())
        .collect()
}

/// Extract the time-slot labels from the table's `<th>` texts, one per data
/// row, order preserved.
pub fn extract_time_labels<S: AsRef<str>>(header_texts: &[S]) -> Vec<String> {
    header_texts
        .iter()
        .map(|t| t.as_ref().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RawCell;

    fn cell(text: &str) -> RawCell {
        RawCell::new(text, 1)
    }

    #[test]
    fn test_extract_rooms_filters_by_pattern() {
        let row = vec![
            cell("部屋"),
            cell("1st"),
            cell("2nd"),
            cell("3rd"),
            cell("10th"),
            cell("○"),
        ];
        assert_eq!(extract_rooms(&row), vec!["1st", "2nd", "3rd", "10th"]);
    }

    #[test]
    fn test_extract_rooms_rejects_non_identifiers() {
        let row = vec![cell("st"), cell("123rd"), cell("9:00"), cell("first")];
        assert!(extract_rooms(&row).is_empty());
    }

    #[test]
    fn test_extract_rooms_preserves_order() {
        let row = vec![cell("2nd"), cell("1st")];
        assert_eq!(extract_rooms(&row), vec!["2nd", "1st"]);
    }

    #[test]
    fn test_extract_time_labels() {
        let headers = ["9:00", "10:00", "11:00"];
        assert_eq!(
            extract_time_labels(&headers),
            vec!["9:00", "10:00", "11:00"]
        );
    }
}
