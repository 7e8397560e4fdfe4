//! Text-family conversion
//!
//! Identity on the value; only the presentation variant (single-line,
//! multi-line, masked, search, ...) differs between text widgets.

use trellis_core::{CellType, CellValue};

/// Bound types the text family edits
pub fn supports(inner: &CellType) -> bool {
    matches!(inner, CellType::Text)
}

/// Cell value to native `String`; `None` = absent
pub fn to_native(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(s) => Some(s.clone()),
        _ => None,
    }
}

/// Native `String` back to a cell value
pub fn from_native(nullable: bool, native: Option<String>) -> CellValue {
    match native {
        Some(s) => CellValue::Text(s),
        None if nullable => CellValue::Absent,
        None => CellValue::Text(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trip() {
        let v = from_native(false, Some("hello".into()));
        assert_eq!(to_native(&v).as_deref(), Some("hello"));
    }

    #[test]
    fn absent_substitutes_empty_string() {
        assert_eq!(from_native(false, None), CellValue::Text(String::new()));
        assert_eq!(from_native(true, None), CellValue::Absent);
    }
}
