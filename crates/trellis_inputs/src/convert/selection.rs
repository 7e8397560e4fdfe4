//! Selection-family conversion
//!
//! Native type: the selected cell value itself (single select) or an
//! ordered collection of values (many select). Many-select is inferred
//! from the bound type being a `List`; membership in the option set is a
//! validation concern, not a conversion one.

use trellis_core::{CellType, CellValue};

use super::default_value;

/// Whether a type can be an option value
pub fn supports_value(inner: &CellType) -> bool {
    !matches!(
        inner,
        CellType::List(_) | CellType::Range(_) | CellType::Files | CellType::Optional(_)
    )
}

/// Bound types the selection family edits
pub fn supports(inner: &CellType) -> bool {
    match inner {
        CellType::List(elem) => supports_value(elem),
        other => supports_value(other),
    }
}

/// Whether the bound type selects many values
pub fn is_many(inner: &CellType) -> bool {
    matches!(inner, CellType::List(_))
}

/// The option value type for a bound type (the element type for lists)
pub fn value_type(inner: &CellType) -> &CellType {
    match inner {
        CellType::List(elem) => elem,
        other => other,
    }
}

/// Cell value to native selected value; `None` = absent
pub fn to_native(value: &CellValue) -> Option<CellValue> {
    match value {
        CellValue::Absent => None,
        other => Some(other.clone()),
    }
}

/// Native selected value back to a cell value
pub fn from_native(inner: &CellType, nullable: bool, native: Option<CellValue>) -> CellValue {
    match native {
        Some(v) => v,
        None if nullable => CellValue::Absent,
        None => default_value(inner),
    }
}

/// Cell value to native selected collection; `None` = absent
pub fn to_native_many(value: &CellValue) -> Option<Vec<CellValue>> {
    match value {
        CellValue::List(items) => Some(items.clone()),
        _ => None,
    }
}

/// Native selected collection back to a list cell value
pub fn from_native_many(nullable: bool, native: Option<Vec<CellValue>>) -> CellValue {
    match native {
        Some(items) => CellValue::List(items),
        None if nullable => CellValue::Absent,
        None => CellValue::List(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{EnumShape, IntType};

    #[test]
    fn many_is_inferred_from_list_types() {
        let single = CellType::Enum(EnumShape::new("Fruit", ["Apple", "Banana"]));
        let many = CellType::List(Box::new(single.clone()));
        assert!(!is_many(&single));
        assert!(is_many(&many));
        assert!(supports(&single));
        assert!(supports(&many));
        assert_eq!(value_type(&many), &single);
    }

    #[test]
    fn structural_types_are_not_option_values() {
        assert!(!supports(&CellType::Files));
        assert!(!supports(&CellType::List(Box::new(CellType::List(
            Box::new(CellType::Text)
        )))));
        assert!(supports(&CellType::Int(IntType::I32)));
    }

    #[test]
    fn absent_substitutes_the_category_default() {
        let inner = CellType::Int(IntType::I32);
        assert_eq!(from_native(&inner, false, None), CellValue::Int(0));
        assert_eq!(from_native(&inner, true, None), CellValue::Absent);
        assert_eq!(from_native_many(false, None), CellValue::List(Vec::new()));
    }
}
