//! Boolean-family conversion
//!
//! Native type: `bool`. Numeric bound types convert truthily (`value != 0`
//! forward, `1`/`0` backward); boolean bound types convert directly.
//! Absence through a nullable binding stays absent in both directions.

use trellis_core::{CellType, CellValue};

/// Bound types the boolean family edits
pub fn supports(inner: &CellType) -> bool {
    matches!(
        inner,
        CellType::Bool | CellType::Int(_) | CellType::Float(_)
    )
}

/// Cell value to native `bool`; `None` = absent
pub fn to_native(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Int(i) => Some(*i != 0),
        CellValue::Float(f) => Some(*f != 0.0),
        _ => None,
    }
}

/// Native `bool` back to a cell value of the bound type
///
/// `inner` must satisfy [`supports`]; the factory guarantees this before
/// any commit runs.
pub fn from_native(inner: &CellType, nullable: bool, native: Option<bool>) -> CellValue {
    let b = match native {
        Some(b) => b,
        None if nullable => return CellValue::Absent,
        None => false,
    };
    match inner {
        CellType::Int(_) => CellValue::Int(if b { 1 } else { 0 }),
        CellType::Float(_) => CellValue::Float(if b { 1.0 } else { 0.0 }),
        _ => CellValue::Bool(b),
    }
}
