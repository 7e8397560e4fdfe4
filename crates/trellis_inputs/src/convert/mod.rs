//! Per-kind conversion tables
//!
//! Each module maps between one family's native editing type and the cell
//! types that family supports, as an explicit total match over the bound
//! categories. The shared shape per family:
//!
//! - `supports(inner)` — the family's supported-type set (the factory's
//!   precondition; `inner` is always stripped of `Optional`)
//! - `to_native(..)` — cell value to native value; `None` means absent
//! - `from_native(..)` — native value back to a cell value, substituting
//!   the documented default when a non-nullable binding receives absent
//!
//! Table law: `to_native(from_native(x)) == x` for every native `x`
//! reachable through the editing surface. The reverse direction is allowed
//! to lose information only at the documented boundaries (absence
//! substitution, range clamping, unparsable text).

pub mod boolean;
pub mod color;
pub mod datetime;
pub mod number;
pub mod selection;
pub mod text;

use chrono::Utc;
use trellis_core::{
    CellType, CellValue, ColorType, ColorValue, DateType, DateValue, PaletteColor,
};

/// The documented default a non-nullable binding substitutes for an absent
/// write: false for booleans, zero for numbers, "now" for date/time, the
/// empty string for text, and the neutral case for the remaining
/// categories.
pub fn default_value(inner: &CellType) -> CellValue {
    match inner {
        CellType::Bool => CellValue::Bool(false),
        CellType::Int(_) => CellValue::Int(0),
        CellType::Float(_) => CellValue::Float(0.0),
        CellType::Text => CellValue::Text(String::new()),
        CellType::Date(dt) => CellValue::Date(now_value(*dt)),
        CellType::Color(ColorType::Css) => CellValue::Color(ColorValue::Css(String::new())),
        CellType::Color(ColorType::Palette) => {
            CellValue::Color(ColorValue::Palette(PaletteColor::Black))
        }
        CellType::Enum(shape) => CellValue::Enum {
            shape: shape.clone(),
            index: 0,
        },
        CellType::List(_) => CellValue::List(Vec::new()),
        CellType::Range(elem) => CellValue::range(default_value(elem), default_value(elem)),
        CellType::Files => CellValue::Files(Vec::new()),
        CellType::Optional(_) => CellValue::Absent,
    }
}

/// "Now" in the shape a date cell expects
pub fn now_value(kind: DateType) -> DateValue {
    let now = Utc::now();
    match kind {
        DateType::Date => DateValue::Date(now.date_naive()),
        DateType::Time => DateValue::Time(now.time()),
        DateType::DateTime => DateValue::DateTime(now.naive_utc()),
        DateType::DateTimeUtc => DateValue::DateTimeUtc(now),
    }
}
