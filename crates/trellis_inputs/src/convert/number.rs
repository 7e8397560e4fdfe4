//! Number-family conversion
//!
//! Native type: `f64`, carried with [`NumberMeta`] inferred from the bound
//! width (a `u8`-bound cell infers min 0 / max 255, step 1). Writes clamp
//! to the effective range; integral bound types truncate toward zero
//! before the write. Clamping is silent by contract — it logs at `debug!`
//! and never surfaces as an error.

use tracing::debug;
use trellis_core::{CellType, CellValue};

/// Editing metadata for a numeric binding
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberMeta {
    /// Minimum writable value (inclusive)
    pub min: f64,
    /// Maximum writable value (inclusive)
    pub max: f64,
    /// Step increment for the editing surface
    pub step: f64,
    /// Fixed decimal places, `None` = free precision
    pub decimals: Option<u8>,
}

impl NumberMeta {
    /// Narrow the range; requests wider than the inferred range are
    /// ignored so a caller can never unlock values the bound type cannot
    /// hold.
    pub fn narrowed(self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        Self {
            min: min.map_or(self.min, |m| m.max(self.min)),
            max: max.map_or(self.max, |m| m.min(self.max)),
            step: step.unwrap_or(self.step),
            decimals: self.decimals,
        }
    }
}

/// Bound types the number family edits
pub fn supports(inner: &CellType) -> bool {
    matches!(inner, CellType::Int(_) | CellType::Float(_))
}

/// Infer editing metadata from the bound type's natural range
pub fn meta(inner: &CellType) -> NumberMeta {
    match inner {
        CellType::Int(w) => NumberMeta {
            min: w.min_value() as f64,
            max: w.max_value() as f64,
            step: 1.0,
            decimals: Some(0),
        },
        CellType::Float(w) => NumberMeta {
            min: w.min_value(),
            max: w.max_value(),
            step: 0.1,
            decimals: None,
        },
        _ => NumberMeta {
            min: f64::MIN,
            max: f64::MAX,
            step: 1.0,
            decimals: None,
        },
    }
}

/// Cell value to native `f64`; `None` = absent
pub fn to_native(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        _ => None,
    }
}

/// Native `f64` back to a cell value of the bound type
///
/// Clamps to `meta`'s effective range, then to the bound width; integral
/// bound types truncate toward zero. Non-finite input is the caller's to
/// reject (the kind validator fails it and the commit skips the write).
pub fn from_native(
    inner: &CellType,
    nullable: bool,
    meta: &NumberMeta,
    native: Option<f64>,
) -> CellValue {
    let v = match native {
        Some(v) => v,
        None if nullable => return CellValue::Absent,
        None => 0.0,
    };
    let clamped = v.clamp(meta.min, meta.max);
    if clamped != v {
        debug!(raw = v, clamped, "numeric write clamped to bound range");
    }
    match inner {
        CellType::Int(w) => CellValue::Int(w.clamp(clamped.trunc() as i64)),
        CellType::Float(w) => CellValue::Float(w.clamp(clamped)),
        _ => CellValue::Float(clamped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{FloatType, IntType};

    #[test]
    fn byte_meta_infers_natural_range() {
        let m = meta(&CellType::Int(IntType::U8));
        assert_eq!(m.min, 0.0);
        assert_eq!(m.max, 255.0);
        assert_eq!(m.step, 1.0);
        assert_eq!(m.decimals, Some(0));
    }

    #[test]
    fn writes_clamp_to_bound_range() {
        let inner = CellType::Int(IntType::U8);
        let m = meta(&inner);
        assert_eq!(from_native(&inner, false, &m, Some(999.0)), CellValue::Int(255));
        assert_eq!(from_native(&inner, false, &m, Some(-5.0)), CellValue::Int(0));
    }

    #[test]
    fn integral_writes_truncate_toward_zero() {
        let inner = CellType::Int(IntType::I32);
        let m = meta(&inner);
        assert_eq!(from_native(&inner, false, &m, Some(3.9)), CellValue::Int(3));
        assert_eq!(from_native(&inner, false, &m, Some(-3.9)), CellValue::Int(-3));
    }

    #[test]
    fn narrowing_cannot_widen() {
        let m = meta(&CellType::Int(IntType::U8)).narrowed(Some(-10.0), Some(500.0), None);
        assert_eq!(m.min, 0.0);
        assert_eq!(m.max, 255.0);

        let m = meta(&CellType::Int(IntType::U8)).narrowed(Some(10.0), Some(100.0), Some(5.0));
        assert_eq!(m.min, 10.0);
        assert_eq!(m.max, 100.0);
        assert_eq!(m.step, 5.0);
    }

    #[test]
    fn absent_substitutes_zero_when_not_nullable() {
        let inner = CellType::Float(FloatType::F64);
        let m = meta(&inner);
        assert_eq!(from_native(&inner, false, &m, None), CellValue::Float(0.0));
        assert_eq!(from_native(&inner, true, &m, None), CellValue::Absent);
    }

    #[test]
    fn native_side_idempotence_for_in_range_values() {
        let inner = CellType::Int(IntType::I16);
        let m = meta(&inner);
        for x in [-32768.0, -7.0, 0.0, 42.0, 32767.0] {
            assert_eq!(to_native(&from_native(&inner, false, &m, Some(x))), Some(x));
        }
    }
}
