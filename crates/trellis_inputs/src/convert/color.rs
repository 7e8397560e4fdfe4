//! Color-family conversion
//!
//! Native type: `String` — a hex literal, an `rgb(...)`/`rgba(...)`
//! function, or a palette name. Bound types are free-form CSS text, plain
//! text, or the closed palette enumeration. Palette↔hex is a fixed
//! bidirectional table; the enumeration is closed, so totality of the
//! table is checked by the exhaustive match rather than at runtime.
//!
//! Text-bound cells map palette *names* to hex on the way out and store
//! the native string verbatim on the way back; the name is a documented
//! lossy boundary of the reverse direction. Palette-bound cells are the
//! one case where a native string may have no representation at all —
//! [`from_native`] returns `None` and the commit leaves the cell
//! untouched (the validator has already flagged the widget).

use trellis_core::{CellType, CellValue, ColorType, ColorValue, PaletteColor, Validity};

/// Bound types the color family edits
pub fn supports(inner: &CellType) -> bool {
    matches!(inner, CellType::Text | CellType::Color(_))
}

/// Fixed hex for each palette case
pub fn hex(color: PaletteColor) -> &'static str {
    match color {
        PaletteColor::Black => "#09090b",
        PaletteColor::White => "#fafafa",
        PaletteColor::Slate => "#64748b",
        PaletteColor::Gray => "#6b7280",
        PaletteColor::Zinc => "#71717a",
        PaletteColor::Neutral => "#737373",
        PaletteColor::Stone => "#78716c",
        PaletteColor::Red => "#dd5860",
        PaletteColor::Orange => "#f97316",
        PaletteColor::Amber => "#f59e0b",
        PaletteColor::Yellow => "#eab308",
        PaletteColor::Lime => "#84cc16",
        PaletteColor::Green => "#22c55e",
        PaletteColor::Emerald => "#10b981",
        PaletteColor::Teal => "#14b8a6",
        PaletteColor::Cyan => "#06b6d4",
        PaletteColor::Sky => "#0ea5e9",
        PaletteColor::Blue => "#3b82f6",
        PaletteColor::Indigo => "#6366f1",
        PaletteColor::Violet => "#8b5cf6",
        PaletteColor::Purple => "#a855f7",
        PaletteColor::Fuchsia => "#d946ef",
        PaletteColor::Pink => "#ec4899",
        PaletteColor::Rose => "#f43f5e",
    }
}

/// Reverse hex lookup (case-insensitive)
pub fn from_hex(s: &str) -> Option<PaletteColor> {
    PaletteColor::ALL
        .iter()
        .copied()
        .find(|c| hex(*c).eq_ignore_ascii_case(s))
}

/// Resolve a native string to a palette case: hex first, then exact name
pub fn resolve_palette(s: &str) -> Option<PaletteColor> {
    from_hex(s).or_else(|| PaletteColor::from_name(s))
}

/// Cell value to native color string; `None` = absent
pub fn to_native(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Color(ColorValue::Palette(p)) => Some(hex(*p).to_string()),
        CellValue::Color(ColorValue::Css(s)) => Some(s.clone()),
        CellValue::Text(s) => Some(
            PaletteColor::from_name(s)
                .map(|p| hex(p).to_string())
                .unwrap_or_else(|| s.clone()),
        ),
        _ => None,
    }
}

/// Native color string back to a cell value of the bound type
///
/// `None` means the native string has no representation in the bound type
/// (an unmapped palette string); the commit keeps the prior cell value.
pub fn from_native(inner: &CellType, nullable: bool, native: Option<&str>) -> Option<CellValue> {
    let s = match native {
        Some(s) => s,
        None if nullable => return Some(CellValue::Absent),
        None => {
            return Some(match inner {
                CellType::Color(ColorType::Palette) => {
                    CellValue::Color(ColorValue::Palette(PaletteColor::Black))
                }
                CellType::Color(ColorType::Css) => {
                    CellValue::Color(ColorValue::Css(String::new()))
                }
                _ => CellValue::Text(String::new()),
            })
        }
    };
    match inner {
        CellType::Color(ColorType::Palette) => {
            resolve_palette(s).map(|p| CellValue::Color(ColorValue::Palette(p)))
        }
        CellType::Color(ColorType::Css) => Some(CellValue::Color(ColorValue::Css(s.to_string()))),
        _ => Some(CellValue::Text(s.to_string())),
    }
}

/// Syntax check for a native color string
///
/// Palette-bound cells additionally require the string to resolve to a
/// palette case.
pub fn validate(inner: &CellType, native: &str) -> Validity {
    if native.is_empty() {
        return Validity::Pass;
    }
    if matches!(inner, CellType::Color(ColorType::Palette)) {
        return if resolve_palette(native).is_some() {
            Validity::Pass
        } else {
            Validity::fail(format!("`{native}` is not a palette color"))
        };
    }
    if is_hex_literal(native) || is_rgb_function(native) || PaletteColor::from_name(native).is_some()
    {
        Validity::Pass
    } else {
        Validity::fail(format!("`{native}` is not a recognized color"))
    }
}

fn is_hex_literal(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_rgb_function(s: &str) -> bool {
    let body = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));
    let Some(body) = body else {
        return false;
    };
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    matches!(parts.len(), 3 | 4) && parts.iter().all(|p| p.parse::<f64>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_maps_to_its_pinned_hex() {
        assert_eq!(hex(PaletteColor::Red), "#dd5860");
        assert_eq!(from_hex("#dd5860"), Some(PaletteColor::Red));
        assert_eq!(from_hex("#DD5860"), Some(PaletteColor::Red));
    }

    #[test]
    fn every_palette_case_has_a_distinct_hex() {
        for a in PaletteColor::ALL {
            for b in PaletteColor::ALL {
                if a != b {
                    assert_ne!(hex(*a), hex(*b), "{:?} and {:?} share a hex", a, b);
                }
            }
        }
    }

    #[test]
    fn text_cell_with_palette_name_presents_hex() {
        let native = to_native(&CellValue::Text("Red".into()));
        assert_eq!(native.as_deref(), Some("#dd5860"));
        // arbitrary text passes through
        let native = to_native(&CellValue::Text("#123456".into()));
        assert_eq!(native.as_deref(), Some("#123456"));
    }

    #[test]
    fn palette_cell_round_trips_through_hex() {
        let inner = CellType::Color(ColorType::Palette);
        let stored = from_native(&inner, false, Some("#dd5860")).unwrap();
        assert_eq!(stored, CellValue::Color(ColorValue::Palette(PaletteColor::Red)));
        assert_eq!(to_native(&stored).as_deref(), Some("#dd5860"));
        // names resolve too
        let stored = from_native(&inner, false, Some("Green")).unwrap();
        assert_eq!(stored, CellValue::Color(ColorValue::Palette(PaletteColor::Green)));
    }

    #[test]
    fn unmapped_palette_string_is_unrepresentable() {
        let inner = CellType::Color(ColorType::Palette);
        assert_eq!(from_native(&inner, false, Some("#bada55")), None);
        assert!(validate(&inner, "#bada55").is_fail());
    }

    #[test]
    fn css_syntax_validation() {
        let inner = CellType::Color(ColorType::Css);
        assert!(validate(&inner, "#fff").is_pass());
        assert!(validate(&inner, "#dd5860").is_pass());
        assert!(validate(&inner, "rgb(255, 0, 0)").is_pass());
        assert!(validate(&inner, "rgba(255, 0, 0, 0.5)").is_pass());
        assert!(validate(&inner, "Red").is_pass());
        assert!(validate(&inner, "#ggg").is_fail());
        assert!(validate(&inner, "rgb(1,2)").is_fail());
        assert!(validate(&inner, "not a color").is_fail());
    }
}
