//! Closed value model for bindable state
//!
//! Every value a state cell can hold is a case of [`CellValue`], and every
//! declarable cell type is a case of [`CellType`]. Keeping both as closed
//! sums (instead of reflective `Any` boxes) means narrowing a type-erased
//! cell is a pattern match, and an input kind's supported-type check is an
//! exhaustive match the compiler can verify.
//!
//! Integer cells store their payload as `i64` and float cells as `f64`;
//! the declared [`IntType`]/[`FloatType`] width only constrains the range a
//! conversion may write back, not the stored representation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Type tags
// ─────────────────────────────────────────────────────────────────────────────

/// Integer width of a numeric cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntType {
    /// Smallest value representable by this width
    pub fn min_value(&self) -> i64 {
        match self {
            IntType::I8 => i8::MIN as i64,
            IntType::I16 => i16::MIN as i64,
            IntType::I32 => i32::MIN as i64,
            IntType::I64 => i64::MIN,
            IntType::U8 | IntType::U16 | IntType::U32 | IntType::U64 => 0,
        }
    }

    /// Largest value representable by this width
    ///
    /// `U64` saturates at `i64::MAX`: the stored representation is `i64`.
    pub fn max_value(&self) -> i64 {
        match self {
            IntType::I8 => i8::MAX as i64,
            IntType::I16 => i16::MAX as i64,
            IntType::I32 => i32::MAX as i64,
            IntType::I64 => i64::MAX,
            IntType::U8 => u8::MAX as i64,
            IntType::U16 => u16::MAX as i64,
            IntType::U32 => u32::MAX as i64,
            IntType::U64 => i64::MAX,
        }
    }

    /// Clamp a raw value into this width's range
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min_value(), self.max_value())
    }
}

/// Float width of a numeric cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatType {
    F32,
    F64,
}

impl FloatType {
    pub fn min_value(&self) -> f64 {
        match self {
            FloatType::F32 => f32::MIN as f64,
            FloatType::F64 => f64::MIN,
        }
    }

    pub fn max_value(&self) -> f64 {
        match self {
            FloatType::F32 => f32::MAX as f64,
            FloatType::F64 => f64::MAX,
        }
    }

    /// Clamp a raw value into this width's range, rounding through the
    /// narrower representation for `F32`
    pub fn clamp(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min_value(), self.max_value());
        match self {
            FloatType::F32 => clamped as f32 as f64,
            FloatType::F64 => clamped,
        }
    }
}

/// Which date/time shape a date cell holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateType {
    /// Calendar date, no time of day
    Date,
    /// Time of day, no date
    Time,
    /// Date and time without an offset
    DateTime,
    /// Date and time pinned to UTC
    DateTimeUtc,
}

/// How a color cell represents its value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorType {
    /// Free-form CSS color text (hex, `rgb(...)`, or a palette name)
    Css,
    /// A case of the closed [`PaletteColor`] enumeration
    Palette,
}

/// Runtime type tag for a state cell
///
/// The tag reported by a cell never changes after creation. `Optional`
/// wraps exactly one non-optional inner type; it is the only type that
/// admits [`CellValue::Absent`].
#[derive(Clone, Debug, PartialEq)]
pub enum CellType {
    Bool,
    Int(IntType),
    Float(FloatType),
    Text,
    Date(DateType),
    Color(ColorType),
    Enum(EnumShape),
    List(Box<CellType>),
    Range(Box<CellType>),
    Files,
    Optional(Box<CellType>),
}

impl CellType {
    /// Strip an `Optional` wrapper, returning the inner type and whether a
    /// wrapper was present
    pub fn unwrap_optional(&self) -> (&CellType, bool) {
        match self {
            CellType::Optional(inner) => (inner, true),
            other => (other, false),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, CellType::Optional(_))
    }

    /// Whether a value is admissible for a cell of this type
    ///
    /// Width is not checked here: an `Int(U8)` cell admits any `Int` value.
    /// Keeping out-of-range payloads is the conversion layer's job, which
    /// clamps before writing.
    pub fn admits(&self, value: &CellValue) -> bool {
        match (self, value) {
            (CellType::Optional(_), CellValue::Absent) => true,
            (CellType::Optional(inner), v) => inner.admits(v),
            (CellType::Bool, CellValue::Bool(_)) => true,
            (CellType::Int(_), CellValue::Int(_)) => true,
            (CellType::Float(_), CellValue::Float(_)) => true,
            (CellType::Text, CellValue::Text(_)) => true,
            (CellType::Date(dt), CellValue::Date(dv)) => dv.date_type() == *dt,
            (CellType::Color(ColorType::Css), CellValue::Color(ColorValue::Css(_))) => true,
            (CellType::Color(ColorType::Palette), CellValue::Color(ColorValue::Palette(_))) => true,
            (CellType::Enum(shape), CellValue::Enum { shape: vs, index }) => {
                shape == vs && *index < shape.len()
            }
            (CellType::List(elem), CellValue::List(items)) => {
                items.iter().all(|item| elem.admits(item))
            }
            (CellType::Range(elem), CellValue::Range { start, end }) => {
                elem.admits(start) && elem.admits(end)
            }
            (CellType::Files, CellValue::Files(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellType::Bool => write!(f, "bool"),
            CellType::Int(w) => write!(f, "int({:?})", w),
            CellType::Float(w) => write!(f, "float({:?})", w),
            CellType::Text => write!(f, "text"),
            CellType::Date(d) => write!(f, "date({:?})", d),
            CellType::Color(c) => write!(f, "color({:?})", c),
            CellType::Enum(shape) => write!(f, "enum({})", shape.name()),
            CellType::List(elem) => write!(f, "list<{}>", elem),
            CellType::Range(elem) => write!(f, "range<{}>", elem),
            CellType::Files => write!(f, "files"),
            CellType::Optional(inner) => write!(f, "optional<{}>", inner),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enum shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct EnumShapeInner {
    name: String,
    cases: Vec<String>,
}

/// Declaration-ordered case-name descriptor for an enumeration cell
///
/// Shapes are cheap to clone (shared behind an `Arc`) and compare by
/// content, so two independently constructed shapes with the same name and
/// cases describe the same enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumShape(Arc<EnumShapeInner>);

impl EnumShape {
    pub fn new<S: Into<String>>(name: impl Into<String>, cases: impl IntoIterator<Item = S>) -> Self {
        EnumShape(Arc::new(EnumShapeInner {
            name: name.into(),
            cases: cases.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn len(&self) -> usize {
        self.0.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.cases.is_empty()
    }

    /// Case name at `index`, in declaration order
    pub fn case(&self, index: usize) -> Option<&str> {
        self.0.cases.get(index).map(String::as_str)
    }

    /// Declaration-order index of a case name
    pub fn index_of(&self, case: &str) -> Option<usize> {
        self.0.cases.iter().position(|c| c == case)
    }

    pub fn cases(&self) -> impl Iterator<Item = &str> {
        self.0.cases.iter().map(String::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload cases
// ─────────────────────────────────────────────────────────────────────────────

/// Date/time payload of a date cell
#[derive(Clone, Debug, PartialEq)]
pub enum DateValue {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeUtc(DateTime<Utc>),
}

impl DateValue {
    pub fn date_type(&self) -> DateType {
        match self {
            DateValue::Date(_) => DateType::Date,
            DateValue::Time(_) => DateType::Time,
            DateValue::DateTime(_) => DateType::DateTime,
            DateValue::DateTimeUtc(_) => DateType::DateTimeUtc,
        }
    }
}

/// Color payload of a color cell
#[derive(Clone, Debug, PartialEq)]
pub enum ColorValue {
    Css(String),
    Palette(PaletteColor),
}

/// Closed palette of named colors
///
/// The palette is part of the value model; the hex mapping each case
/// carries lives in the color conversion table. Declaration order here is
/// the order selection widgets present the palette in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteColor {
    Black,
    White,
    Slate,
    Gray,
    Zinc,
    Neutral,
    Stone,
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

impl PaletteColor {
    /// All palette cases in declaration order
    pub const ALL: &'static [PaletteColor] = &[
        PaletteColor::Black,
        PaletteColor::White,
        PaletteColor::Slate,
        PaletteColor::Gray,
        PaletteColor::Zinc,
        PaletteColor::Neutral,
        PaletteColor::Stone,
        PaletteColor::Red,
        PaletteColor::Orange,
        PaletteColor::Amber,
        PaletteColor::Yellow,
        PaletteColor::Lime,
        PaletteColor::Green,
        PaletteColor::Emerald,
        PaletteColor::Teal,
        PaletteColor::Cyan,
        PaletteColor::Sky,
        PaletteColor::Blue,
        PaletteColor::Indigo,
        PaletteColor::Violet,
        PaletteColor::Purple,
        PaletteColor::Fuchsia,
        PaletteColor::Pink,
        PaletteColor::Rose,
    ];

    /// Case name, matching the declaration identifier
    pub fn name(&self) -> &'static str {
        match self {
            PaletteColor::Black => "Black",
            PaletteColor::White => "White",
            PaletteColor::Slate => "Slate",
            PaletteColor::Gray => "Gray",
            PaletteColor::Zinc => "Zinc",
            PaletteColor::Neutral => "Neutral",
            PaletteColor::Stone => "Stone",
            PaletteColor::Red => "Red",
            PaletteColor::Orange => "Orange",
            PaletteColor::Amber => "Amber",
            PaletteColor::Yellow => "Yellow",
            PaletteColor::Lime => "Lime",
            PaletteColor::Green => "Green",
            PaletteColor::Emerald => "Emerald",
            PaletteColor::Teal => "Teal",
            PaletteColor::Cyan => "Cyan",
            PaletteColor::Sky => "Sky",
            PaletteColor::Blue => "Blue",
            PaletteColor::Indigo => "Indigo",
            PaletteColor::Violet => "Violet",
            PaletteColor::Purple => "Purple",
            PaletteColor::Fuchsia => "Fuchsia",
            PaletteColor::Pink => "Pink",
            PaletteColor::Rose => "Rose",
        }
    }

    /// Look a case up by name (exact match)
    pub fn from_name(name: &str) -> Option<PaletteColor> {
        PaletteColor::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// Metadata for one selected file
///
/// Only metadata crosses the binding boundary; byte transport is the
/// upload layer's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// File name as reported by the picker
    pub name: String,
    /// Declared MIME type, if the picker supplied one
    pub mime: Option<String>,
    /// Declared size in bytes, if known
    pub size: Option<u64>,
}

impl FileMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            size: None,
        }
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Lower-cased extension (without the dot), if the name has one
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Values
// ─────────────────────────────────────────────────────────────────────────────

/// A value held by a state cell
///
/// `Absent` is the null of the model and is only admitted by `Optional`
/// cells. Integer payloads are widened to `i64` and floats to `f64`; the
/// cell's declared width constrains what conversions write, not what the
/// case can carry.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(DateValue),
    Color(ColorValue),
    Enum { shape: EnumShape, index: usize },
    List(Vec<CellValue>),
    Range {
        start: Box<CellValue>,
        end: Box<CellValue>,
    },
    Files(Vec<FileMeta>),
    Absent,
}

impl CellValue {
    /// Short case name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            CellValue::Bool(_) => "bool",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Text(_) => "text",
            CellValue::Date(_) => "date",
            CellValue::Color(_) => "color",
            CellValue::Enum { .. } => "enum",
            CellValue::List(_) => "list",
            CellValue::Range { .. } => "range",
            CellValue::Files(_) => "files",
            CellValue::Absent => "absent",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Build a range value from its endpoints
    pub fn range(start: CellValue, end: CellValue) -> CellValue {
        CellValue::Range {
            start: Box::new(start),
            end: Box::new(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widths_clamp_to_their_range() {
        assert_eq!(IntType::U8.clamp(999), 255);
        assert_eq!(IntType::U8.clamp(-5), 0);
        assert_eq!(IntType::I16.clamp(40_000), i16::MAX as i64);
        assert_eq!(IntType::I64.clamp(i64::MIN), i64::MIN);
    }

    #[test]
    fn float_f32_clamp_rounds_through_f32() {
        let v = FloatType::F32.clamp(1.000000059604644775390625);
        assert_eq!(v, v as f32 as f64);
        assert_eq!(FloatType::F64.clamp(f64::MAX), f64::MAX);
    }

    #[test]
    fn optional_admits_absent_and_inner() {
        let ty = CellType::Optional(Box::new(CellType::Bool));
        assert!(ty.admits(&CellValue::Absent));
        assert!(ty.admits(&CellValue::Bool(true)));
        assert!(!ty.admits(&CellValue::Int(1)));
        assert!(!CellType::Bool.admits(&CellValue::Absent));
    }

    #[test]
    fn enum_admission_requires_matching_shape() {
        let fruit = EnumShape::new("Fruit", ["Apple", "Banana"]);
        let color = EnumShape::new("Color", ["Red", "Green"]);
        let ty = CellType::Enum(fruit.clone());
        assert!(ty.admits(&CellValue::Enum {
            shape: fruit.clone(),
            index: 1
        }));
        assert!(!ty.admits(&CellValue::Enum {
            shape: color,
            index: 0
        }));
        assert!(!ty.admits(&CellValue::Enum {
            shape: fruit,
            index: 2
        }));
    }

    #[test]
    fn list_admission_checks_every_element() {
        let ty = CellType::List(Box::new(CellType::Int(IntType::I32)));
        assert!(ty.admits(&CellValue::List(vec![CellValue::Int(1), CellValue::Int(2)])));
        assert!(!ty.admits(&CellValue::List(vec![
            CellValue::Int(1),
            CellValue::Text("x".into())
        ])));
    }

    #[test]
    fn palette_declaration_order_is_stable() {
        assert_eq!(PaletteColor::ALL.len(), 24);
        assert_eq!(PaletteColor::from_name("Red"), Some(PaletteColor::Red));
        assert_eq!(PaletteColor::from_name("red"), None);
        let red_idx = PaletteColor::ALL
            .iter()
            .position(|c| *c == PaletteColor::Red)
            .unwrap();
        assert_eq!(PaletteColor::ALL[red_idx].name(), "Red");
    }

    #[test]
    fn file_meta_extension() {
        assert_eq!(FileMeta::new("photo.PNG").extension().as_deref(), Some("png"));
        assert_eq!(FileMeta::new("archive.tar.gz").extension().as_deref(), Some("gz"));
        assert_eq!(FileMeta::new("README").extension(), None);
        assert_eq!(FileMeta::new(".bashrc").extension(), None);
    }
}
