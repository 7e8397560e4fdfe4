//! Bridge between Rust types and the closed value model
//!
//! [`CellBind`] is what makes `typed::<T>()` a checked narrowing instead of
//! a reflective downcast: a type declares which [`CellType`] it binds to
//! and how it moves in and out of [`CellValue`]. Implementations exist for
//! the primitive categories; enumeration types implement it by hand
//! against an [`EnumShape`](crate::value::EnumShape):
//!
//! ```ignore
//! static SHAPE: OnceLock<EnumShape> = OnceLock::new();
//!
//! fn shape() -> EnumShape {
//!     SHAPE.get_or_init(|| EnumShape::new("Fruit", ["Apple", "Banana"])).clone()
//! }
//!
//! impl CellBind for Fruit {
//!     fn cell_type() -> CellType {
//!         CellType::Enum(shape())
//!     }
//!     // into_value / from_value map the case to its declaration index
//! }
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::value::{
    CellType, CellValue, ColorType, ColorValue, DateType, DateValue, FileMeta, FloatType, IntType,
    PaletteColor,
};

/// A Rust type that binds to exactly one cell type
pub trait CellBind: Sized + Send + 'static {
    /// The cell type this Rust type binds to
    fn cell_type() -> CellType;

    /// Move a value into the closed model
    fn into_value(self) -> CellValue;

    /// Read a value back out of the closed model
    ///
    /// Returns `None` when the payload case does not match; a cell whose
    /// declared type equals `cell_type()` always yields `Some`.
    fn from_value(value: &CellValue) -> Option<Self>;
}

impl CellBind for bool {
    fn cell_type() -> CellType {
        CellType::Bool
    }
    fn into_value(self) -> CellValue {
        CellValue::Bool(self)
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

macro_rules! impl_cell_bind_int {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(
            impl CellBind for $ty {
                fn cell_type() -> CellType {
                    CellType::Int(IntType::$width)
                }
                fn into_value(self) -> CellValue {
                    CellValue::Int(self as i64)
                }
                fn from_value(value: &CellValue) -> Option<Self> {
                    match value {
                        CellValue::Int(i) => <$ty>::try_from(*i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_cell_bind_int! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
}

// u64 is stored as i64; values above i64::MAX saturate on the way in.
impl CellBind for u64 {
    fn cell_type() -> CellType {
        CellType::Int(IntType::U64)
    }
    fn into_value(self) -> CellValue {
        CellValue::Int(self.min(i64::MAX as u64) as i64)
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl CellBind for f32 {
    fn cell_type() -> CellType {
        CellType::Float(FloatType::F32)
    }
    fn into_value(self) -> CellValue {
        CellValue::Float(self as f64)
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => Some(*f as f32),
            _ => None,
        }
    }
}

impl CellBind for f64 {
    fn cell_type() -> CellType {
        CellType::Float(FloatType::F64)
    }
    fn into_value(self) -> CellValue {
        CellValue::Float(self)
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl CellBind for String {
    fn cell_type() -> CellType {
        CellType::Text
    }
    fn into_value(self) -> CellValue {
        CellValue::Text(self)
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Free-form CSS color text bound to a `Color(Css)` cell
///
/// Distinct from `String` so a color cell and a text cell are different
/// declared types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CssColor(pub String);

impl CssColor {
    pub fn new(color: impl Into<String>) -> Self {
        CssColor(color.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CellBind for CssColor {
    fn cell_type() -> CellType {
        CellType::Color(ColorType::Css)
    }
    fn into_value(self) -> CellValue {
        CellValue::Color(ColorValue::Css(self.0))
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Color(ColorValue::Css(s)) => Some(CssColor(s.clone())),
            _ => None,
        }
    }
}

impl CellBind for PaletteColor {
    fn cell_type() -> CellType {
        CellType::Color(ColorType::Palette)
    }
    fn into_value(self) -> CellValue {
        CellValue::Color(ColorValue::Palette(self))
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Color(ColorValue::Palette(p)) => Some(*p),
            _ => None,
        }
    }
}

macro_rules! impl_cell_bind_date {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl CellBind for $ty {
                fn cell_type() -> CellType {
                    CellType::Date(DateType::$kind)
                }
                fn into_value(self) -> CellValue {
                    CellValue::Date(DateValue::$kind(self))
                }
                fn from_value(value: &CellValue) -> Option<Self> {
                    match value {
                        CellValue::Date(DateValue::$kind(v)) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_cell_bind_date! {
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeUtc,
}

impl CellBind for Vec<FileMeta> {
    fn cell_type() -> CellType {
        CellType::Files
    }
    fn into_value(self) -> CellValue {
        CellValue::Files(self)
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Files(files) => Some(files.clone()),
            _ => None,
        }
    }
}

impl<T: CellBind> CellBind for Option<T> {
    fn cell_type() -> CellType {
        CellType::Optional(Box::new(T::cell_type()))
    }
    fn into_value(self) -> CellValue {
        match self {
            Some(v) => v.into_value(),
            None => CellValue::Absent,
        }
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Absent => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: CellBind> CellBind for Vec<T> {
    fn cell_type() -> CellType {
        CellType::List(Box::new(T::cell_type()))
    }
    fn into_value(self) -> CellValue {
        CellValue::List(self.into_iter().map(CellBind::into_value).collect())
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: CellBind> CellBind for (T, T) {
    fn cell_type() -> CellType {
        CellType::Range(Box::new(T::cell_type()))
    }
    fn into_value(self) -> CellValue {
        CellValue::range(self.0.into_value(), self.1.into_value())
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Range { start, end } => {
                Some((T::from_value(start)?, T::from_value(end)?))
            }
            _ => None,
        }
    }
}
