//! Input kinds and their presentation variants
//!
//! [`InputKind`] is the closed enumeration the factory dispatches over.
//! Each kind ties a family of editing surfaces to the conversion table
//! that family uses; `supports` answers the question the factory asks
//! before any widget is constructed.

use trellis_core::CellType;

use crate::convert;

/// How a boolean input presents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoolVariant {
    #[default]
    Checkbox,
    Switch,
    Toggle,
}

/// How a numeric input presents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberVariant {
    /// Editable numeric field
    #[default]
    Field,
    /// Drag-to-adjust slider
    Slider,
}

/// How a text input presents, and which admission/validation rules apply
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextVariant {
    #[default]
    SingleLine,
    MultiLine,
    /// Masked display (passwords)
    Masked,
    Search,
    Email,
    Url,
    Tel,
}

impl TextVariant {
    /// Whether a character is admissible while typing
    pub fn allows_char(&self, c: char) -> bool {
        match self {
            TextVariant::SingleLine | TextVariant::MultiLine => c != '\u{0}',
            TextVariant::Masked | TextVariant::Search => true,
            TextVariant::Email => c.is_ascii_alphanumeric() || "@._-+".contains(c),
            TextVariant::Url => c.is_ascii() && !c.is_ascii_control(),
            TextVariant::Tel => c.is_ascii_digit() || "+-() ".contains(c),
        }
    }

    /// Should the presentation mask the value?
    pub fn is_masked(&self) -> bool {
        matches!(self, TextVariant::Masked)
    }
}

/// Which part of a date-time a date input edits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateTimeVariant {
    Date,
    Time,
    #[default]
    DateTime,
}

/// How a selection input presents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectVariant {
    #[default]
    Dropdown,
    Radio,
    ToggleGroup,
    List,
}

/// How a feedback input presents, and the scale it edits on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackVariant {
    #[default]
    Stars,
    Emoji,
    Thumbs,
}

impl FeedbackVariant {
    /// Top of the scale; the bottom is always zero
    pub fn max_score(&self) -> f64 {
        match self {
            FeedbackVariant::Stars | FeedbackVariant::Emoji => 5.0,
            FeedbackVariant::Thumbs => 1.0,
        }
    }
}

/// The closed set of input kinds the factory can construct
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Bool(BoolVariant),
    Number(NumberVariant),
    Text(TextVariant),
    DateTime(DateTimeVariant),
    DateRange,
    Color,
    Select(SelectVariant),
    File,
    Code,
    Feedback(FeedbackVariant),
    AsyncSelect,
}

impl InputKind {
    /// Kind name for diagnostics and wire props
    pub fn name(&self) -> &'static str {
        match self {
            InputKind::Bool(_) => "bool",
            InputKind::Number(_) => "number",
            InputKind::Text(_) => "text",
            InputKind::DateTime(_) => "datetime",
            InputKind::DateRange => "daterange",
            InputKind::Color => "color",
            InputKind::Select(_) => "select",
            InputKind::File => "file",
            InputKind::Code => "code",
            InputKind::Feedback(_) => "feedback",
            InputKind::AsyncSelect => "asyncselect",
        }
    }

    /// Whether this kind can edit cells of the given declared type
    ///
    /// `Optional` wrappers are transparent here: nullability changes the
    /// widget's flag, never the supported set.
    pub fn supports(&self, ty: &CellType) -> bool {
        let (inner, _) = ty.unwrap_optional();
        match self {
            InputKind::Bool(_) => convert::boolean::supports(inner),
            InputKind::Number(_) => convert::number::supports(inner),
            InputKind::Text(_) | InputKind::Code => convert::text::supports(inner),
            InputKind::DateTime(_) => convert::datetime::supports(inner),
            InputKind::DateRange => convert::datetime::range_supports(inner),
            InputKind::Color => convert::color::supports(inner),
            InputKind::Select(_) | InputKind::AsyncSelect => convert::selection::supports(inner),
            InputKind::File => matches!(inner, CellType::Files),
            InputKind::Feedback(_) => convert::boolean::supports(inner),
        }
    }
}
