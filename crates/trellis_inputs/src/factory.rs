//! Input factory
//!
//! The one entry point that goes from a type-erased cell and a requested
//! kind to a constructed input, without the caller naming a family type.
//! Dispatch is an exhaustive match over the closed kind enumeration —
//! where the bound type is only known at runtime, the single failure mode
//! is [`BindError::UnsupportedBinding`].

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph};

use crate::convert::selection;
use crate::inputs::{
    async_select_input, bool_input, code_input, color_input, daterange_input, datetime_input,
    feedback_input, file_input, number_input, select_input, text_input, AsyncSelectInput, BoolInput,
    CodeInput, ColorInput, DateRangeInput, DateTimeInput, FeedbackInput, FileInput, LookupFn,
    MultiSelectInput, NumberInput, QueryFn, SelectInput, TextInput,
};
use crate::kind::InputKind;
use crate::options::OptionSet;

/// Kind-specific construction options for [`create_input`]
///
/// Everything is optional; families ignore fields that do not concern
/// them, the way the per-family builders would.
#[derive(Default)]
pub struct KindOptions {
    /// Explicit option set for selection kinds
    pub options: Option<OptionSet>,
    /// Accept patterns for file kinds
    pub accept: Vec<String>,
    /// File count limit for file kinds
    pub max_files: Option<usize>,
    /// Language tag for code kinds
    pub language: Option<String>,
    /// Query source for the async selection kind
    pub query: Option<QueryFn>,
    /// Display lookup source for the async selection kind
    pub lookup: Option<LookupFn>,
}

/// A constructed input of any family
pub enum AnyInput {
    Bool(BoolInput),
    Number(NumberInput),
    Text(TextInput),
    DateTime(DateTimeInput),
    DateRange(DateRangeInput),
    Color(ColorInput),
    Select(SelectInput),
    MultiSelect(MultiSelectInput),
    File(FileInput),
    Code(CodeInput),
    Feedback(FeedbackInput),
    AsyncSelect(AsyncSelectInput),
}

impl std::fmt::Debug for AnyInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AnyInput").field(&self.kind_name()).finish()
    }
}

impl AnyInput {
    /// Family name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnyInput::Bool(_) => "bool",
            AnyInput::Number(_) => "number",
            AnyInput::Text(_) => "text",
            AnyInput::DateTime(_) => "datetime",
            AnyInput::DateRange(_) => "daterange",
            AnyInput::Color(_) => "color",
            AnyInput::Select(_) | AnyInput::MultiSelect(_) => "select",
            AnyInput::File(_) => "file",
            AnyInput::Code(_) => "code",
            AnyInput::Feedback(_) => "feedback",
            AnyInput::AsyncSelect(_) => "asyncselect",
        }
    }

    /// The widget's invalid message, across families
    pub fn invalid(&self) -> Option<&str> {
        match self {
            AnyInput::Bool(i) => i.widget().invalid.as_deref(),
            AnyInput::Number(i) => i.widget().invalid.as_deref(),
            AnyInput::Text(i) => i.widget().invalid.as_deref(),
            AnyInput::DateTime(i) => i.widget().invalid.as_deref(),
            AnyInput::DateRange(i) => i.widget().invalid.as_deref(),
            AnyInput::Color(i) => i.widget().invalid.as_deref(),
            AnyInput::Select(i) => i.widget().invalid.as_deref(),
            AnyInput::MultiSelect(i) => i.widget().invalid.as_deref(),
            AnyInput::File(i) => i.widget().invalid.as_deref(),
            AnyInput::Code(i) => i.widget().invalid.as_deref(),
            AnyInput::Feedback(i) => i.widget().invalid.as_deref(),
            AnyInput::AsyncSelect(i) => i.widget().invalid.as_deref(),
        }
    }
}

/// Construct an input for a cell
///
/// Reads the cell's declared type, checks it against the kind's supported
/// set, and dispatches to the family constructor. A `Select` kind over a
/// list-bound cell yields the many-select shape. The async kind requires
/// a query source in `options`.
pub fn create_input(
    graph: &SharedCellGraph,
    cell: &AnyCell,
    kind: InputKind,
    options: KindOptions,
) -> Result<AnyInput> {
    let ty = cell.cell_type();
    if !kind.supports(ty) {
        return Err(BindError::UnsupportedBinding {
            kind: kind.name(),
            ty: ty.clone(),
        });
    }
    match kind {
        InputKind::Bool(variant) => bool_input(cell)
            .variant(variant)
            .build(graph)
            .map(AnyInput::Bool),
        InputKind::Number(variant) => number_input(cell)
            .variant(variant)
            .build(graph)
            .map(AnyInput::Number),
        InputKind::Text(variant) => text_input(cell)
            .variant(variant)
            .build(graph)
            .map(AnyInput::Text),
        InputKind::DateTime(variant) => datetime_input(cell)
            .variant(variant)
            .build(graph)
            .map(AnyInput::DateTime),
        InputKind::DateRange => daterange_input(cell).build(graph).map(AnyInput::DateRange),
        InputKind::Color => color_input(cell).build(graph).map(AnyInput::Color),
        InputKind::Select(variant) => {
            let mut builder = select_input(cell).variant(variant);
            if let Some(set) = options.options {
                builder = builder.options(set);
            }
            if selection::is_many(ty.unwrap_optional().0) {
                builder.build_many(graph).map(AnyInput::MultiSelect)
            } else {
                builder.build(graph).map(AnyInput::Select)
            }
        }
        InputKind::File => {
            let mut builder = file_input(cell);
            for pattern in options.accept {
                builder = builder.accept(pattern);
            }
            if let Some(max) = options.max_files {
                builder = builder.max_files(max);
            }
            builder.build(graph).map(AnyInput::File)
        }
        InputKind::Code => {
            let mut builder = code_input(cell);
            if let Some(language) = options.language {
                builder = builder.language(language);
            }
            builder.build(graph).map(AnyInput::Code)
        }
        InputKind::Feedback(variant) => feedback_input(cell)
            .variant(variant)
            .build(graph)
            .map(AnyInput::Feedback),
        InputKind::AsyncSelect => {
            let query = options.query.ok_or(BindError::UnsupportedBinding {
                kind: "asyncselect",
                ty: ty.clone(),
            })?;
            let mut builder = async_select_input(cell, query);
            if let Some(lookup) = options.lookup {
                builder = builder.lookup(lookup);
            }
            builder.build(graph).map(AnyInput::AsyncSelect)
        }
    }
}
