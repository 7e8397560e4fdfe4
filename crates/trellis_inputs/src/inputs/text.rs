//! Text input binding
//!
//! Identity conversion against text cells; the variant selects the
//! presentation (single-line, multi-line, masked, search) and, for the
//! address-like variants, the admission and validation rules.

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph, Validity};

use crate::convert::text;
use crate::kind::{InputKind, TextVariant};
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// Variant-specific syntax check
pub fn validate_variant(variant: TextVariant, value: &str) -> Validity {
    if value.is_empty() {
        return Validity::Pass;
    }
    match variant {
        TextVariant::Email => {
            let parts: Vec<&str> = value.split('@').collect();
            if parts.len() == 2 && !parts[0].is_empty() && parts[1].contains('.') {
                Validity::Pass
            } else {
                Validity::fail("not a valid email address")
            }
        }
        TextVariant::Url => {
            if value.starts_with("http://") || value.starts_with("https://") {
                Validity::Pass
            } else {
                Validity::fail("not a valid URL")
            }
        }
        _ => Validity::Pass,
    }
}

/// A bound text input
pub struct TextInput {
    widget: InputWidget<String>,
    variant: TextVariant,
    max_length: Option<usize>,
    required: bool,
    binding: CellBinding,
    validator: Option<ValidatorFn<String>>,
}

impl TextInput {
    pub fn widget(&self) -> &InputWidget<String> {
        &self.widget
    }

    pub fn variant(&self) -> TextVariant {
        self.variant
    }

    fn kind_validity(&self, raw: Option<&String>) -> Validity {
        let value = raw.map(String::as_str).unwrap_or("");
        if self.required && value.is_empty() {
            return Validity::fail("required");
        }
        if let Some(max) = self.max_length {
            if value.chars().count() > max {
                return Validity::fail(format!("longer than {max} characters"));
            }
        }
        validate_variant(self.variant, value)
    }

    /// Commit a raw edit from the presentation layer
    pub fn commit(&mut self, raw: Option<String>) {
        if self.widget.disabled {
            return;
        }
        let kind = self.kind_validity(raw.as_ref());
        let binding = &self.binding;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| pipeline::chain(kind, validator, raw),
            |raw| {
                binding.write(text::from_native(binding.nullable(), raw));
                text::to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = text::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> TextProps {
        TextProps {
            kind: "text",
            variant: match self.variant {
                TextVariant::SingleLine => "singleline",
                TextVariant::MultiLine => "multiline",
                TextVariant::Masked => "masked",
                TextVariant::Search => "search",
                TextVariant::Email => "email",
                TextVariant::Url => "url",
                TextVariant::Tel => "tel",
            },
            value: self.widget.value.clone(),
            masked: self.variant.is_masked(),
            max_length: self.max_length,
            required: self.required,
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
            placeholder: self.widget.placeholder.clone(),
        }
    }
}

/// Wire shape of a text input
#[derive(Clone, Debug, Serialize)]
pub struct TextProps {
    pub kind: &'static str,
    pub variant: &'static str,
    pub value: Option<String>,
    pub masked: bool,
    pub max_length: Option<usize>,
    pub required: bool,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
}

/// Builder for [`TextInput`]
pub struct TextInputBuilder {
    cell: AnyCell,
    variant: TextVariant,
    max_length: Option<usize>,
    required: bool,
    disabled: bool,
    label: Option<String>,
    description: Option<String>,
    placeholder: Option<String>,
    on_change: Option<ChangeHandler<String>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<String>>,
}

/// Bind a text input to a cell
pub fn text_input(cell: &AnyCell) -> TextInputBuilder {
    TextInputBuilder {
        cell: cell.clone(),
        variant: TextVariant::default(),
        max_length: None,
        required: false,
        disabled: false,
        label: None,
        description: None,
        placeholder: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl TextInputBuilder {
    pub fn variant(mut self, variant: TextVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn multi_line(self) -> Self {
        self.variant(TextVariant::MultiLine)
    }

    /// Masked display (passwords)
    pub fn masked(self) -> Self {
        self.variant(TextVariant::Masked)
    }

    pub fn search(self) -> Self {
        self.variant(TextVariant::Search)
    }

    pub fn email(self) -> Self {
        self.variant(TextVariant::Email)
    }

    pub fn url(self) -> Self {
        self.variant(TextVariant::Url)
    }

    pub fn tel(self) -> Self {
        self.variant(TextVariant::Tel)
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Fail validation on empty commits
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&InputWidget<String>) + Send + Sync + 'static,
    {
        self.on_change = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn on_blur<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_blur = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(Option<&String>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<TextInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Text(self.variant).supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "text",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = text::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.description = self.description;
        widget.placeholder = self.placeholder;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "text", variant = ?self.variant, "input bound");
        Ok(TextInput {
            widget,
            variant: self.variant,
            max_length: self.max_length,
            required: self.required,
            binding,
            validator: self.validator,
        })
    }
}
