//! Color input binding
//!
//! Edits CSS-text, plain-text, or palette cells through a native color
//! string. Palette cells are the one place a native string can be
//! unrepresentable; such commits flag the widget and leave the cell
//! untouched.

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph};

use crate::convert::color;
use crate::kind::InputKind;
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// A bound color input
pub struct ColorInput {
    widget: InputWidget<String>,
    binding: CellBinding,
    validator: Option<ValidatorFn<String>>,
}

impl ColorInput {
    pub fn widget(&self) -> &InputWidget<String> {
        &self.widget
    }

    /// Commit a raw edit from the presentation layer
    pub fn commit(&mut self, raw: Option<String>) {
        if self.widget.disabled {
            return;
        }
        let binding = &self.binding;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| {
                let kind = match raw {
                    Some(s) => color::validate(binding.inner(), s),
                    None => trellis_core::Validity::Pass,
                };
                pipeline::chain(kind, validator, raw)
            },
            |raw| {
                if let Some(value) =
                    color::from_native(binding.inner(), binding.nullable(), raw.as_deref())
                {
                    binding.write(value);
                }
                color::to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = color::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> ColorProps {
        ColorProps {
            kind: "color",
            value: self.widget.value.clone(),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a color input
#[derive(Clone, Debug, Serialize)]
pub struct ColorProps {
    pub kind: &'static str,
    pub value: Option<String>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`ColorInput`]
pub struct ColorInputBuilder {
    cell: AnyCell,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<String>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<String>>,
}

/// Bind a color input to a cell
pub fn color_input(cell: &AnyCell) -> ColorInputBuilder {
    ColorInputBuilder {
        cell: cell.clone(),
        disabled: false,
        label: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl ColorInputBuilder {
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
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
        F: Fn(Option<&String>) -> trellis_core::Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<ColorInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Color.supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "color",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = color::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "color", "input bound");
        Ok(ColorInput {
            widget,
            binding,
            validator: self.validator,
        })
    }
}
