//! Selection input bindings
//!
//! The single-select input edits one value against an option set; the
//! multi-select edits an ordered collection against the same set.
//! Many-select is inferred from the bound type being a list. Option sets
//! are supplied by the caller or auto-derived (enumeration cells from
//! their shape, palette cells from the palette).

use serde::Serialize;
use tracing::debug;

use trellis_core::{
    AnyCell, BindError, CellType, CellValue, ColorType, PaletteColor, Result, SharedCellGraph,
    Validity,
};

use crate::convert::selection;
use crate::kind::{InputKind, SelectVariant};
use crate::options::{Choice, OptionSet};
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// Derive an option set for a bound value type, where one exists
pub fn derive_options(value_type: &CellType) -> Option<OptionSet> {
    match value_type {
        CellType::Enum(shape) => Some(OptionSet::from_shape(shape)),
        CellType::Color(ColorType::Palette) => Some(OptionSet::from_values(
            PaletteColor::ALL.iter().copied(),
            |c| c.name().to_string(),
        )),
        CellType::Bool => {
            let mut set = OptionSet::new(CellType::Bool);
            set.push(Choice::new("Yes", CellValue::Bool(true)));
            set.push(Choice::new("No", CellValue::Bool(false)));
            Some(set)
        }
        _ => None,
    }
}

fn membership_validity(options: &OptionSet, value: &CellValue) -> Validity {
    match options.position_of(value) {
        Some(index) if options.get(index).map(|c| c.disabled).unwrap_or(false) => {
            Validity::fail("option is disabled")
        }
        Some(_) => Validity::Pass,
        None => Validity::fail("not one of the available options"),
    }
}

/// A bound single-select input
pub struct SelectInput {
    widget: InputWidget<CellValue>,
    variant: SelectVariant,
    options: OptionSet,
    binding: CellBinding,
    validator: Option<ValidatorFn<CellValue>>,
}

impl std::fmt::Debug for SelectInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectInput")
            .field("widget", &self.widget)
            .field("variant", &self.variant)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SelectInput {
    pub fn widget(&self) -> &InputWidget<CellValue> {
        &self.widget
    }

    pub fn variant(&self) -> SelectVariant {
        self.variant
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Label of the currently selected option
    pub fn selected_label(&self) -> Option<&str> {
        self.widget
            .value
            .as_ref()
            .and_then(|v| self.options.label_of(v))
    }

    /// Narrow the options for combobox-style presentation
    pub fn filtered(&self, query: &str) -> OptionSet {
        self.options.filter(query)
    }

    /// Commit a raw selection from the presentation layer
    pub fn commit(&mut self, raw: Option<CellValue>) {
        if self.widget.disabled {
            return;
        }
        let binding = &self.binding;
        let options = &self.options;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| {
                let kind = match raw {
                    Some(v) => membership_validity(options, v),
                    None => Validity::Pass,
                };
                pipeline::chain(kind, validator, raw)
            },
            |raw| {
                binding.write(selection::from_native(
                    binding.inner(),
                    binding.nullable(),
                    raw,
                ));
                selection::to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = selection::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> SelectProps {
        SelectProps {
            kind: "select",
            variant: variant_name(self.variant),
            selected: self.widget.value.as_ref().map(|v| {
                self.options
                    .label_of(v)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{v:?}"))
            }),
            labels: self.options.iter().map(|c| c.label.clone()).collect(),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

fn variant_name(variant: SelectVariant) -> &'static str {
    match variant {
        SelectVariant::Dropdown => "dropdown",
        SelectVariant::Radio => "radio",
        SelectVariant::ToggleGroup => "togglegroup",
        SelectVariant::List => "list",
    }
}

/// Wire shape of a selection input
#[derive(Clone, Debug, Serialize)]
pub struct SelectProps {
    pub kind: &'static str,
    pub variant: &'static str,
    pub selected: Option<String>,
    pub labels: Vec<String>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`SelectInput`] and [`MultiSelectInput`]
pub struct SelectInputBuilder {
    cell: AnyCell,
    variant: SelectVariant,
    options: Option<OptionSet>,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<CellValue>>,
    on_change_many: Option<ChangeHandler<Vec<CellValue>>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<CellValue>>,
}

/// Bind a selection input to a cell
pub fn select_input(cell: &AnyCell) -> SelectInputBuilder {
    SelectInputBuilder {
        cell: cell.clone(),
        variant: SelectVariant::default(),
        options: None,
        disabled: false,
        label: None,
        on_change: None,
        on_change_many: None,
        on_blur: None,
        validator: None,
    }
}

impl SelectInputBuilder {
    pub fn variant(mut self, variant: SelectVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn radio(self) -> Self {
        self.variant(SelectVariant::Radio)
    }

    /// Supply the option set explicitly
    pub fn options(mut self, options: OptionSet) -> Self {
        self.options = Some(options);
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

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&InputWidget<CellValue>) + Send + Sync + 'static,
    {
        self.on_change = Some(std::sync::Arc::new(handler));
        self
    }

    /// Change handler for the many-select shape
    pub fn on_change_many<F>(mut self, handler: F) -> Self
    where
        F: Fn(&InputWidget<Vec<CellValue>>) + Send + Sync + 'static,
    {
        self.on_change_many = Some(std::sync::Arc::new(handler));
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
        F: Fn(Option<&CellValue>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    fn resolve_options(&mut self, binding: &CellBinding) -> Result<OptionSet> {
        let value_type = selection::value_type(binding.inner());
        match self.options.take() {
            Some(set) => Ok(set),
            None => derive_options(value_type).ok_or_else(|| BindError::UnsupportedBinding {
                kind: "select",
                ty: binding.cell().cell_type().clone(),
            }),
        }
    }

    /// Construct a single-select input
    ///
    /// Fails on list-bound cells (use [`build_many`](Self::build_many)) and
    /// on cells whose value type has no supplied or derivable option set.
    pub fn build(mut self, graph: &SharedCellGraph) -> Result<SelectInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Select(self.variant).supports(ty)
            || selection::is_many(ty.unwrap_optional().0)
        {
            return Err(BindError::UnsupportedBinding {
                kind: "select",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let options = self.resolve_options(&binding)?;
        let seed = selection::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "select", options = options.len(), "input bound");
        Ok(SelectInput {
            widget,
            variant: self.variant,
            options,
            binding,
            validator: self.validator,
        })
    }

    /// Construct a multi-select input over a list-bound cell
    pub fn build_many(mut self, graph: &SharedCellGraph) -> Result<MultiSelectInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Select(self.variant).supports(ty)
            || !selection::is_many(ty.unwrap_optional().0)
        {
            return Err(BindError::UnsupportedBinding {
                kind: "select",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let options = self.resolve_options(&binding)?;
        let seed = selection::to_native_many(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change_many;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "select", many = true, "input bound");
        Ok(MultiSelectInput {
            widget,
            variant: self.variant,
            options,
            binding,
        })
    }
}

/// A bound multi-select input
pub struct MultiSelectInput {
    widget: InputWidget<Vec<CellValue>>,
    variant: SelectVariant,
    options: OptionSet,
    binding: CellBinding,
}

impl MultiSelectInput {
    pub fn widget(&self) -> &InputWidget<Vec<CellValue>> {
        &self.widget
    }

    pub fn variant(&self) -> SelectVariant {
        self.variant
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Commit a raw selection collection from the presentation layer
    pub fn commit(&mut self, raw: Option<Vec<CellValue>>) {
        if self.widget.disabled {
            return;
        }
        let binding = &self.binding;
        let options = &self.options;
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| match raw {
                Some(items) => items
                    .iter()
                    .map(|v| membership_validity(options, v))
                    .find(Validity::is_fail)
                    .unwrap_or(Validity::Pass),
                None => Validity::Pass,
            },
            |raw| {
                binding.write(selection::from_native_many(binding.nullable(), raw));
                selection::to_native_many(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = selection::to_native_many(&self.binding.read());
    }
}
