//! Boolean input binding
//!
//! Binds checkbox/switch/toggle surfaces to boolean or numeric cells.
//!
//! # Example
//!
//! ```
//! use trellis_core::cell::{shared, CellGraph};
//! use trellis_inputs::inputs::boolean::bool_input;
//!
//! let graph = shared(CellGraph::new());
//! let cell = graph.lock().unwrap().create(false);
//!
//! let mut input = bool_input(&cell)
//!     .label("Accept terms")
//!     .build(&graph)
//!     .unwrap();
//!
//! input.commit(Some(true));
//! assert_eq!(input.widget().value, Some(true));
//! ```

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph, Validity};

use crate::convert::boolean;
use crate::kind::{BoolVariant, InputKind};
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// A bound boolean input
pub struct BoolInput {
    widget: InputWidget<bool>,
    variant: BoolVariant,
    binding: CellBinding,
    validator: Option<ValidatorFn<bool>>,
}

impl std::fmt::Debug for BoolInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoolInput")
            .field("widget", &self.widget)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl BoolInput {
    /// The current widget record
    pub fn widget(&self) -> &InputWidget<bool> {
        &self.widget
    }

    pub fn variant(&self) -> BoolVariant {
        self.variant
    }

    /// Commit a raw edit from the presentation layer
    pub fn commit(&mut self, raw: Option<bool>) {
        if self.widget.disabled {
            return;
        }
        let binding = &self.binding;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| pipeline::chain(Validity::Pass, validator, raw),
            |raw| {
                binding.write(boolean::from_native(binding.inner(), binding.nullable(), raw));
                boolean::to_native(&binding.read())
            },
        );
    }

    /// Forward a blur event
    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    /// Re-synchronize the widget from the cell
    pub fn refresh(&mut self) {
        self.widget.value = boolean::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> BoolProps {
        BoolProps {
            kind: "bool",
            variant: match self.variant {
                BoolVariant::Checkbox => "checkbox",
                BoolVariant::Switch => "switch",
                BoolVariant::Toggle => "toggle",
            },
            value: self.widget.value,
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a boolean input
#[derive(Clone, Debug, Serialize)]
pub struct BoolProps {
    pub kind: &'static str,
    pub variant: &'static str,
    pub value: Option<bool>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`BoolInput`]
pub struct BoolInputBuilder {
    cell: AnyCell,
    variant: BoolVariant,
    disabled: bool,
    label: Option<String>,
    description: Option<String>,
    on_change: Option<ChangeHandler<bool>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<bool>>,
}

/// Bind a boolean input to a cell
pub fn bool_input(cell: &AnyCell) -> BoolInputBuilder {
    BoolInputBuilder {
        cell: cell.clone(),
        variant: BoolVariant::default(),
        disabled: false,
        label: None,
        description: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl BoolInputBuilder {
    pub fn variant(mut self, variant: BoolVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Present as a switch
    pub fn switch(self) -> Self {
        self.variant(BoolVariant::Switch)
    }

    /// Present as a toggle button
    pub fn toggle(self) -> Self {
        self.variant(BoolVariant::Toggle)
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

    /// Handler called with the post-commit widget
    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&InputWidget<bool>) + Send + Sync + 'static,
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

    /// Caller validator, run after the kind validator
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(Option<&bool>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<BoolInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Bool(self.variant).supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "bool",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = boolean::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.description = self.description;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "bool", "input bound");
        Ok(BoolInput {
            widget,
            variant: self.variant,
            binding,
            validator: self.validator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::cell::{shared, CellGraph};
    use trellis_core::CellValue;

    #[test]
    fn binds_numeric_cells_truthily() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(3i32);

        let mut input = bool_input(&cell).build(&graph).unwrap();
        assert_eq!(input.widget().value, Some(true));

        input.commit(Some(false));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Int(0)));
        assert_eq!(input.widget().value, Some(false));
    }

    #[test]
    fn rejects_text_cells() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::from("no"));
        let err = bool_input(&cell).build(&graph).unwrap_err();
        assert!(matches!(err, BindError::UnsupportedBinding { kind: "bool", .. }));
    }

    #[test]
    fn nullable_binding_preserves_absence() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(Some(true));

        let mut input = bool_input(&cell).build(&graph).unwrap();
        assert!(input.widget().nullable);

        input.commit(None);
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Absent));
        assert_eq!(input.widget().value, None);
    }

    #[test]
    fn non_nullable_binding_substitutes_false() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(true);

        let mut input = bool_input(&cell).build(&graph).unwrap();
        input.commit(None);
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Bool(false)));
        assert_eq!(input.widget().value, Some(false));
    }

    #[test]
    fn disabled_input_ignores_commits() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(false);

        let mut input = bool_input(&cell).disabled(true).build(&graph).unwrap();
        input.commit(Some(true));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Bool(false)));
    }

    #[test]
    fn props_flatten_the_widget() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(true);
        let input = bool_input(&cell).switch().label("On").build(&graph).unwrap();
        let props = input.props();
        assert_eq!(props.variant, "switch");
        assert_eq!(props.value, Some(true));
        assert_eq!(props.label.as_deref(), Some("On"));
    }
}
