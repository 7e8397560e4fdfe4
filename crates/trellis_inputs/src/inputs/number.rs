//! Numeric input binding
//!
//! Binds field/slider surfaces to integer or float cells. The editing
//! range, step, and precision are inferred from the bound width; a caller
//! may narrow them but never widen past what the bound type can hold.
//! Out-of-range commits clamp silently.

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph, Validity};

use crate::convert::number::{self, NumberMeta};
use crate::kind::{InputKind, NumberVariant};
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// A bound numeric input
pub struct NumberInput {
    widget: InputWidget<f64>,
    variant: NumberVariant,
    meta: NumberMeta,
    binding: CellBinding,
    validator: Option<ValidatorFn<f64>>,
}

impl std::fmt::Debug for NumberInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberInput")
            .field("widget", &self.widget)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl NumberInput {
    pub fn widget(&self) -> &InputWidget<f64> {
        &self.widget
    }

    pub fn variant(&self) -> NumberVariant {
        self.variant
    }

    /// The effective editing metadata
    pub fn meta(&self) -> &NumberMeta {
        &self.meta
    }

    /// Commit a raw edit from the presentation layer
    ///
    /// Non-finite input fails validation and skips the write; everything
    /// else clamps into the effective range before reaching the cell.
    pub fn commit(&mut self, raw: Option<f64>) {
        if self.widget.disabled {
            return;
        }
        let binding = &self.binding;
        let meta = &self.meta;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| {
                let kind = match raw {
                    Some(v) if !v.is_finite() => Validity::fail("not a number"),
                    _ => Validity::Pass,
                };
                pipeline::chain(kind, validator, raw)
            },
            |raw| {
                let writable = match raw {
                    Some(v) if !v.is_finite() => None,
                    other => Some(other),
                };
                if let Some(raw) = writable {
                    binding.write(number::from_native(
                        binding.inner(),
                        binding.nullable(),
                        meta,
                        raw,
                    ));
                }
                number::to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    /// Re-synchronize the widget from the cell
    pub fn refresh(&mut self) {
        self.widget.value = number::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> NumberProps {
        NumberProps {
            kind: "number",
            variant: match self.variant {
                NumberVariant::Field => "field",
                NumberVariant::Slider => "slider",
            },
            value: self.widget.value,
            min: self.meta.min,
            max: self.meta.max,
            step: self.meta.step,
            decimals: self.meta.decimals,
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
            placeholder: self.widget.placeholder.clone(),
        }
    }
}

/// Wire shape of a numeric input
#[derive(Clone, Debug, Serialize)]
pub struct NumberProps {
    pub kind: &'static str,
    pub variant: &'static str,
    pub value: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub decimals: Option<u8>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
}

/// Builder for [`NumberInput`]
pub struct NumberInputBuilder {
    cell: AnyCell,
    variant: NumberVariant,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    disabled: bool,
    label: Option<String>,
    placeholder: Option<String>,
    on_change: Option<ChangeHandler<f64>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<f64>>,
}

/// Bind a numeric input to a cell
pub fn number_input(cell: &AnyCell) -> NumberInputBuilder {
    NumberInputBuilder {
        cell: cell.clone(),
        variant: NumberVariant::default(),
        min: None,
        max: None,
        step: None,
        disabled: false,
        label: None,
        placeholder: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl NumberInputBuilder {
    pub fn variant(mut self, variant: NumberVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Present as a slider
    pub fn slider(self) -> Self {
        self.variant(NumberVariant::Slider)
    }

    /// Narrow the minimum (cannot widen past the bound type's range)
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Narrow the maximum (cannot widen past the bound type's range)
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
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

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&InputWidget<f64>) + Send + Sync + 'static,
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
        F: Fn(Option<&f64>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<NumberInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Number(self.variant).supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "number",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let meta = number::meta(binding.inner()).narrowed(self.min, self.max, self.step);
        let seed = number::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.placeholder = self.placeholder;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "number", min = meta.min, max = meta.max, "input bound");
        Ok(NumberInput {
            widget,
            variant: self.variant,
            meta,
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
    fn byte_cell_infers_its_range_and_clamps() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(10u8);

        let mut input = number_input(&cell).build(&graph).unwrap();
        assert_eq!(input.meta().min, 0.0);
        assert_eq!(input.meta().max, 255.0);

        input.commit(Some(999.0));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Int(255)));
        assert_eq!(input.widget().value, Some(255.0));

        input.commit(Some(-5.0));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Int(0)));
        assert_eq!(input.widget().value, Some(0.0));
    }

    #[test]
    fn integral_commits_truncate_toward_zero() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(0i32);
        let mut input = number_input(&cell).build(&graph).unwrap();

        input.commit(Some(-2.9));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Int(-2)));
    }

    #[test]
    fn non_finite_input_flags_and_skips_the_write() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(5.0f64);
        let mut input = number_input(&cell).build(&graph).unwrap();

        input.commit(Some(f64::NAN));
        assert_eq!(input.widget().invalid.as_deref(), Some("not a number"));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Float(5.0)));
        // widget re-synchronized from the untouched cell
        assert_eq!(input.widget().value, Some(5.0));
    }

    #[test]
    fn caller_narrowing_applies() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(50u8);
        let mut input = number_input(&cell)
            .min(10.0)
            .max(100.0)
            .step(5.0)
            .build(&graph)
            .unwrap();
        assert_eq!(input.meta().step, 5.0);

        input.commit(Some(200.0));
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Int(100)));
    }

    #[test]
    fn nullable_numeric_preserves_absence() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(Some(1.5f64));
        let mut input = number_input(&cell).build(&graph).unwrap();
        assert!(input.widget().nullable);

        input.commit(None);
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Absent));
        assert_eq!(input.widget().value, None);
    }

    #[test]
    fn rejects_unsupported_types() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::from("7"));
        assert!(matches!(
            number_input(&cell).build(&graph).unwrap_err(),
            BindError::UnsupportedBinding { kind: "number", .. }
        ));
    }
}
