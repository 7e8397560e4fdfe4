//! Feedback input binding
//!
//! Rating surfaces (stars, emoji scale, thumbs) editing a shared numeric
//! score. Boolean cells ride the same table through 0/1, so a thumbs
//! widget can bind a `bool` cell and a stars widget an `i32` cell without
//! separate conversions. Scores clamp to the variant's scale and snap to
//! whole steps.

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, CellType, CellValue, Result, SharedCellGraph, Validity};

use crate::kind::{FeedbackVariant, InputKind};
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// Cell value to native score; `None` = absent
pub fn to_native(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        _ => None,
    }
}

/// Native score back to a cell value, snapped to the variant's scale
pub fn from_native(
    inner: &CellType,
    nullable: bool,
    variant: FeedbackVariant,
    native: Option<f64>,
) -> CellValue {
    let score = match native {
        Some(v) if v.is_finite() => v.round().clamp(0.0, variant.max_score()),
        Some(_) => 0.0,
        None if nullable => return CellValue::Absent,
        None => 0.0,
    };
    match inner {
        CellType::Bool => CellValue::Bool(score != 0.0),
        CellType::Int(w) => CellValue::Int(w.clamp(score as i64)),
        _ => CellValue::Float(score),
    }
}

/// A bound feedback input
pub struct FeedbackInput {
    widget: InputWidget<f64>,
    variant: FeedbackVariant,
    binding: CellBinding,
    validator: Option<ValidatorFn<f64>>,
}

impl std::fmt::Debug for FeedbackInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackInput")
            .field("widget", &self.widget)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl FeedbackInput {
    pub fn widget(&self) -> &InputWidget<f64> {
        &self.widget
    }

    pub fn variant(&self) -> FeedbackVariant {
        self.variant
    }

    /// Commit a raw score from the presentation layer
    pub fn commit(&mut self, raw: Option<f64>) {
        if self.widget.disabled {
            return;
        }
        let binding = &self.binding;
        let variant = self.variant;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| {
                let kind = match raw {
                    Some(v) if !v.is_finite() => Validity::fail("not a score"),
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
                    binding.write(from_native(
                        binding.inner(),
                        binding.nullable(),
                        variant,
                        raw,
                    ));
                }
                to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> FeedbackProps {
        FeedbackProps {
            kind: "feedback",
            variant: match self.variant {
                FeedbackVariant::Stars => "stars",
                FeedbackVariant::Emoji => "emoji",
                FeedbackVariant::Thumbs => "thumbs",
            },
            value: self.widget.value,
            max: self.variant.max_score(),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a feedback input
#[derive(Clone, Debug, Serialize)]
pub struct FeedbackProps {
    pub kind: &'static str,
    pub variant: &'static str,
    pub value: Option<f64>,
    pub max: f64,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`FeedbackInput`]
pub struct FeedbackInputBuilder {
    cell: AnyCell,
    variant: FeedbackVariant,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<f64>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<f64>>,
}

/// Bind a feedback input to a cell
pub fn feedback_input(cell: &AnyCell) -> FeedbackInputBuilder {
    FeedbackInputBuilder {
        cell: cell.clone(),
        variant: FeedbackVariant::default(),
        disabled: false,
        label: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl FeedbackInputBuilder {
    pub fn variant(mut self, variant: FeedbackVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn emoji(self) -> Self {
        self.variant(FeedbackVariant::Emoji)
    }

    pub fn thumbs(self) -> Self {
        self.variant(FeedbackVariant::Thumbs)
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
    pub fn build(self, graph: &SharedCellGraph) -> Result<FeedbackInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Feedback(self.variant).supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "feedback",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "feedback", variant = ?self.variant, "input bound");
        Ok(FeedbackInput {
            widget,
            variant: self.variant,
            binding,
            validator: self.validator,
        })
    }
}
