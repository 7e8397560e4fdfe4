//! Code input binding
//!
//! A text identity binding with a language tag for the presentation
//! layer's editor surface. Validation is caller-supplied only.

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph, Validity};

use crate::convert::text;
use crate::kind::InputKind;
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// A bound code input
pub struct CodeInput {
    widget: InputWidget<String>,
    language: Option<String>,
    binding: CellBinding,
    validator: Option<ValidatorFn<String>>,
}

impl CodeInput {
    pub fn widget(&self) -> &InputWidget<String> {
        &self.widget
    }

    /// Language tag for syntax highlighting
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
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
            |raw| pipeline::chain(Validity::Pass, validator, raw),
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
    pub fn props(&self) -> CodeProps {
        CodeProps {
            kind: "code",
            value: self.widget.value.clone(),
            language: self.language.clone(),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a code input
#[derive(Clone, Debug, Serialize)]
pub struct CodeProps {
    pub kind: &'static str,
    pub value: Option<String>,
    pub language: Option<String>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`CodeInput`]
pub struct CodeInputBuilder {
    cell: AnyCell,
    language: Option<String>,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<String>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<String>>,
}

/// Bind a code input to a cell
pub fn code_input(cell: &AnyCell) -> CodeInputBuilder {
    CodeInputBuilder {
        cell: cell.clone(),
        language: None,
        disabled: false,
        label: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl CodeInputBuilder {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
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
    pub fn build(self, graph: &SharedCellGraph) -> Result<CodeInput> {
        let ty = self.cell.cell_type();
        if !InputKind::Code.supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "code",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = text::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "code", language = ?self.language, "input bound");
        Ok(CodeInput {
            widget,
            language: self.language,
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
    fn identity_with_language_tag() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::from("fn main() {}"));
        let mut input = code_input(&cell).language("rust").build(&graph).unwrap();

        assert_eq!(input.language(), Some("rust"));
        input.commit(Some("fn main() { body() }".into()));
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Text("fn main() { body() }".into()))
        );
        assert_eq!(input.props().language.as_deref(), Some("rust"));
    }

    #[test]
    fn caller_validator_applies() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::new());
        let mut input = code_input(&cell)
            .validator(|raw| match raw {
                Some(s) if s.contains('\t') => Validity::fail("tabs are not allowed"),
                _ => Validity::Pass,
            })
            .build(&graph)
            .unwrap();

        input.commit(Some("\tindent".into()));
        assert_eq!(input.widget().invalid.as_deref(), Some("tabs are not allowed"));
    }
}
