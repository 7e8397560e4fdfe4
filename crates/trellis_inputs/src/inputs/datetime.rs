//! Date/time and date-range input bindings
//!
//! The date/time input edits any of the four structured date shapes or an
//! ISO-8601 text cell through one native `NaiveDateTime`. The date-range
//! input edits a `Range<date>` cell through a native endpoint pair and
//! rejects inverted ranges at validation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, Result, SharedCellGraph, Validity};

use crate::convert::datetime;
use crate::kind::{DateTimeVariant, InputKind};
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// A bound date/time input
pub struct DateTimeInput {
    widget: InputWidget<NaiveDateTime>,
    variant: DateTimeVariant,
    binding: CellBinding,
    validator: Option<ValidatorFn<NaiveDateTime>>,
}

impl DateTimeInput {
    pub fn widget(&self) -> &InputWidget<NaiveDateTime> {
        &self.widget
    }

    pub fn variant(&self) -> DateTimeVariant {
        self.variant
    }

    /// Commit a raw edit from the presentation layer
    pub fn commit(&mut self, raw: Option<NaiveDateTime>) {
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
                binding.write(datetime::from_native(
                    binding.inner(),
                    binding.nullable(),
                    raw,
                ));
                datetime::to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = datetime::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> DateTimeProps {
        DateTimeProps {
            kind: "datetime",
            variant: match self.variant {
                DateTimeVariant::Date => "date",
                DateTimeVariant::Time => "time",
                DateTimeVariant::DateTime => "datetime",
            },
            value: self.widget.value.map(datetime::format_text),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a date/time input (value as RFC 3339 text)
#[derive(Clone, Debug, Serialize)]
pub struct DateTimeProps {
    pub kind: &'static str,
    pub variant: &'static str,
    pub value: Option<String>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`DateTimeInput`]
pub struct DateTimeInputBuilder {
    cell: AnyCell,
    variant: DateTimeVariant,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<NaiveDateTime>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<NaiveDateTime>>,
}

/// Bind a date/time input to a cell
pub fn datetime_input(cell: &AnyCell) -> DateTimeInputBuilder {
    DateTimeInputBuilder {
        cell: cell.clone(),
        variant: DateTimeVariant::default(),
        disabled: false,
        label: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl DateTimeInputBuilder {
    pub fn variant(mut self, variant: DateTimeVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Edit the date part only
    pub fn date(self) -> Self {
        self.variant(DateTimeVariant::Date)
    }

    /// Edit the time part only
    pub fn time(self) -> Self {
        self.variant(DateTimeVariant::Time)
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
        F: Fn(&InputWidget<NaiveDateTime>) + Send + Sync + 'static,
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
        F: Fn(Option<&NaiveDateTime>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<DateTimeInput> {
        let ty = self.cell.cell_type();
        if !InputKind::DateTime(self.variant).supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "datetime",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = datetime::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "datetime", "input bound");
        Ok(DateTimeInput {
            widget,
            variant: self.variant,
            binding,
            validator: self.validator,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Date range
// ─────────────────────────────────────────────────────────────────────────────

/// A bound date-range input
pub struct DateRangeInput {
    widget: InputWidget<(NaiveDate, NaiveDate)>,
    binding: CellBinding,
    validator: Option<ValidatorFn<(NaiveDate, NaiveDate)>>,
}

impl std::fmt::Debug for DateRangeInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateRangeInput")
            .field("widget", &self.widget)
            .finish_non_exhaustive()
    }
}

impl DateRangeInput {
    pub fn widget(&self) -> &InputWidget<(NaiveDate, NaiveDate)> {
        &self.widget
    }

    /// Commit a raw edit from the presentation layer
    pub fn commit(&mut self, raw: Option<(NaiveDate, NaiveDate)>) {
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
                    Some((start, end)) if start > end => {
                        Validity::fail("range start is after its end")
                    }
                    _ => Validity::Pass,
                };
                pipeline::chain(kind, validator, raw)
            },
            |raw| {
                binding.write(datetime::range_from_native(binding.nullable(), raw));
                datetime::range_to_native(&binding.read())
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = datetime::range_to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> DateRangeProps {
        DateRangeProps {
            kind: "daterange",
            start: self.widget.value.map(|(s, _)| s.to_string()),
            end: self.widget.value.map(|(_, e)| e.to_string()),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a date-range input (endpoints as ISO dates)
#[derive(Clone, Debug, Serialize)]
pub struct DateRangeProps {
    pub kind: &'static str,
    pub start: Option<String>,
    pub end: Option<String>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`DateRangeInput`]
pub struct DateRangeInputBuilder {
    cell: AnyCell,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<(NaiveDate, NaiveDate)>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<(NaiveDate, NaiveDate)>>,
}

/// Bind a date-range input to a cell
pub fn daterange_input(cell: &AnyCell) -> DateRangeInputBuilder {
    DateRangeInputBuilder {
        cell: cell.clone(),
        disabled: false,
        label: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl DateRangeInputBuilder {
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
        F: Fn(&InputWidget<(NaiveDate, NaiveDate)>) + Send + Sync + 'static,
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
        F: Fn(Option<&(NaiveDate, NaiveDate)>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<DateRangeInput> {
        let ty = self.cell.cell_type();
        if !InputKind::DateRange.supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "daterange",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = datetime::range_to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "daterange", "input bound");
        Ok(DateRangeInput {
            widget,
            binding,
            validator: self.validator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::cell::{shared, CellGraph};
    use trellis_core::{CellValue, DateValue};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_cell_round_trips_exactly() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(date(2024, 6, 15));
        let mut input = datetime_input(&cell).date().build(&graph).unwrap();

        let edited = date(2025, 1, 2).and_hms_opt(0, 0, 0).unwrap();
        input.commit(Some(edited));
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Date(DateValue::Date(date(2025, 1, 2))))
        );
        assert_eq!(input.widget().value, Some(edited));
    }

    #[test]
    fn text_cell_normalizes_on_write_back() {
        let graph = shared(CellGraph::new());
        let cell = graph
            .lock()
            .unwrap()
            .create(String::from("2024-06-15T13:45:30"));
        let mut input = datetime_input(&cell).build(&graph).unwrap();
        assert!(input.widget().value.is_some());

        let native = input.widget().value.unwrap();
        input.commit(Some(native));
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Text("2024-06-15T13:45:30Z".into()))
        );
    }

    #[test]
    fn unparsable_text_seeds_empty() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::from("next Tuesday"));
        let input = datetime_input(&cell).build(&graph).unwrap();
        assert_eq!(input.widget().value, None);
    }

    #[test]
    fn nullable_absent_round_trip() {
        let graph = shared(CellGraph::new());
        let cell = graph
            .lock()
            .unwrap()
            .create(Some(date(2024, 6, 15)));
        let mut input = datetime_input(&cell).date().build(&graph).unwrap();

        input.commit(None);
        assert_eq!(graph.lock().unwrap().get(&cell), Some(CellValue::Absent));
    }

    #[test]
    fn non_nullable_absent_substitutes_now() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(date(2020, 1, 1));
        let mut input = datetime_input(&cell).date().build(&graph).unwrap();

        input.commit(None);
        // "now" was substituted: the stored date moved off the seed
        match graph.lock().unwrap().get(&cell) {
            Some(CellValue::Date(DateValue::Date(d))) => assert!(d > date(2020, 1, 1)),
            other => panic!("unexpected value: {other:?}"),
        };
    }

    #[test]
    fn inverted_range_flags_but_writes() {
        let graph = shared(CellGraph::new());
        let cell = graph
            .lock()
            .unwrap()
            .create((date(2024, 1, 1), date(2024, 1, 31)));
        let mut input = daterange_input(&cell).build(&graph).unwrap();

        input.commit(Some((date(2024, 2, 1), date(2024, 1, 1))));
        assert_eq!(
            input.widget().invalid.as_deref(),
            Some("range start is after its end")
        );
        assert_eq!(
            input.widget().value,
            Some((date(2024, 2, 1), date(2024, 1, 1)))
        );
    }

    #[test]
    fn range_requires_a_date_range_cell() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(date(2024, 1, 1));
        assert!(matches!(
            daterange_input(&cell).build(&graph).unwrap_err(),
            BindError::UnsupportedBinding { kind: "daterange", .. }
        ));
    }
}
