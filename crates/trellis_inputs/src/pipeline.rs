//! Validate-then-notify commit pipeline
//!
//! Every committed change from every family funnels through [`commit`],
//! which makes the event ordering structural: the validator runs first,
//! the converted value is written to the cell, the replacement widget is
//! built with the fresh `invalid` state, and only then does the user's
//! change handler fire. A handler can therefore never observe a stale
//! validation result.

use std::sync::Arc;

use tracing::warn;
use trellis_core::{AnyCell, CellType, CellValue, SharedCellGraph, Validity};

use crate::widget::InputWidget;

/// A widget's borrowed view of its bound cell
///
/// The binding holds the unwrapped inner type and the nullability flag so
/// conversions never re-derive them, and it only touches the graph for
/// the duration of one read or write.
pub(crate) struct CellBinding {
    graph: SharedCellGraph,
    cell: AnyCell,
    inner: CellType,
    nullable: bool,
}

impl CellBinding {
    pub fn new(graph: SharedCellGraph, cell: AnyCell) -> Self {
        let (inner, nullable) = {
            let (inner, nullable) = cell.cell_type().unwrap_optional();
            (inner.clone(), nullable)
        };
        Self {
            graph,
            cell,
            inner,
            nullable,
        }
    }

    /// The bound type with any `Optional` wrapper stripped
    pub fn inner(&self) -> &CellType {
        &self.inner
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn cell(&self) -> &AnyCell {
        &self.cell
    }

    /// Current cell value; a torn-down cell reads as absent
    pub fn read(&self) -> CellValue {
        self.graph
            .lock()
            .unwrap()
            .get(&self.cell)
            .unwrap_or(CellValue::Absent)
    }

    /// Write a converted value back to the cell
    ///
    /// Rejected writes (torn-down cell, category mismatch from a buggy
    /// table) are logged and dropped; they never panic an event handler.
    pub fn write(&self, value: CellValue) {
        if let Err(err) = self.graph.lock().unwrap().set(&self.cell, value) {
            warn!(%err, "cell write rejected");
        }
    }
}

/// Run one committed change through the pipeline
///
/// `validate` produces the validity that annotates the replacement
/// widget; `write` converts and writes the raw value to the cell and
/// returns the re-synchronized native value (the cell's truth after
/// clamping and substitution). Validation never blocks the write.
pub(crate) fn commit<T: Clone>(
    widget: &InputWidget<T>,
    raw: Option<T>,
    validate: impl FnOnce(Option<&T>) -> Validity,
    write: impl FnOnce(Option<T>) -> Option<T>,
) -> InputWidget<T> {
    let validity = validate(raw.as_ref());
    let resynced = write(raw);
    let next = widget.replaced(resynced, validity.into_message());
    next.fire_change();
    next
}

/// Chain the kind validator with an optional caller validator; the first
/// failure wins
pub(crate) fn chain<T>(
    kind: Validity,
    custom: Option<&Arc<dyn Fn(Option<&T>) -> Validity + Send + Sync>>,
    raw: Option<&T>,
) -> Validity {
    match custom {
        Some(validator) => kind.and(|| validator(raw)),
        None => kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use trellis_core::{shared, CellGraph};

    #[test]
    fn invalid_is_assigned_before_the_handler_runs() {
        let observed = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let observed_in = observed.clone();

        let mut widget = InputWidget::<i64>::new(Some(0), false);
        widget.on_change = Some(Arc::new(move |w: &InputWidget<i64>| {
            observed_in.lock().unwrap().push(w.invalid.clone());
        }));

        // failing commit: the handler must see the fresh message
        let widget = commit(
            &widget,
            Some(7),
            |_| Validity::fail("bad seven"),
            |raw| raw,
        );
        // passing commit: the handler must see the cleared state
        let widget = commit(&widget, Some(8), |_| Validity::Pass, |raw| raw);

        let seen = observed.lock().unwrap();
        assert_eq!(seen[0].as_deref(), Some("bad seven"));
        assert_eq!(seen[1], None);
        assert!(widget.is_valid());
    }

    #[test]
    fn validation_does_not_block_the_write() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(0i64);
        let binding = CellBinding::new(graph.clone(), cell.clone());

        let widget = InputWidget::<i64>::new(Some(0), false);
        let next = commit(
            &widget,
            Some(9),
            |_| Validity::fail("disliked"),
            |raw| {
                binding.write(CellValue::Int(raw.unwrap_or(0)));
                match binding.read() {
                    CellValue::Int(i) => Some(i),
                    _ => None,
                }
            },
        );

        assert_eq!(next.invalid.as_deref(), Some("disliked"));
        assert_eq!(next.value, Some(9));
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Int(9))
        );
    }

    #[test]
    fn chain_prefers_the_kind_failure() {
        let custom: Arc<dyn Fn(Option<&i64>) -> Validity + Send + Sync> =
            Arc::new(|_| Validity::fail("custom"));
        let v = chain(Validity::fail("kind"), Some(&custom), None);
        assert_eq!(v.message(), Some("kind"));
        let v = chain(Validity::Pass, Some(&custom), None);
        assert_eq!(v.message(), Some("custom"));
        let v: Validity = chain::<i64>(Validity::Pass, None, None);
        assert!(v.is_pass());
    }
}
