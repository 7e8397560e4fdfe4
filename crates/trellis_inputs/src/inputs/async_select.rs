//! Async lookup/query selection binding
//!
//! For selection widgets whose options are not known up front: opening the
//! picker issues a text query against a caller-supplied source, and
//! selecting a value issues a separate display lookup (value → label) so
//! the closed widget can show a human-readable label without re-fetching
//! the option list.
//!
//! Ordering is by generation token, not completion order: every query,
//! lookup, or cancellation bumps the token, and a response is applied only
//! if its token is still current (last-request-wins). Failures never
//! retry — a failed query keeps the previous options and a failed lookup
//! leaves the display blank.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use trellis_core::{AnyCell, BindError, CellValue, Result, SharedCellGraph, Validity};

use crate::convert::selection;
use crate::kind::InputKind;
use crate::options::Choice;
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// A rejected or timed-out query/lookup call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("lookup failed: {0}")]
pub struct LookupError(pub String);

/// Text query source: search text to matching choices
pub type QueryFn = Arc<
    dyn Fn(String) -> BoxFuture<'static, std::result::Result<Vec<Choice>, LookupError>>
        + Send
        + Sync,
>;

/// Display lookup source: selected value to its choice, if known
pub type LookupFn = Arc<
    dyn Fn(CellValue) -> BoxFuture<'static, std::result::Result<Option<Choice>, LookupError>>
        + Send
        + Sync,
>;

/// Picker lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LookupPhase {
    Idle,
    /// Picker opened, query about to be issued
    Open,
    /// Query in flight
    Loading,
    /// The current generation's options are applied
    Resolved,
    /// Superseded before resolution
    Cancelled,
}

struct LookupState {
    phase: LookupPhase,
    options: Vec<Choice>,
    display: Option<String>,
    labels: FxHashMap<String, String>,
}

struct LookupShared {
    generation: AtomicU64,
    state: Mutex<LookupState>,
}

impl LookupShared {
    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}

/// Canonical cache key for a selected value
fn cache_key(value: &CellValue) -> String {
    format!("{value:?}")
}

/// A bound async-lookup selection input
pub struct AsyncSelectInput {
    widget: InputWidget<CellValue>,
    binding: CellBinding,
    validator: Option<ValidatorFn<CellValue>>,
    query: QueryFn,
    lookup: Option<LookupFn>,
    shared: Arc<LookupShared>,
}

impl AsyncSelectInput {
    pub fn widget(&self) -> &InputWidget<CellValue> {
        &self.widget
    }

    pub fn phase(&self) -> LookupPhase {
        self.shared.state.lock().unwrap().phase
    }

    /// Snapshot of the currently applied options
    pub fn options(&self) -> Vec<Choice> {
        self.shared.state.lock().unwrap().options.clone()
    }

    /// The resolved display label for the selected value, if any
    pub fn display_label(&self) -> Option<String> {
        self.shared.state.lock().unwrap().display.clone()
    }

    /// Open the picker and issue a query for `text`
    ///
    /// Supersedes any in-flight query or lookup; only the response for
    /// this call's generation token will be applied. Must run inside a
    /// tokio runtime.
    pub fn open(&self, text: impl Into<String>) {
        let token = self.shared.bump();
        self.shared.state.lock().unwrap().phase = LookupPhase::Open;
        let shared = self.shared.clone();
        let query = self.query.clone();
        let text = text.into();
        tokio::spawn(async move {
            {
                let mut state = shared.state.lock().unwrap();
                if shared.is_current(token) {
                    state.phase = LookupPhase::Loading;
                }
            }
            let result = (query)(text).await;
            let mut state = shared.state.lock().unwrap();
            if !shared.is_current(token) {
                debug!(token, "stale query response discarded");
                return;
            }
            match result {
                Ok(options) => {
                    state.options = options;
                    state.phase = LookupPhase::Resolved;
                }
                Err(err) => {
                    // no retry; keep whatever was applied before
                    debug!(%err, "query failed");
                    state.phase = LookupPhase::Resolved;
                }
            }
        });
    }

    /// Cancel the in-flight query, leaving applied options untouched
    pub fn cancel(&self) {
        self.shared.bump();
        self.shared.state.lock().unwrap().phase = LookupPhase::Cancelled;
    }

    /// Select a value: closes the picker, commits through the pipeline,
    /// and issues the display lookup
    ///
    /// Must run inside a tokio runtime.
    pub fn select(&mut self, raw: Option<CellValue>) {
        if self.widget.disabled {
            return;
        }
        // close the picker; this supersedes any in-flight query
        let lookup_token = self.shared.bump();
        self.shared.state.lock().unwrap().phase = LookupPhase::Idle;

        let binding = &self.binding;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| pipeline::chain(Validity::Pass, validator, raw),
            |raw| {
                binding.write(selection::from_native(
                    binding.inner(),
                    binding.nullable(),
                    raw,
                ));
                selection::to_native(&binding.read())
            },
        );

        self.resolve_display(lookup_token);
    }

    /// Resolve the display label for the current selection: cache first,
    /// then the lookup source
    fn resolve_display(&self, token: u64) {
        let Some(value) = self.widget.value.clone() else {
            self.shared.state.lock().unwrap().display = None;
            return;
        };
        let key = cache_key(&value);
        {
            let mut state = self.shared.state.lock().unwrap();
            if let Some(label) = state.labels.get(&key).cloned() {
                state.display = Some(label);
                return;
            }
            // blank until the lookup resolves
            state.display = None;
        }
        let Some(lookup) = self.lookup.clone() else {
            return;
        };
        let shared = self.shared.clone();
        tokio::spawn(async move {
            let result = (lookup)(value).await;
            let mut state = shared.state.lock().unwrap();
            if !shared.is_current(token) {
                debug!(token, "stale display lookup discarded");
                return;
            }
            match result {
                Ok(Some(choice)) => {
                    state.labels.insert(key, choice.label.clone());
                    state.display = Some(choice.label);
                }
                Ok(None) => {}
                Err(err) => {
                    // display stays blank; no retry
                    debug!(%err, "display lookup failed");
                }
            }
        });
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = selection::to_native(&self.binding.read());
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> AsyncSelectProps {
        let state = self.shared.state.lock().unwrap();
        AsyncSelectProps {
            kind: "asyncselect",
            phase: state.phase,
            display: state.display.clone(),
            labels: state.options.iter().map(|c| c.label.clone()).collect(),
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
            placeholder: self.widget.placeholder.clone(),
        }
    }
}

/// Wire shape of an async selection input
#[derive(Clone, Debug, Serialize)]
pub struct AsyncSelectProps {
    pub kind: &'static str,
    pub phase: LookupPhase,
    pub display: Option<String>,
    pub labels: Vec<String>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
}

/// Builder for [`AsyncSelectInput`]
pub struct AsyncSelectInputBuilder {
    cell: AnyCell,
    query: QueryFn,
    lookup: Option<LookupFn>,
    disabled: bool,
    label: Option<String>,
    placeholder: Option<String>,
    on_change: Option<ChangeHandler<CellValue>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<CellValue>>,
}

/// Bind an async selection input to a cell and a query source
pub fn async_select_input(cell: &AnyCell, query: QueryFn) -> AsyncSelectInputBuilder {
    AsyncSelectInputBuilder {
        cell: cell.clone(),
        query,
        lookup: None,
        disabled: false,
        label: None,
        placeholder: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl AsyncSelectInputBuilder {
    /// Display lookup source (value → label)
    pub fn lookup(mut self, lookup: LookupFn) -> Self {
        self.lookup = Some(lookup);
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
        F: Fn(&InputWidget<CellValue>) + Send + Sync + 'static,
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
        F: Fn(Option<&CellValue>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<AsyncSelectInput> {
        let ty = self.cell.cell_type();
        if !InputKind::AsyncSelect.supports(ty) || selection::is_many(ty.unwrap_optional().0) {
            return Err(BindError::UnsupportedBinding {
                kind: "asyncselect",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = selection::to_native(&binding.read());

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.placeholder = self.placeholder;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "asyncselect", "input bound");
        Ok(AsyncSelectInput {
            widget,
            binding,
            validator: self.validator,
            query: self.query,
            lookup: self.lookup,
            shared: Arc::new(LookupShared {
                generation: AtomicU64::new(0),
                state: Mutex::new(LookupState {
                    phase: LookupPhase::Idle,
                    options: Vec::new(),
                    display: None,
                    labels: FxHashMap::default(),
                }),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::collections::HashMap;
    use tokio::sync::oneshot;
    use trellis_core::cell::{shared, CellGraph};

    /// Query source whose responses the test resolves by hand
    fn manual_query(
        receivers: Vec<(&'static str, oneshot::Receiver<Vec<Choice>>)>,
    ) -> QueryFn {
        let receivers: Mutex<HashMap<&'static str, oneshot::Receiver<Vec<Choice>>>> =
            Mutex::new(receivers.into_iter().collect());
        Arc::new(move |text: String| {
            let rx = receivers
                .lock()
                .unwrap()
                .remove(text.as_str())
                .expect("unexpected query");
            async move {
                rx.await
                    .map_err(|_| LookupError("query dropped".to_string()))
            }
            .boxed()
        })
    }

    fn choices(labels: &[&str]) -> Vec<Choice> {
        labels
            .iter()
            .map(|l| Choice::new(*l, CellValue::Text(l.to_string())))
            .collect()
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stale_query_response_is_discarded() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::new());

        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        let input = async_select_input(&cell, manual_query(vec![("a", rx_a), ("b", rx_b)]))
            .build(&graph)
            .unwrap();

        input.open("a");
        input.open("b");
        assert_eq!(input.phase(), LookupPhase::Open);
        settle().await;
        assert_eq!(input.phase(), LookupPhase::Loading);

        // resolve A after B superseded it
        tx_a.send(choices(&["alpha"])).unwrap();
        settle().await;
        assert_eq!(input.phase(), LookupPhase::Loading);
        assert!(input.options().is_empty());

        tx_b.send(choices(&["bravo"])).unwrap();
        settle().await;
        assert_eq!(input.phase(), LookupPhase::Resolved);
        let labels: Vec<_> = input.options().iter().map(|c| c.label.clone()).collect();
        assert_eq!(labels, ["bravo"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cancel_supersedes_the_query() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::new());

        let (tx, rx) = oneshot::channel();
        let input = async_select_input(&cell, manual_query(vec![("q", rx)]))
            .build(&graph)
            .unwrap();

        input.open("q");
        input.cancel();
        assert_eq!(input.phase(), LookupPhase::Cancelled);

        tx.send(choices(&["late"])).unwrap();
        settle().await;
        assert_eq!(input.phase(), LookupPhase::Cancelled);
        assert!(input.options().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn select_commits_and_resolves_display() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::new());

        let query: QueryFn = Arc::new(|_| async { Ok(Vec::new()) }.boxed());
        let lookup: LookupFn = Arc::new(|value: CellValue| {
            async move {
                match value {
                    CellValue::Text(s) if s == "us" => {
                        Ok(Some(Choice::new("United States", CellValue::Text(s))))
                    }
                    _ => Ok(None),
                }
            }
            .boxed()
        });

        let mut input = async_select_input(&cell, query)
            .lookup(lookup)
            .build(&graph)
            .unwrap();

        input.select(Some(CellValue::Text("us".into())));
        assert_eq!(input.phase(), LookupPhase::Idle);
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Text("us".into()))
        );
        // blank until the lookup resolves
        assert_eq!(input.display_label(), None);

        settle().await;
        assert_eq!(input.display_label().as_deref(), Some("United States"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cached_labels_skip_the_lookup() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::new());

        let calls = Arc::new(AtomicU64::new(0));
        let calls_in = calls.clone();
        let query: QueryFn = Arc::new(|_| async { Ok(Vec::new()) }.boxed());
        let lookup: LookupFn = Arc::new(move |value: CellValue| {
            calls_in.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(Some(Choice::new("Label", value)))
            }
            .boxed()
        });

        let mut input = async_select_input(&cell, query)
            .lookup(lookup)
            .build(&graph)
            .unwrap();

        input.select(Some(CellValue::Text("x".into())));
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        input.select(Some(CellValue::Text("x".into())));
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(input.display_label().as_deref(), Some("Label"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_lookup_leaves_the_display_blank() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::new());

        let query: QueryFn = Arc::new(|_| async { Ok(Vec::new()) }.boxed());
        let lookup: LookupFn =
            Arc::new(|_| async { Err(LookupError("boom".to_string())) }.boxed());

        let mut input = async_select_input(&cell, query)
            .lookup(lookup)
            .build(&graph)
            .unwrap();

        input.select(Some(CellValue::Text("y".into())));
        settle().await;
        assert_eq!(input.display_label(), None);
        // the committed value is untouched by the failure
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Text("y".into()))
        );
    }
}
