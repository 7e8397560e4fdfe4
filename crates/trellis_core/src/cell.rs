//! State cell store
//!
//! A [`CellGraph`] owns the mutable state cells a view binds inputs to.
//! Cells are created with a declared [`CellType`] that never changes; every
//! write is checked against it and bumps a version counter so widgets can
//! re-synchronize cheaply. Watchers get a synchronous callback after each
//! write.
//!
//! Handles come in three strengths, mirroring how much the caller knows
//! statically:
//! - [`AnyCell`] — type-erased, carries the declared type tag
//! - [`TypedCell<T>`] — statically typed, used against a `&CellGraph`
//! - [`StateCell<T>`] — typed handle plus a shared graph, with direct
//!   `get`/`set` (the convenience wrapper bindings hand out)
//!
//! ```
//! use trellis_core::cell::CellGraph;
//!
//! let mut graph = CellGraph::new();
//! let cell = graph.create(0u8);
//! let typed = cell.typed::<u8>().unwrap();
//! typed.set(&mut graph, 7).unwrap();
//! assert_eq!(typed.get(&graph), Some(7));
//! ```

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::trace;

use crate::bind::CellBind;
use crate::error::{BindError, Result};
use crate::value::{CellType, CellValue};

new_key_type! {
    /// Unique identifier for a cell
    pub struct CellId;
    /// Unique identifier for a watcher registration
    pub struct WatcherId;
}

/// Callback invoked after a cell's value changes
pub type WatchFn = Arc<dyn Fn(&CellValue) + Send + Sync>;

/// Internal cell storage
struct CellNode {
    /// Declared type; fixed at creation
    ty: CellType,
    /// Current value; always admitted by `ty`
    value: CellValue,
    /// Bumped on every write
    version: u64,
    /// Watchers to notify on change
    watchers: SmallVec<[WatcherId; 2]>,
}

struct WatcherNode {
    cell: CellId,
    notify: WatchFn,
}

/// The store of state cells for one logical view
pub struct CellGraph {
    cells: SlotMap<CellId, CellNode>,
    watchers: SlotMap<WatcherId, WatcherNode>,
}

impl CellGraph {
    pub fn new() -> Self {
        Self {
            cells: SlotMap::with_key(),
            watchers: SlotMap::with_key(),
        }
    }

    /// Create a cell from a statically typed initial value
    pub fn create<T: CellBind>(&mut self, initial: T) -> AnyCell {
        let ty = T::cell_type();
        let value = initial.into_value();
        debug_assert!(ty.admits(&value));
        let id = self.cells.insert(CellNode {
            ty: ty.clone(),
            value,
            version: 0,
            watchers: SmallVec::new(),
        });
        AnyCell { id, ty }
    }

    /// Create a cell from a runtime type tag and initial value
    ///
    /// Fails when the declared type does not admit the initial value.
    pub fn create_raw(&mut self, ty: CellType, initial: CellValue) -> Result<AnyCell> {
        if !ty.admits(&initial) {
            return Err(BindError::ValueRejected {
                ty,
                value: initial.kind_name(),
            });
        }
        let id = self.cells.insert(CellNode {
            ty: ty.clone(),
            value: initial,
            version: 0,
            watchers: SmallVec::new(),
        });
        Ok(AnyCell { id, ty })
    }

    /// Current value of a cell
    pub fn get(&self, cell: &AnyCell) -> Option<CellValue> {
        self.cells.get(cell.id).map(|node| node.value.clone())
    }

    /// Write a value, bump the version, and notify watchers
    ///
    /// The declared type must admit the value; no conversion happens at
    /// this layer. Watchers run synchronously after the write and must not
    /// call back into a shared handle of the same graph.
    pub fn set(&mut self, cell: &AnyCell, value: CellValue) -> Result<()> {
        let node = self
            .cells
            .get_mut(cell.id)
            .ok_or_else(|| BindError::ValueRejected {
                ty: cell.ty.clone(),
                value: "detached",
            })?;
        if !node.ty.admits(&value) {
            return Err(BindError::ValueRejected {
                ty: node.ty.clone(),
                value: value.kind_name(),
            });
        }
        node.value = value;
        node.version += 1;
        trace!(cell = ?cell.id, version = node.version, "cell write");

        let to_notify: SmallVec<[WatcherId; 2]> = node.watchers.clone();
        let value = node.value.clone();
        for watcher_id in to_notify {
            if let Some(watcher) = self.watchers.get(watcher_id) {
                (watcher.notify)(&value);
            }
        }
        Ok(())
    }

    /// Declared type of a cell
    pub fn cell_type(&self, id: CellId) -> Option<&CellType> {
        self.cells.get(id).map(|node| &node.ty)
    }

    /// Write version of a cell (for cheap change detection)
    pub fn version(&self, id: CellId) -> Option<u64> {
        self.cells.get(id).map(|node| node.version)
    }

    /// Register a change watcher on a cell
    pub fn watch(&mut self, cell: &AnyCell, notify: WatchFn) -> WatcherId {
        let id = self.watchers.insert(WatcherNode {
            cell: cell.id,
            notify,
        });
        if let Some(node) = self.cells.get_mut(cell.id) {
            node.watchers.push(id);
        }
        id
    }

    /// Remove a watcher registration
    pub fn unwatch(&mut self, watcher: WatcherId) {
        if let Some(node) = self.watchers.remove(watcher) {
            if let Some(cell) = self.cells.get_mut(node.cell) {
                cell.watchers.retain(|w| *w != watcher);
            }
        }
    }

    /// Tear a cell down when its owning view no longer references it
    pub fn remove(&mut self, cell: &AnyCell) {
        if let Some(node) = self.cells.remove(cell.id) {
            for watcher in node.watchers {
                self.watchers.remove(watcher);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for CellGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared cell graph for handle-based access
pub type SharedCellGraph = Arc<Mutex<CellGraph>>;

/// Wrap a graph for sharing
pub fn shared(graph: CellGraph) -> SharedCellGraph {
    Arc::new(Mutex::new(graph))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handles
// ─────────────────────────────────────────────────────────────────────────────

/// Non-owning, type-erased handle to exactly one cell
///
/// The reported type tag is fixed at creation and cached on the handle, so
/// reading it never requires the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct AnyCell {
    id: CellId,
    ty: CellType,
}

impl AnyCell {
    pub fn id(&self) -> CellId {
        self.id
    }

    /// The cell's declared value type
    pub fn cell_type(&self) -> &CellType {
        &self.ty
    }

    /// Narrow to a statically typed handle
    ///
    /// Fails with [`BindError::TypeMismatch`] when `T` does not bind to the
    /// declared type. Callers that do not know the type statically read
    /// [`cell_type`](Self::cell_type) first.
    pub fn typed<T: CellBind>(&self) -> Result<TypedCell<T>> {
        let expected = T::cell_type();
        if expected != self.ty {
            return Err(BindError::TypeMismatch {
                expected,
                actual: self.ty.clone(),
            });
        }
        Ok(TypedCell {
            id: self.id,
            _marker: PhantomData,
        })
    }
}

/// Statically typed handle to a cell (cheap to copy)
#[derive(Debug)]
pub struct TypedCell<T> {
    id: CellId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedCell<T> {}

impl<T: CellBind> TypedCell<T> {
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Current value, statically typed
    pub fn get(&self, graph: &CellGraph) -> Option<T> {
        graph
            .cells
            .get(self.id)
            .and_then(|node| T::from_value(&node.value))
    }

    /// Write a statically typed value
    pub fn set(&self, graph: &mut CellGraph, value: T) -> Result<()> {
        let ty = graph
            .cell_type(self.id)
            .cloned()
            .unwrap_or_else(T::cell_type);
        let any = AnyCell { id: self.id, ty };
        graph.set(&any, value.into_value())
    }
}

/// A typed cell bundled with its shared graph
///
/// This is the handle bindings hand out: direct `get`/`set` without the
/// caller threading the graph through.
#[derive(Clone)]
pub struct StateCell<T> {
    cell: TypedCell<T>,
    any: AnyCell,
    graph: SharedCellGraph,
}

impl<T: CellBind + Clone> StateCell<T> {
    /// Create a fresh cell in the shared graph
    pub fn create(graph: &SharedCellGraph, initial: T) -> Self {
        let any = graph.lock().unwrap().create(initial);
        let cell = any.typed::<T>().expect("freshly created cell");
        Self {
            cell,
            any,
            graph: graph.clone(),
        }
    }

    /// Adopt an existing cell; fails when the declared type differs
    pub fn from_any(graph: &SharedCellGraph, any: &AnyCell) -> Result<Self> {
        let cell = any.typed::<T>()?;
        Ok(Self {
            cell,
            any: any.clone(),
            graph: graph.clone(),
        })
    }

    /// Current value, or `None` if the cell was torn down
    pub fn try_get(&self) -> Option<T> {
        self.cell.get(&self.graph.lock().unwrap())
    }

    /// Current value
    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.try_get().unwrap_or_default()
    }

    /// Write a new value
    pub fn set(&self, value: T) -> Result<()> {
        self.cell.set(&mut self.graph.lock().unwrap(), value)
    }

    /// Update the value through a function
    pub fn update(&self, f: impl FnOnce(T) -> T) -> Result<()> {
        if let Some(current) = self.try_get() {
            self.set(f(current))?;
        }
        Ok(())
    }

    /// Register a change watcher
    pub fn watch(&self, notify: WatchFn) -> WatcherId {
        self.graph.lock().unwrap().watch(&self.any, notify)
    }

    /// The type-erased handle for this cell
    pub fn any(&self) -> &AnyCell {
        &self.any
    }

    pub fn graph(&self) -> &SharedCellGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::IntType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn create_get_set() {
        let mut graph = CellGraph::new();
        let cell = graph.create(42i32);
        assert_eq!(cell.cell_type(), &CellType::Int(IntType::I32));
        assert_eq!(graph.get(&cell), Some(CellValue::Int(42)));

        graph.set(&cell, CellValue::Int(7)).unwrap();
        assert_eq!(graph.get(&cell), Some(CellValue::Int(7)));
    }

    #[test]
    fn set_rejects_wrong_category() {
        let mut graph = CellGraph::new();
        let cell = graph.create(true);
        let err = graph.set(&cell, CellValue::Int(1)).unwrap_err();
        assert!(matches!(err, BindError::ValueRejected { .. }));
        // the declared type and value are untouched
        assert_eq!(graph.get(&cell), Some(CellValue::Bool(true)));
    }

    #[test]
    fn typed_narrowing_checks_declared_type() {
        let mut graph = CellGraph::new();
        let cell = graph.create(1.5f64);
        assert!(cell.typed::<f64>().is_ok());
        let err = cell.typed::<bool>().unwrap_err();
        assert!(matches!(err, BindError::TypeMismatch { .. }));
    }

    #[test]
    fn versions_bump_on_write() {
        let mut graph = CellGraph::new();
        let cell = graph.create(0u8);
        assert_eq!(graph.version(cell.id()), Some(0));
        graph.set(&cell, CellValue::Int(1)).unwrap();
        graph.set(&cell, CellValue::Int(2)).unwrap();
        assert_eq!(graph.version(cell.id()), Some(2));
    }

    #[test]
    fn watchers_fire_on_set_and_stop_after_unwatch() {
        let mut graph = CellGraph::new();
        let cell = graph.create(0i64);
        let count = Arc::new(AtomicUsize::new(0));
        let count_in = count.clone();
        let watcher = graph.watch(
            &cell,
            Arc::new(move |_| {
                count_in.fetch_add(1, Ordering::SeqCst);
            }),
        );

        graph.set(&cell, CellValue::Int(1)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        graph.unwatch(watcher);
        graph.set(&cell, CellValue::Int(2)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn state_cell_round_trip() {
        let graph = shared(CellGraph::new());
        let cell = StateCell::create(&graph, String::from("hello"));
        assert_eq!(cell.get(), "hello");
        cell.set(String::from("world")).unwrap();
        assert_eq!(cell.get(), "world");
        cell.update(|s| s + "!").unwrap();
        assert_eq!(cell.get(), "world!");
    }

    #[test]
    fn state_cell_adoption_requires_matching_type() {
        let graph = shared(CellGraph::new());
        let any = graph.lock().unwrap().create(5u8);
        assert!(StateCell::<u8>::from_any(&graph, &any).is_ok());
        assert!(StateCell::<i32>::from_any(&graph, &any).is_err());
    }

    #[test]
    fn two_handles_last_write_wins() {
        let graph = shared(CellGraph::new());
        let any = graph.lock().unwrap().create(0i32);
        let a = StateCell::<i32>::from_any(&graph, &any).unwrap();
        let b = StateCell::<i32>::from_any(&graph, &any).unwrap();
        a.set(1).unwrap();
        b.set(2).unwrap();
        assert_eq!(a.get(), 2);
    }

    #[test]
    fn remove_tears_down_watchers() {
        let mut graph = CellGraph::new();
        let cell = graph.create(0i32);
        let _w = graph.watch(&cell, Arc::new(|_| {}));
        graph.remove(&cell);
        assert!(graph.is_empty());
        assert_eq!(graph.get(&cell), None);
    }
}
