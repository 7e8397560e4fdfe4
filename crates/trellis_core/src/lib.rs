//! Trellis Core
//!
//! Foundational primitives for the Trellis input-binding engine:
//!
//! - **Cell store**: runtime-typed mutable state cells with change
//!   notification, owned by a view and borrowed by bindings
//! - **Closed value model**: every bindable value and type is a case of a
//!   closed sum, so narrowing and supported-type checks are pattern
//!   matches rather than reflective downcasts
//! - **Binding errors**: the two fatal failure modes (unsupported binding,
//!   type mismatch) plus the palette configuration error
//! - **Validity**: the two-case validation outcome the commit pipeline
//!   produces before any user callback runs
//!
//! # Example
//!
//! ```
//! use trellis_core::cell::{shared, CellGraph, StateCell};
//!
//! let graph = shared(CellGraph::new());
//!
//! // A statically typed cell
//! let volume = StateCell::create(&graph, 0.5f64);
//! volume.set(0.8).unwrap();
//! assert_eq!(volume.get(), 0.8);
//!
//! // Its type-erased handle reports the declared type forever
//! let any = volume.any().clone();
//! assert!(any.typed::<f64>().is_ok());
//! assert!(any.typed::<bool>().is_err());
//! ```

pub mod bind;
pub mod cell;
pub mod error;
pub mod validity;
pub mod value;

pub use bind::{CellBind, CssColor};
pub use cell::{
    shared, AnyCell, CellGraph, CellId, SharedCellGraph, StateCell, TypedCell, WatchFn, WatcherId,
};
pub use error::{BindError, Result};
pub use validity::Validity;
pub use value::{
    CellType, CellValue, ColorType, ColorValue, DateType, DateValue, EnumShape, FileMeta,
    FloatType, IntType, PaletteColor,
};
