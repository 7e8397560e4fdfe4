//! Binding error types

use thiserror::Error;

use crate::value::CellType;

/// Errors that abort a binding operation
///
/// Only programmer errors live here. Recoverable conditions (out-of-range
/// numeric writes, validation failures, lookup failures) never surface as
/// `Err`: writes clamp, validation annotates the widget, and a failed
/// lookup leaves the display blank.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// The requested input kind cannot edit cells of this type
    #[error("input kind `{kind}` does not support cells of type {ty}")]
    UnsupportedBinding { kind: &'static str, ty: CellType },

    /// A type-erased cell was narrowed to the wrong static type
    #[error("expected cell of type {expected}, found {actual}")]
    TypeMismatch { expected: CellType, actual: CellType },

    /// A write offered a value the cell's declared type does not admit
    #[error("cell of type {ty} rejects {value} value")]
    ValueRejected { ty: CellType, value: &'static str },

    /// A palette name with no entry in the palette table
    #[error("palette entry `{0}` has no mapping")]
    UnmappedPalette(String),
}

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, BindError>;
