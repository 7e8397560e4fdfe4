//! Trellis Inputs
//!
//! The input-binding engine: give it a type-erased state cell and a
//! widget kind, and it produces a strongly-behaved editing component —
//! selecting the widget's native editing type, converting values both
//! ways between that native type and the cell's declared type, tracking
//! nullability, and running validation before any user callback fires.
//!
//! - **Kinds**: the closed set of widget families and their presentation
//!   variants
//! - **Conversion tables**: per-family total mappings between native and
//!   bound types, including the documented absent-value defaults
//! - **Factory**: supported-type checking and closed-enumeration dispatch
//! - **Pipeline**: the structural validate-then-notify commit path
//! - **Async lookup**: query/lookup selection with generation-token
//!   supersession
//!
//! # Example
//!
//! ```
//! use trellis_core::cell::{shared, CellGraph};
//! use trellis_inputs::prelude::*;
//!
//! let graph = shared(CellGraph::new());
//! let age = graph.lock().unwrap().create(30u8);
//!
//! let mut input = number_input(&age).label("Age").build(&graph).unwrap();
//! assert_eq!(input.meta().max, 255.0);
//!
//! // an out-of-range edit clamps into the byte range
//! input.commit(Some(999.0));
//! assert_eq!(input.widget().value, Some(255.0));
//! ```

pub mod convert;
pub mod factory;
pub mod inputs;
pub mod kind;
pub mod options;
pub(crate) mod pipeline;
pub mod widget;

pub use factory::{create_input, AnyInput, KindOptions};
pub use kind::{
    BoolVariant, DateTimeVariant, FeedbackVariant, InputKind, NumberVariant, SelectVariant,
    TextVariant,
};
pub use options::{Choice, OptionSet};
pub use widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::factory::{create_input, AnyInput, KindOptions};
    pub use crate::inputs::{
        async_select_input, bool_input, code_input, color_input, daterange_input, datetime_input,
        feedback_input, file_input, number_input, select_input, text_input,
    };
    pub use crate::kind::{
        BoolVariant, DateTimeVariant, FeedbackVariant, InputKind, NumberVariant, SelectVariant,
        TextVariant,
    };
    pub use crate::options::{Choice, OptionSet};
    pub use crate::widget::InputWidget;
    pub use trellis_core::{BindError, Validity};
}
