//! Input families
//!
//! One module per widget family, each following the same shape: a bound
//! input holding the widget record and its cell binding, a fluent builder,
//! and a free constructor function. All commits run through the shared
//! pipeline in [`crate::pipeline`].

pub mod async_select;
pub mod boolean;
pub mod code;
pub mod color;
pub mod datetime;
pub mod feedback;
pub mod file;
pub mod number;
pub mod select;
pub mod text;

pub use async_select::{
    async_select_input, AsyncSelectInput, AsyncSelectInputBuilder, LookupError, LookupFn,
    LookupPhase, QueryFn,
};
pub use boolean::{bool_input, BoolInput, BoolInputBuilder};
pub use code::{code_input, CodeInput, CodeInputBuilder};
pub use color::{color_input, ColorInput, ColorInputBuilder};
pub use datetime::{
    daterange_input, datetime_input, DateRangeInput, DateRangeInputBuilder, DateTimeInput,
    DateTimeInputBuilder,
};
pub use feedback::{feedback_input, FeedbackInput, FeedbackInputBuilder};
pub use file::{file_input, FileInput, FileInputBuilder};
pub use number::{number_input, NumberInput, NumberInputBuilder};
pub use select::{select_input, MultiSelectInput, SelectInput, SelectInputBuilder};
pub use text::{text_input, TextInput, TextInputBuilder};
