//! Widget records
//!
//! An [`InputWidget<T>`] is the declarative value handed to the
//! presentation layer: the current native value, nullability, the
//! disabled/invalid display flags, and the caller's handler slots. Commits
//! replace the record instead of mutating it, which keeps change detection
//! a pointer-or-field comparison for the host runtime.

use std::fmt;
use std::sync::Arc;

/// Change handler, called with the post-commit widget
///
/// By the time the handler runs, `invalid` already reflects the commit
/// that triggered it.
pub type ChangeHandler<T> = Arc<dyn Fn(&InputWidget<T>) + Send + Sync>;

/// Blur handler
pub type BlurHandler = Arc<dyn Fn() + Send + Sync>;

/// Caller-supplied validator, run after the kind validator
pub type ValidatorFn<T> = Arc<dyn Fn(Option<&T>) -> trellis_core::Validity + Send + Sync>;

/// One editing control, parameterized by its native value type
///
/// `value` is `None` only for nullable bindings ("absent"); a non-nullable
/// widget always carries `Some`.
pub struct InputWidget<T> {
    /// Current native value; `None` = absent
    pub value: Option<T>,
    /// Whether the bound type is optional
    pub nullable: bool,
    /// Whether the control accepts edits
    pub disabled: bool,
    /// Validation message from the last commit; `None` = valid
    pub invalid: Option<String>,
    /// Display label
    pub label: Option<String>,
    /// Secondary display text
    pub description: Option<String>,
    /// Hint shown while empty
    pub placeholder: Option<String>,
    pub(crate) on_change: Option<ChangeHandler<T>>,
    pub(crate) on_blur: Option<BlurHandler>,
}

impl<T: Clone> Clone for InputWidget<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            nullable: self.nullable,
            disabled: self.disabled,
            invalid: self.invalid.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            placeholder: self.placeholder.clone(),
            on_change: self.on_change.clone(),
            on_blur: self.on_blur.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for InputWidget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputWidget")
            .field("value", &self.value)
            .field("nullable", &self.nullable)
            .field("disabled", &self.disabled)
            .field("invalid", &self.invalid)
            .field("label", &self.label)
            .finish()
    }
}

impl<T> InputWidget<T> {
    pub(crate) fn new(value: Option<T>, nullable: bool) -> Self {
        Self {
            value,
            nullable,
            disabled: false,
            invalid: None,
            label: None,
            description: None,
            placeholder: None,
            on_change: None,
            on_blur: None,
        }
    }

    /// Whether the last commit validated cleanly
    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }

    pub(crate) fn fire_change(&self) {
        if let Some(handler) = &self.on_change {
            handler(self);
        }
    }

    pub(crate) fn fire_blur(&self) {
        if let Some(handler) = &self.on_blur {
            handler();
        }
    }
}

impl<T: Clone> InputWidget<T> {
    /// Build the replacement record a commit produces
    pub(crate) fn replaced(&self, value: Option<T>, invalid: Option<String>) -> Self {
        let mut next = self.clone();
        next.value = value;
        next.invalid = invalid;
        next
    }
}
