//! Validation outcome type
//!
//! Every committed change runs through a kind-specific validator that
//! produces a [`Validity`]. Validation annotates display state; it never
//! blocks the write.

/// Outcome of a validation pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validity {
    /// The value passed validation
    Pass,
    /// The value failed validation, with a message for display
    Fail(String),
}

impl Validity {
    /// Build a failure from any message source
    pub fn fail(message: impl Into<String>) -> Self {
        Validity::Fail(message.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Validity::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Validity::Fail(_))
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Validity::Pass => None,
            Validity::Fail(msg) => Some(msg),
        }
    }

    /// Chain a second validator; the first failure wins
    pub fn and(self, next: impl FnOnce() -> Validity) -> Validity {
        match self {
            Validity::Pass => next(),
            fail => fail,
        }
    }

    /// Move the failure message out, if any
    pub fn into_message(self) -> Option<String> {
        match self {
            Validity::Pass => None,
            Validity::Fail(msg) => Some(msg),
        }
    }
}

impl From<Result<(), String>> for Validity {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Validity::Pass,
            Err(msg) => Validity::Fail(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_keeps_first_failure() {
        let v = Validity::fail("first").and(|| Validity::fail("second"));
        assert_eq!(v.message(), Some("first"));

        let v = Validity::Pass.and(|| Validity::fail("second"));
        assert_eq!(v.message(), Some("second"));

        let v = Validity::Pass.and(|| Validity::Pass);
        assert!(v.is_pass());
    }
}
