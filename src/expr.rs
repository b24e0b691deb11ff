#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Evaluates reactive expressions against a scope.
///
/// Both methods return `None` when the value cannot be produced; the node then
/// renders with its static text, or unconditionally.
pub trait Evaluator: Send + Sync {
    fn eval_text(&self, expression: &str, scope: u32) -> Option<String>;
    fn eval_condition(&self, expression: &str, scope: u32) -> Option<bool>;
}

/// Renders the node only while `expression` evaluates to `when`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Condition {
    pub expression: String,
    pub when: bool,
}

impl Condition {
    pub fn new(expression: impl Into<String>, when: bool) -> Self {
        Self {
            expression: expression.into(),
            when,
        }
    }

    /// Shorthand for `Condition::new(expression, true)`.
    pub fn when_true(expression: impl Into<String>) -> Self {
        Self::new(expression, true)
    }

    /// `false` only when the evaluator is present, produces a value, and that
    /// value differs from `when`.
    pub(crate) fn allows(&self, evaluator: Option<&dyn Evaluator>, scope: u32) -> bool {
        match evaluator.and_then(|e| e.eval_condition(&self.expression, scope)) {
            Some(value) => value == self.when,
            None => true,
        }
    }
}
