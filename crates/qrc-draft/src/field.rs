//! A single draft field with its committed snapshot and validators

use std::fmt;
use std::sync::Arc;

/// Validation rule returning an error message on failure
pub struct Validator<T>(Arc<dyn Fn(&T) -> Option<String> + Send + Sync>);

impl<T> Validator<T> {
    /// Wrap a rule
    pub fn new(rule: impl Fn(&T) -> Option<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(rule))
    }

    /// Run the rule against a value
    #[inline]
    #[must_use]
    pub fn check(&self, value: &T) -> Option<String> {
        (self.0)(value)
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(message: impl Into<String>) -> Validator<String> {
    let message = message.into();
    Validator::new(move |value: &String| value.trim().is_empty().then(|| message.clone()))
}

/// Editable value tracked against its last committed value
///
/// # Invariants
/// - `is_dirty()` is exactly `value != committed`
/// - `error` is only set by `validate()` and cleared by any mutation
#[derive(Debug, Clone)]
pub struct Field<T> {
    value: T,
    committed: T,
    error: Option<String>,
    validators: Vec<Validator<T>>,
}

impl<T: Clone + PartialEq> Field<T> {
    /// Field whose value and committed snapshot are both `value`
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            committed: value.clone(),
            value,
            error: None,
            validators: Vec::new(),
        }
    }

    /// Attach a validator
    #[must_use]
    pub fn with_validator(mut self, validator: Validator<T>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Value at the last load or save
    #[inline]
    #[must_use]
    pub fn committed(&self) -> &T {
        &self.committed
    }

    /// Message from the last failed validation
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the value; returns whether it changed
    pub fn set(&mut self, value: T) -> bool {
        self.error = None;
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Restore the committed value and clear the error
    pub fn reset(&mut self) {
        self.value = self.committed.clone();
        self.error = None;
    }

    /// Whether the value differs from the committed snapshot
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.value != self.committed
    }

    /// Run every validator, keeping the first failure as the field error
    pub fn validate(&mut self) -> bool {
        self.error = self.validators.iter().find_map(|v| v.check(&self.value));
        self.error.is_none()
    }

    /// Make `value` both current and committed
    pub fn seed(&mut self, value: T) {
        self.committed = value.clone();
        self.value = value;
        self.error = None;
    }
}
