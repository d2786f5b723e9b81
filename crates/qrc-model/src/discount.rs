//! Discount selection value

/// A discount id together with the display code it resolved to
///
/// An empty id is the "No discount" choice. `code` is `None` whenever the id
/// could not be resolved against the current catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountSelection {
    id: String,
    code: Option<String>,
}

impl DiscountSelection {
    /// The "No discount" choice
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A discount id with its resolved code (or `None` when unresolved)
    #[must_use]
    pub fn new(id: impl Into<String>, code: Option<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            return Self::none();
        }
        Self { id, code }
    }

    /// Selected id, empty for "No discount"
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolved display code
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Whether this is the "No discount" choice
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.id.is_empty()
    }
}
