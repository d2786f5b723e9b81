//! Error types for the draft layer
//!
//! Covers:
//! - Per-field validation failures surfaced to the operator
//! - Picker payloads the editor cannot accept

use std::fmt;

/// Draft field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    /// QR code title
    Title,
    /// Linked product
    ProductId,
    /// Variant of the linked product
    VariantId,
    /// Product handle
    Handle,
    /// Scan destination
    Destination,
    /// Selected discount
    DiscountId,
    /// Code of the selected discount
    DiscountCode,
}

impl FieldName {
    /// Every field, in form order
    pub const ALL: [FieldName; 7] = [
        FieldName::Title,
        FieldName::ProductId,
        FieldName::VariantId,
        FieldName::Handle,
        FieldName::Destination,
        FieldName::DiscountId,
        FieldName::DiscountCode,
    ];

    /// Wire-style name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::ProductId => "productId",
            FieldName::VariantId => "variantId",
            FieldName::Handle => "handle",
            FieldName::Destination => "destination",
            FieldName::DiscountId => "discountId",
            FieldName::DiscountCode => "discountCode",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Offending field
    pub field: FieldName,
    /// Operator-facing message
    pub message: String,
}

/// Picker payloads that cannot be applied to the draft
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Selection did not contain exactly one product
    #[error("expected exactly one product, got {0}")]
    NotSingle(usize),

    /// Product has no variant to link to
    #[error("product {0} has no variants")]
    NoVariants(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_display() {
        let err = FieldError {
            field: FieldName::Title,
            message: "Please name your QR code".to_string(),
        };
        assert_eq!(err.to_string(), "title: Please name your QR code");
    }
}
