//! Product records: picker payloads and the denormalized display snapshot

use serde::{Deserialize, Serialize};

/// A product image as the picker and API report it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Full-size source URL
    pub original_src: String,
    /// Alternative text, if the merchant set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// Last-known product title and images
///
/// This is a display cache copied from the picker (or the API's nested
/// `product` object). It is never the authoritative product reference; that
/// lives in the product id, variant id and handle fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDisplay {
    /// Product title
    #[serde(default)]
    pub title: String,
    /// Product images, possibly empty
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl ProductDisplay {
    /// First image, or `None` when the view must draw a placeholder
    #[inline]
    #[must_use]
    pub fn thumbnail(&self) -> Option<&ProductImage> {
        self.images.first()
    }
}

/// A product variant from the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedVariant {
    /// Variant id (often a `gid://shopify/ProductVariant/..` GID)
    pub id: String,
}

/// One product as the picker delivers it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedProduct {
    /// Product id
    pub id: String,
    /// Product title
    pub title: String,
    /// Images, possibly empty
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Storefront handle
    pub handle: String,
    /// Variants in catalog order
    #[serde(default)]
    pub variants: Vec<PickedVariant>,
}

impl PickedProduct {
    /// Display snapshot for this product
    #[must_use]
    pub fn display(&self) -> ProductDisplay {
        ProductDisplay {
            title: self.title.clone(),
            images: self.images.clone(),
        }
    }
}

/// Payload of the picker's selection callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerSelection {
    /// Selected products; the editor accepts exactly one
    pub selection: Vec<PickedProduct>,
}

impl PickerSelection {
    /// Selection holding a single product
    #[must_use]
    pub fn single(product: PickedProduct) -> Self {
        Self {
            selection: vec![product],
        }
    }
}

/// Outcome of one picker interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Operator picked a product
    Selected(PickerSelection),
    /// Operator dismissed the picker
    Cancelled,
}
