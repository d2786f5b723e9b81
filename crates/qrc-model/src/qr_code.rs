//! The persisted QR code entity and its request body

use crate::error::ModelError;
use crate::ids::QrCodeId;
use crate::product::ProductDisplay;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where a scan lands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationMode {
    /// Storefront product page
    #[default]
    Product,
    /// Cart/checkout with the variant added
    Checkout,
}

impl DestinationMode {
    /// Both modes, in display order
    pub const ALL: [DestinationMode; 2] = [DestinationMode::Product, DestinationMode::Checkout];

    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationMode::Product => "product",
            DestinationMode::Checkout => "checkout",
        }
    }

    /// Label shown next to the choice
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DestinationMode::Product => "Link to product page",
            DestinationMode::Checkout => "Link to checkout page with product in the cart",
        }
    }
}

impl FromStr for DestinationMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(DestinationMode::Product),
            "checkout" => Ok(DestinationMode::Checkout),
            other => Err(ModelError::UnknownDestination(other.to_string())),
        }
    }
}

impl std::fmt::Display for DestinationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested product object some API responses carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeProduct {
    /// Product id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title and images
    #[serde(flatten)]
    pub display: ProductDisplay,
}

/// A scannable code as last confirmed by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    /// Absent until the first successful create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QrCodeId>,
    /// Merchant-facing title
    #[serde(default)]
    pub title: String,
    /// Product id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Variant id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    /// Storefront handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Denormalized product display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<QrCodeProduct>,
    /// Scan destination
    #[serde(default)]
    pub destination: DestinationMode,
    /// Discount catalog reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_id: Option<String>,
    /// Cached display code for `discount_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

impl QrCode {
    /// Product id, falling back to the nested `product.id`
    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        self.product_id
            .as_deref()
            .or_else(|| self.product.as_ref().and_then(|p| p.id.as_deref()))
            .filter(|id| !id.is_empty())
    }

    /// Product display snapshot, if the server sent one
    #[must_use]
    pub fn product_display(&self) -> Option<&ProductDisplay> {
        self.product.as_ref().map(|p| &p.display)
    }

    /// Whether the server has assigned an id
    #[inline]
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Create/update request body
///
/// The destination is a single value, not a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeBody {
    /// Title
    pub title: String,
    /// Product id
    pub product_id: String,
    /// Variant id
    pub variant_id: String,
    /// Storefront handle
    pub handle: String,
    /// Discount id, empty for none
    pub discount_id: String,
    /// Discount display code, empty for none
    pub discount_code: String,
    /// Scan destination
    pub destination: DestinationMode,
}
