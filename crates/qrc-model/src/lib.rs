//! QRC Model
//!
//! Records shared by every layer of the QR code editor.
//!
//! # Core Concepts
//!
//! - [`QrCode`]: the persisted scannable code as the remote API returns it
//! - [`QrCodeBody`]: the create/update request body built from a draft
//! - [`DestinationMode`]: product page or checkout, never both
//! - [`ProductDisplay`]: denormalized product title and images from the picker
//! - [`DiscountSelection`]: a discount id paired with its resolved display code
//!
//! # Example
//!
//! ```rust
//! use qrc_model::{DestinationMode, QrCode};
//!
//! let code: QrCode = serde_json::from_str(
//!     r#"{"id": 7, "title": "Spring", "destination": "checkout"}"#,
//! ).unwrap();
//!
//! assert_eq!(code.id.unwrap().as_str(), "7");
//! assert_eq!(code.destination, DestinationMode::Checkout);
//! ```

#![warn(unreachable_pub)]

mod discount;
mod error;
mod ids;
mod product;
mod qr_code;

pub use discount::DiscountSelection;
pub use error::ModelError;
pub use ids::QrCodeId;
pub use product::{
    PickedProduct, PickedVariant, PickerEvent, PickerSelection, ProductDisplay, ProductImage,
};
pub use qr_code::{DestinationMode, QrCode, QrCodeBody, QrCodeProduct};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
