//! QRC Draft
//!
//! The editable side of a QR code: typed fields validated independently,
//! dirtiness computed against the last committed values, and the bridge that
//! turns a product picker result into one coordinated draft update.
//!
//! # Example
//!
//! ```rust
//! use qrc_draft::{DraftFields, ProductSelector};
//! use qrc_model::{PickedProduct, PickedVariant, PickerEvent, PickerSelection};
//!
//! let mut draft = DraftFields::empty();
//! assert!(!draft.validate());
//!
//! let mut selector = ProductSelector::default();
//! selector.open();
//! let product = PickedProduct {
//!     id: "p1".into(),
//!     title: "Red Shoes".into(),
//!     images: vec![],
//!     handle: "red-shoes".into(),
//!     variants: vec![PickedVariant { id: "v1".into() }],
//! };
//! selector
//!     .apply(&mut draft, PickerEvent::Selected(PickerSelection::single(product)))
//!     .unwrap();
//!
//! draft.title_mut().set("Window sticker".into());
//! assert!(draft.validate());
//! assert!(draft.is_dirty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod draft;
pub mod error;
pub mod field;
pub mod selector;

pub use draft::{DraftFields, DraftValues, PRODUCT_REQUIRED, TITLE_REQUIRED};
pub use error::{FieldError, FieldName, SelectionError};
pub use field::{not_blank, Field, Validator};
pub use selector::{ProductSelector, SelectionOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
