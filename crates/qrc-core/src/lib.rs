//! QRC Core - QR code edit/save controller
//!
//! Ties the draft, the product picker, the discount catalog and the QR code
//! API together behind one controller:
//! - Tracks whether the draft differs from the persisted code
//! - Validates locally before any request is made
//! - Creates or updates based on the id held at dispatch time
//! - Builds the storefront URL a scan opens
//!
//! # Example
//!
//! ```rust,ignore
//! use qrc_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EditorConfig::from_file("qrc.toml")?;
//! let api = Arc::new(HttpQrCodeClient::new(config.api_base_url()?, config.request_timeout())?);
//! let editor = QrCodeEditor::mount(api, None, &config)?;
//!
//! editor.set_title("Window sticker");
//! // product chosen through the picker ...
//! let outcome = editor.submit().await?;
//! println!("saved {:?}", outcome.id());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod destination;
pub mod editor;
pub mod error;
pub mod state_machine;
pub mod view;

// Re-exports for convenience
pub use config::EditorConfig;
pub use destination::{checkout_url, destination_url, numeric_id, product_url, DestinationRequest};
pub use editor::{Navigation, QrCodeEditor, SubmitHandle, SubmitOutcome};
pub use error::{ConfigError, DeleteError, EditError, SaveError, TransitionError};
pub use state_machine::{allowed_transitions, validate_transition, EditPhase};
pub use view::{
    ActionView, DestinationChoice, DiscountView, EditorView, ProductView, TextFieldView,
    CHANGE_PRODUCT_LABEL, IMAGE_PENDING_MESSAGE, SELECT_PRODUCT_LABEL,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving an editor
    pub use crate::{
        DeleteError, EditPhase, EditorConfig, EditorView, Navigation, QrCodeEditor, SaveError,
        SubmitHandle, SubmitOutcome,
    };
    pub use qrc_client::{HttpQrCodeClient, QrCodeApi};
    pub use qrc_discount::{DiscountCatalog, GraphqlDiscountCatalog};
    pub use qrc_model::{DestinationMode, PickerEvent, PickerSelection, QrCode, QrCodeId};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
