//! QRC Client
//!
//! Thin lifecycle collaborator for the QR code API: create, update and delete
//! calls that report success with the server's representation, or failure.
//!
//! | Operation | Method   | Endpoint              |
//! |-----------|----------|-----------------------|
//! | create    | `POST`   | `/api/qrcodes`        |
//! | update    | `PATCH`  | `/api/qrcodes/{id}`   |
//! | delete    | `DELETE` | `/api/qrcodes/{id}`   |
//!
//! Enable the `mock` feature to get `MockQrCodeApi` in downstream tests.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod error;
pub mod http;

pub use api::QrCodeApi;
#[cfg(any(test, feature = "mock"))]
pub use api::MockQrCodeApi;
pub use error::ClientError;
pub use http::HttpQrCodeClient;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
