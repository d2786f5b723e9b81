//! The lifecycle collaborator consumed by the editor

use crate::error::ClientError;
use async_trait::async_trait;
use qrc_model::{QrCode, QrCodeBody, QrCodeId};

/// Create/update/delete calls against the QR code API
///
/// Success of `create` and `update` yields the full persisted code as the
/// server now holds it; `create` is the only call that assigns an id.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait QrCodeApi: Send + Sync {
    /// `POST` a new code
    async fn create(&self, body: &QrCodeBody) -> Result<QrCode, ClientError>;

    /// `PATCH` an existing code
    async fn update(&self, id: &QrCodeId, body: &QrCodeBody) -> Result<QrCode, ClientError>;

    /// `DELETE` an existing code
    async fn delete(&self, id: &QrCodeId) -> Result<(), ClientError>;
}
