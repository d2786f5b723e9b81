//! Testing utilities for QRC workspace
//!
//! Shared fixtures, an in-memory QR code API that records every call, and a
//! canned discount catalog.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use qrc_client::{ClientError, QrCodeApi};
use qrc_discount::{CatalogError, DiscountCatalog, DiscountRecord};
use qrc_model::{
    PickedProduct, PickedVariant, PickerEvent, PickerSelection, ProductImage, QrCode, QrCodeBody,
    QrCodeId, QrCodeProduct,
};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

pub const SHOP_ORIGIN: &str = "https://shop.example.com";

pub fn storefront() -> Url {
    Url::parse(SHOP_ORIGIN).unwrap()
}

pub fn red_shoes() -> PickedProduct {
    PickedProduct {
        id: "gid://shopify/Product/1".to_string(),
        title: "Red Shoes".to_string(),
        images: vec![ProductImage {
            original_src: "https://cdn.example.com/red-shoes.png".to_string(),
            alt_text: Some("Red shoes".to_string()),
        }],
        handle: "red-shoes".to_string(),
        variants: vec![
            PickedVariant {
                id: "gid://shopify/ProductVariant/11".to_string(),
            },
            PickedVariant {
                id: "gid://shopify/ProductVariant/12".to_string(),
            },
        ],
    }
}

pub fn blue_hat() -> PickedProduct {
    PickedProduct {
        id: "gid://shopify/Product/2".to_string(),
        title: "Blue Hat".to_string(),
        images: Vec::new(),
        handle: "blue-hat".to_string(),
        variants: vec![PickedVariant {
            id: "gid://shopify/ProductVariant/21".to_string(),
        }],
    }
}

pub fn pick(product: PickedProduct) -> PickerEvent {
    PickerEvent::Selected(PickerSelection::single(product))
}

/// A saved code pointing at [`red_shoes`]
pub fn persisted_code(id: &str) -> QrCode {
    let product = red_shoes();
    QrCode {
        id: Some(QrCodeId::new(id).unwrap()),
        title: "Shelf display".to_string(),
        product_id: Some(product.id.clone()),
        variant_id: Some(product.variants[0].id.clone()),
        handle: Some(product.handle.clone()),
        product: Some(QrCodeProduct {
            id: Some(product.id.clone()),
            display: product.display(),
        }),
        ..QrCode::default()
    }
}

pub fn discount_page() -> Vec<DiscountRecord> {
    vec![
        DiscountRecord::new("gid://shopify/DiscountCodeNode/1", "SAVE10"),
        DiscountRecord::new("gid://shopify/DiscountCodeNode/2", "FREESHIP"),
        DiscountRecord {
            id: "gid://shopify/DiscountCodeNode/3".to_string(),
            codes: Vec::new(),
        },
    ]
}

/// A call received by [`RecordingApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Create(QrCodeBody),
    Update(QrCodeId, QrCodeBody),
    Delete(QrCodeId),
}

/// In-memory QR code API
///
/// Ids are assigned from 1 upward. Queued failures are returned in order,
/// one per call. A gated API holds every call until [`release`](Self::release)
/// hands out a permit.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    stored: Mutex<BTreeMap<String, QrCode>>,
    failures: Mutex<VecDeque<u16>>,
    next_id: AtomicU64,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Let `n` held calls proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Fail the next call with `status`
    pub fn fail_next(&self, status: u16) {
        self.failures.lock().push_back(status);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn stored(&self, id: &str) -> Option<QrCode> {
        self.stored.lock().get(id).cloned()
    }

    /// Wait until at least `n` calls were received
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..1_000 {
            if self.calls.lock().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("expected {n} calls, got {:?}", self.calls());
    }

    async fn enter(&self, call: ApiCall) -> Result<(), ClientError> {
        self.calls.lock().push(call);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        match self.failures.lock().pop_front() {
            Some(status) => Err(ClientError::Status {
                status,
                message: "injected failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn store(&self, id: QrCodeId, body: &QrCodeBody) -> QrCode {
        let code = QrCode {
            id: Some(id.clone()),
            title: body.title.clone(),
            product_id: Some(body.product_id.clone()),
            variant_id: Some(body.variant_id.clone()),
            handle: Some(body.handle.clone()),
            product: None,
            destination: body.destination,
            discount_id: Some(body.discount_id.clone()).filter(|d| !d.is_empty()),
            discount_code: Some(body.discount_code.clone()).filter(|c| !c.is_empty()),
        };
        self.stored.lock().insert(id.as_str().to_string(), code.clone());
        code
    }
}

#[async_trait]
impl QrCodeApi for RecordingApi {
    async fn create(&self, body: &QrCodeBody) -> Result<QrCode, ClientError> {
        self.enter(ApiCall::Create(body.clone())).await?;
        let next = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = QrCodeId::new(next.to_string()).unwrap();
        Ok(self.store(id, body))
    }

    async fn update(&self, id: &QrCodeId, body: &QrCodeBody) -> Result<QrCode, ClientError> {
        self.enter(ApiCall::Update(id.clone(), body.clone())).await?;
        Ok(self.store(id.clone(), body))
    }

    async fn delete(&self, id: &QrCodeId) -> Result<(), ClientError> {
        self.enter(ApiCall::Delete(id.clone())).await?;
        self.stored.lock().remove(id.as_str());
        Ok(())
    }
}

/// Discount catalog answering from a fixed page
#[derive(Debug, Default)]
pub struct StaticCatalog {
    records: Vec<DiscountRecord>,
    failure: Option<u16>,
    requests: Mutex<Vec<u32>>,
}

impl StaticCatalog {
    pub fn new(records: Vec<DiscountRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            failure: Some(status),
            ..Self::default()
        }
    }

    /// Page sizes requested so far
    pub fn requests(&self) -> Vec<u32> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DiscountCatalog for StaticCatalog {
    async fn code_discounts(&self, first: u32) -> Result<Vec<DiscountRecord>, CatalogError> {
        self.requests.lock().push(first);
        if let Some(status) = self.failure {
            return Err(CatalogError::Status {
                status,
                message: "catalog unavailable".to_string(),
            });
        }
        Ok(self.records.iter().take(first as usize).cloned().collect())
    }
}
