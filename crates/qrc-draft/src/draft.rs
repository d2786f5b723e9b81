//! The draft field set
//!
//! Holds the editable copy of a [`QrCode`] plus the ephemeral product display
//! snapshot. No I/O happens here.

use crate::error::{FieldError, FieldName};
use crate::field::{not_blank, Field};
use qrc_model::{DestinationMode, DiscountSelection, PickedProduct, ProductDisplay, QrCode, QrCodeBody};

/// Message shown when the title is blank
pub const TITLE_REQUIRED: &str = "Please name your QR code";
/// Message shown when no product is selected
pub const PRODUCT_REQUIRED: &str = "Please select a product";

/// Plain snapshot of every draft value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftValues {
    /// Name shown to store staff
    pub title: String,
    /// Linked product, empty until one is picked
    pub product_id: String,
    /// First variant of the linked product
    pub variant_id: String,
    /// Storefront handle of the linked product
    pub handle: String,
    /// Where a scan lands
    pub destination: DestinationMode,
    /// Selected discount, empty for none
    pub discount_id: String,
    /// Code for `discount_id`, empty when unresolved
    pub discount_code: String,
    /// Title and images of the linked product
    pub selected_product: Option<ProductDisplay>,
}

impl DraftValues {
    /// Values a draft seeded from `code` starts with
    #[must_use]
    pub fn from_entity(code: &QrCode) -> Self {
        Self {
            title: code.title.clone(),
            product_id: code.product_id().unwrap_or_default().to_string(),
            variant_id: code.variant_id.clone().unwrap_or_default(),
            handle: code.handle.clone().unwrap_or_default(),
            destination: code.destination,
            discount_id: code.discount_id.clone().unwrap_or_default(),
            discount_code: code.discount_code.clone().unwrap_or_default(),
            selected_product: code.product_display().cloned(),
        }
    }
}

/// Editable fields of one QR code
///
/// `product_id`, `variant_id` and `handle` are the authoritative product
/// reference. `selected_product` is only the last-known display data and is
/// excluded from dirtiness and from the request body.
#[derive(Debug, Clone)]
pub struct DraftFields {
    title: Field<String>,
    product_id: Field<String>,
    variant_id: Field<String>,
    handle: Field<String>,
    destination: Field<DestinationMode>,
    discount_id: Field<String>,
    discount_code: Field<String>,
    selected_product: Option<ProductDisplay>,
    committed_product: Option<ProductDisplay>,
}

impl Default for DraftFields {
    fn default() -> Self {
        Self::from_values(DraftValues::default())
    }
}

impl DraftFields {
    /// Draft for a new code: blank title, no product, product destination, no discount
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Draft seeded from a persisted code
    #[must_use]
    pub fn from_entity(code: &QrCode) -> Self {
        Self::from_values(DraftValues::from_entity(code))
    }

    fn from_values(values: DraftValues) -> Self {
        Self {
            title: Field::new(values.title).with_validator(not_blank(TITLE_REQUIRED)),
            product_id: Field::new(values.product_id).with_validator(not_blank(PRODUCT_REQUIRED)),
            variant_id: Field::new(values.variant_id),
            handle: Field::new(values.handle),
            destination: Field::new(values.destination),
            discount_id: Field::new(values.discount_id),
            discount_code: Field::new(values.discount_code),
            committed_product: values.selected_product.clone(),
            selected_product: values.selected_product,
        }
    }

    /// Title field
    pub fn title(&self) -> &Field<String> {
        &self.title
    }

    /// Title field, for edits
    pub fn title_mut(&mut self) -> &mut Field<String> {
        &mut self.title
    }

    /// Product reference; set only through the picker
    pub fn product_id(&self) -> &Field<String> {
        &self.product_id
    }

    /// Variant reference; set with the product
    pub fn variant_id(&self) -> &Field<String> {
        &self.variant_id
    }

    /// Product handle; set with the product
    pub fn handle(&self) -> &Field<String> {
        &self.handle
    }

    /// Scan destination field
    pub fn destination(&self) -> &Field<DestinationMode> {
        &self.destination
    }

    /// Scan destination field, for edits
    pub fn destination_mut(&mut self) -> &mut Field<DestinationMode> {
        &mut self.destination
    }

    /// Selected discount id
    pub fn discount_id(&self) -> &Field<String> {
        &self.discount_id
    }

    /// Derived from the discount id; there is no direct setter
    pub fn discount_code(&self) -> &Field<String> {
        &self.discount_code
    }

    /// Last-known product display, if any product was loaded or picked
    pub fn selected_product(&self) -> Option<&ProductDisplay> {
        self.selected_product.as_ref()
    }

    /// Set the discount id and its resolved code together
    ///
    /// An unresolved id leaves the code empty rather than keeping a stale one.
    pub fn apply_discount(&mut self, selection: &DiscountSelection) -> bool {
        let id_changed = self.discount_id.set(selection.id().to_string());
        let code_changed = self
            .discount_code
            .set(selection.code().unwrap_or_default().to_string());
        id_changed || code_changed
    }

    /// Point the product reference at `product` and cache its display data
    pub(crate) fn apply_product(&mut self, product: &PickedProduct, variant_id: &str) {
        self.product_id.set(product.id.clone());
        self.variant_id.set(variant_id.to_string());
        self.handle.set(product.handle.clone());
        self.selected_product = Some(product.display());
    }

    /// Whether any field differs from its committed value
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.title.is_dirty()
            || self.product_id.is_dirty()
            || self.variant_id.is_dirty()
            || self.handle.is_dirty()
            || self.destination.is_dirty()
            || self.discount_id.is_dirty()
            || self.discount_code.is_dirty()
    }

    /// Names of fields that differ from their committed values
    #[must_use]
    pub fn dirty_fields(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|name| self.is_field_dirty(*name))
            .collect()
    }

    fn is_field_dirty(&self, name: FieldName) -> bool {
        match name {
            FieldName::Title => self.title.is_dirty(),
            FieldName::ProductId => self.product_id.is_dirty(),
            FieldName::VariantId => self.variant_id.is_dirty(),
            FieldName::Handle => self.handle.is_dirty(),
            FieldName::Destination => self.destination.is_dirty(),
            FieldName::DiscountId => self.discount_id.is_dirty(),
            FieldName::DiscountCode => self.discount_code.is_dirty(),
        }
    }

    /// Run every field's validators; all fields are checked even after a failure
    pub fn validate(&mut self) -> bool {
        let mut ok = self.title.validate();
        ok &= self.product_id.validate();
        ok &= self.variant_id.validate();
        ok &= self.handle.validate();
        ok &= self.destination.validate();
        ok &= self.discount_id.validate();
        ok &= self.discount_code.validate();
        ok
    }

    /// Current field errors in form order
    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        let errors = [
            (FieldName::Title, self.title.error()),
            (FieldName::ProductId, self.product_id.error()),
            (FieldName::VariantId, self.variant_id.error()),
            (FieldName::Handle, self.handle.error()),
            (FieldName::Destination, self.destination.error()),
            (FieldName::DiscountId, self.discount_id.error()),
            (FieldName::DiscountCode, self.discount_code.error()),
        ];
        errors
            .into_iter()
            .filter_map(|(field, message)| {
                message.map(|m| FieldError {
                    field,
                    message: m.to_string(),
                })
            })
            .collect()
    }

    /// Discard every edit, returning to the committed values
    pub fn reset(&mut self) {
        self.title.reset();
        self.product_id.reset();
        self.variant_id.reset();
        self.handle.reset();
        self.destination.reset();
        self.discount_id.reset();
        self.discount_code.reset();
        self.selected_product = self.committed_product.clone();
        tracing::debug!("draft reset to committed values");
    }

    /// Reseed values and snapshots from a server-confirmed code
    ///
    /// The picker's display snapshot is kept when the server omits product data.
    pub fn commit_entity(&mut self, code: &QrCode) {
        let values = DraftValues::from_entity(code);
        self.title.seed(values.title);
        self.product_id.seed(values.product_id);
        self.variant_id.seed(values.variant_id);
        self.handle.seed(values.handle);
        self.destination.seed(values.destination);
        self.discount_id.seed(values.discount_id);
        self.discount_code.seed(values.discount_code);
        if let Some(display) = values.selected_product {
            self.selected_product = Some(display);
        }
        self.committed_product = self.selected_product.clone();
    }

    /// Commit a server-confirmed code while keeping edits made after `dispatched`
    ///
    /// Fields whose value still equals what was sent take the server's value;
    /// fields edited while the request was in flight keep the newer edit and
    /// stay dirty.
    pub fn rebase(&mut self, code: &QrCode, dispatched: &DraftValues) {
        let current = self.values();
        self.commit_entity(code);

        if current.title != dispatched.title {
            self.title.set(current.title);
        }
        if current.product_id != dispatched.product_id {
            self.product_id.set(current.product_id);
        }
        if current.variant_id != dispatched.variant_id {
            self.variant_id.set(current.variant_id);
        }
        if current.handle != dispatched.handle {
            self.handle.set(current.handle);
        }
        if current.destination != dispatched.destination {
            self.destination.set(current.destination);
        }
        if current.discount_id != dispatched.discount_id {
            self.discount_id.set(current.discount_id);
        }
        if current.discount_code != dispatched.discount_code {
            self.discount_code.set(current.discount_code);
        }
        if current.selected_product != dispatched.selected_product {
            self.selected_product = current.selected_product;
        }
    }

    /// Snapshot of the current values
    #[must_use]
    pub fn values(&self) -> DraftValues {
        DraftValues {
            title: self.title.value().clone(),
            product_id: self.product_id.value().clone(),
            variant_id: self.variant_id.value().clone(),
            handle: self.handle.value().clone(),
            destination: *self.destination.value(),
            discount_id: self.discount_id.value().clone(),
            discount_code: self.discount_code.value().clone(),
            selected_product: self.selected_product.clone(),
        }
    }

    /// Request body for create/update
    #[must_use]
    pub fn to_body(&self) -> QrCodeBody {
        QrCodeBody {
            title: self.title.value().clone(),
            product_id: self.product_id.value().clone(),
            variant_id: self.variant_id.value().clone(),
            handle: self.handle.value().clone(),
            discount_id: self.discount_id.value().clone(),
            discount_code: self.discount_code.value().clone(),
            destination: *self.destination.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn persisted() -> QrCode {
        serde_json::from_str(
            r#"{
                "id": 9,
                "title": "Window sticker",
                "productId": "gid://shopify/Product/1",
                "variantId": "gid://shopify/ProductVariant/11",
                "handle": "red-shoes",
                "destination": "checkout",
                "discountId": "gid://shopify/DiscountCodeNode/5",
                "discountCode": "SAVE10"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn empty_draft_defaults() {
        let draft = DraftFields::empty();
        assert_eq!(*draft.destination().value(), DestinationMode::Product);
        assert_eq!(draft.discount_id().value(), "");
        assert!(!draft.is_dirty());
    }

    #[test]
    fn validate_reports_every_failing_field() {
        let mut draft = DraftFields::empty();
        assert!(!draft.validate());

        let fields: Vec<_> = draft.errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FieldName::Title, FieldName::ProductId]);
        assert_eq!(draft.title().error(), Some(TITLE_REQUIRED));
        assert_eq!(draft.product_id().error(), Some(PRODUCT_REQUIRED));
    }

    #[test]
    fn unresolved_discount_clears_code() {
        let mut draft = DraftFields::from_entity(&persisted());
        draft.apply_discount(&DiscountSelection::new("gid://shopify/DiscountCodeNode/99", None));
        assert_eq!(draft.discount_code().value(), "");
        assert_eq!(
            draft.dirty_fields(),
            vec![FieldName::DiscountId, FieldName::DiscountCode]
        );
    }

    #[test]
    fn commit_entity_clears_dirty() {
        let mut draft = DraftFields::from_entity(&persisted());
        draft.title_mut().set("Renamed".to_string());

        let mut saved = persisted();
        saved.title = "Renamed".to_string();
        draft.commit_entity(&saved);

        assert!(!draft.is_dirty());
        assert_eq!(draft.title().value(), "Renamed");
    }

    #[test]
    fn rebase_keeps_edits_made_in_flight() {
        let mut draft = DraftFields::from_entity(&persisted());
        draft.title_mut().set("Sent".to_string());
        let dispatched = draft.values();

        draft.destination_mut().set(DestinationMode::Product);

        let mut saved = persisted();
        saved.title = "Sent".to_string();
        draft.rebase(&saved, &dispatched);

        assert_eq!(draft.title().committed(), "Sent");
        assert_eq!(draft.dirty_fields(), vec![FieldName::Destination]);
    }

    #[test]
    fn body_carries_draft_values() {
        let draft = DraftFields::from_entity(&persisted());
        let body = draft.to_body();
        assert_eq!(body.handle, "red-shoes");
        assert_eq!(body.destination, DestinationMode::Checkout);
        assert_eq!(body.discount_code, "SAVE10");
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Title(String),
        Destination(DestinationMode),
        Discount(String, Option<String>),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        prop_oneof![
            "[ a-zA-Z]{0,12}".prop_map(Edit::Title),
            prop_oneof![Just(DestinationMode::Product), Just(DestinationMode::Checkout)]
                .prop_map(Edit::Destination),
            ("[a-z0-9]{0,4}", proptest::option::of("[A-Z0-9]{1,6}"))
                .prop_map(|(id, code)| Edit::Discount(id, code)),
        ]
    }

    proptest! {
        #[test]
        fn discard_returns_to_committed(edits in proptest::collection::vec(edit_strategy(), 0..16)) {
            let mut draft = DraftFields::from_entity(&persisted());
            let before = draft.values();

            for edit in edits {
                match edit {
                    Edit::Title(t) => { draft.title_mut().set(t); }
                    Edit::Destination(d) => { draft.destination_mut().set(d); }
                    Edit::Discount(id, code) => {
                        draft.apply_discount(&DiscountSelection::new(id, code));
                    }
                }
            }

            draft.reset();
            prop_assert_eq!(draft.values(), before);
            prop_assert!(!draft.is_dirty());
        }
    }
}
