//! Render model for the edit surface
//!
//! A plain snapshot taken under the editor lock. Nothing in here reaches
//! back into the editor.

use crate::editor::EditorState;
use crate::state_machine::EditPhase;
use qrc_client::HttpQrCodeClient;
use qrc_discount::DiscountOption;
use qrc_model::{DestinationMode, ProductImage, QrCodeId};
use url::Url;

/// Product button label before a product is chosen
pub const SELECT_PRODUCT_LABEL: &str = "Select product";
/// Product button label once a product is chosen
pub const CHANGE_PRODUCT_LABEL: &str = "Change product";
/// Shown in place of the QR image until the first save
pub const IMAGE_PENDING_MESSAGE: &str = "Your QR code will appear here after you save.";

/// Save or discard action in the contextual save bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionView {
    /// Shown while there is something to save or a save is running
    pub visible: bool,
    /// Not clickable
    pub disabled: bool,
    /// Spinner in place of the label
    pub loading: bool,
}

/// A text input with its validation message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFieldView {
    /// Current draft value
    pub value: String,
    /// Validation message from the last submit
    pub error: Option<String>,
}

/// Product card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    /// Resource picker is showing
    pub picker_open: bool,
    /// [`SELECT_PRODUCT_LABEL`] or [`CHANGE_PRODUCT_LABEL`]
    pub button_label: &'static str,
    /// Title of the selected product, if one is referenced
    pub title: Option<String>,
    /// First product image
    pub thumbnail: Option<ProductImage>,
    /// Product referenced but it has no image
    pub placeholder: bool,
    /// Validation message from the last submit
    pub error: Option<String>,
}

/// One scan destination radio choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationChoice {
    /// Mode this choice selects
    pub mode: DestinationMode,
    /// Text next to the radio
    pub label: &'static str,
    /// Matches the draft's destination
    pub selected: bool,
}

/// Discount select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountView {
    /// Sentinel first, then one option per catalog code; empty until loaded
    pub options: Vec<DiscountOption>,
    /// Selected discount id, empty for none
    pub selected: String,
    /// Code for the selection, if it resolved
    pub code: Option<String>,
    /// False while loading or after the catalog failed
    pub enabled: bool,
}

/// Everything the edit surface renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    /// Editor phase at render time
    pub phase: EditPhase,
    /// Save action
    pub save: ActionView,
    /// Discard action
    pub discard: ActionView,
    /// Title input
    pub title: TextFieldView,
    /// Product card
    pub product: ProductView,
    /// Scan destination radios, in display order
    pub destinations: Vec<DestinationChoice>,
    /// Discount select
    pub discount: DiscountView,
    /// Delete action is offered
    pub can_delete: bool,
    /// Scan destination for the "go to destination" action; `None` disables it
    pub preview_url: Option<Url>,
    /// Present once the code is saved; the QR image exists only then
    pub qr_code_id: Option<QrCodeId>,
}

impl EditorView {
    pub(crate) fn render(state: &EditorState, storefront_origin: &Url) -> Self {
        let phase = state.phase();
        let submitting = state.submitting;
        let actions = ActionView {
            visible: state.draft.is_dirty() || submitting,
            disabled: submitting,
            loading: submitting,
        };

        let draft = &state.draft;
        let has_product = !draft.product_id().value().is_empty();
        let display = draft.selected_product().filter(|_| has_product);
        let thumbnail = display.and_then(|d| d.thumbnail()).cloned();

        let product = ProductView {
            picker_open: state.selector.is_open(),
            button_label: if has_product {
                CHANGE_PRODUCT_LABEL
            } else {
                SELECT_PRODUCT_LABEL
            },
            title: display.map(|d| d.title.clone()),
            placeholder: has_product && thumbnail.is_none(),
            thumbnail,
            error: draft.product_id().error().map(str::to_string),
        };

        let selected_mode = *draft.destination().value();
        let destinations = DestinationMode::ALL
            .iter()
            .map(|&mode| DestinationChoice {
                mode,
                label: mode.label(),
                selected: mode == selected_mode,
            })
            .collect();

        let discount_code = draft.discount_code().value();
        let discount = DiscountView {
            options: state.discounts.options(),
            selected: draft.discount_id().value().clone(),
            code: (!discount_code.is_empty()).then(|| discount_code.clone()),
            enabled: state.discounts.is_enabled(),
        };

        let qr_code_id = if state.closed {
            None
        } else {
            state.persisted_id()
        };

        Self {
            phase,
            save: actions,
            discard: actions,
            title: TextFieldView {
                value: draft.title().value().clone(),
                error: draft.title().error().map(str::to_string),
            },
            product,
            destinations,
            discount,
            can_delete: qr_code_id.is_some(),
            preview_url: state.destination_url(storefront_origin),
            qr_code_id,
        }
    }

    /// QR image URL on `client`'s API, once the code has an id
    #[must_use]
    pub fn image_url(&self, client: &HttpQrCodeClient) -> Option<Url> {
        self.qr_code_id.as_ref().map(|id| client.image_url(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::QrCodeEditor;
    use pretty_assertions::assert_eq;
    use qrc_client::MockQrCodeApi;
    use qrc_discount::{DiscountRecord, DiscountResolver};
    use qrc_model::{PickedProduct, PickedVariant, PickerEvent, PickerSelection, QrCode};
    use std::sync::Arc;
    use std::time::Duration;

    fn origin() -> Url {
        Url::parse("https://shop.example.com").unwrap()
    }

    fn new_editor() -> QrCodeEditor<MockQrCodeApi> {
        QrCodeEditor::new(Arc::new(MockQrCodeApi::new()), None, DiscountResolver::default(), origin())
    }

    #[test]
    fn new_code_view() {
        let view = new_editor().view();

        assert_eq!(view.phase, EditPhase::Clean);
        assert_eq!(view.save, ActionView::default());
        assert_eq!(view.product.button_label, SELECT_PRODUCT_LABEL);
        assert!(!view.product.placeholder);
        assert_eq!(view.product.title, None);
        assert_eq!(
            view.destinations,
            vec![
                DestinationChoice {
                    mode: DestinationMode::Product,
                    label: "Link to product page",
                    selected: true,
                },
                DestinationChoice {
                    mode: DestinationMode::Checkout,
                    label: "Link to checkout page with product in the cart",
                    selected: false,
                },
            ]
        );
        assert!(!view.discount.enabled);
        assert!(view.discount.options.is_empty());
        assert!(!view.can_delete);
        assert_eq!(view.preview_url, None);
        assert_eq!(view.qr_code_id, None);
    }

    #[test]
    fn product_without_images_uses_placeholder() {
        let editor = new_editor();
        editor
            .handle_picker(PickerEvent::Selected(PickerSelection::single(PickedProduct {
                id: "gid://shopify/Product/1".to_string(),
                title: "Red Shoes".to_string(),
                images: Vec::new(),
                handle: "red-shoes".to_string(),
                variants: vec![PickedVariant {
                    id: "gid://shopify/ProductVariant/11".to_string(),
                }],
            })))
            .unwrap();

        let view = editor.view();

        assert_eq!(view.product.button_label, CHANGE_PRODUCT_LABEL);
        assert_eq!(view.product.title.as_deref(), Some("Red Shoes"));
        assert!(view.product.placeholder);
        assert_eq!(view.save, ActionView { visible: true, disabled: false, loading: false });
        assert_eq!(
            view.preview_url.map(String::from).as_deref(),
            Some("https://shop.example.com/products/red-shoes?variant=11")
        );
    }

    #[test]
    fn saved_code_offers_image_and_delete() {
        let saved = QrCode {
            id: Some(QrCodeId::new("7").unwrap()),
            title: "Shelf".to_string(),
            ..QrCode::default()
        };
        let editor = QrCodeEditor::new(
            Arc::new(MockQrCodeApi::new()),
            Some(saved),
            DiscountResolver::default(),
            origin(),
        );
        let client = HttpQrCodeClient::new(
            Url::parse("https://qr.example.com").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();

        let view = editor.view();

        assert!(view.can_delete);
        assert_eq!(
            view.image_url(&client).unwrap().as_str(),
            "https://qr.example.com/qrcodes/7/image"
        );
    }

    #[tokio::test]
    async fn loaded_discounts_are_listed() {
        let mut catalog = qrc_discount::MockDiscountCatalog::new();
        catalog
            .expect_code_discounts()
            .returning(|_| Ok(vec![DiscountRecord::new("d1", "SAVE10")]));
        let editor = new_editor();
        editor.load_discounts(&catalog).await.unwrap();
        editor.select_discount("d1").unwrap();

        let view = editor.view().discount;

        assert!(view.enabled);
        assert_eq!(view.options.len(), 2);
        assert_eq!(view.selected, "d1");
        assert_eq!(view.code.as_deref(), Some("SAVE10"));
    }
}
