use pretty_assertions::assert_eq;
use qrc_core::{
    DeleteError, EditError, EditPhase, Navigation, QrCodeEditor, SaveError, SubmitOutcome,
};
use qrc_discount::{DiscountOption, DiscountResolver, NO_DISCOUNT_LABEL};
use qrc_draft::{FieldName, PRODUCT_REQUIRED, TITLE_REQUIRED};
use qrc_model::{DestinationMode, PickedProduct, PickedVariant, PickerEvent};
use qrc_test_utils::{
    blue_hat, discount_page, persisted_code, pick, red_shoes, storefront, ApiCall, RecordingApi,
    StaticCatalog,
};
use std::sync::Arc;

fn mount(api: &Arc<RecordingApi>, entity: Option<qrc_model::QrCode>) -> QrCodeEditor<RecordingApi> {
    QrCodeEditor::new(Arc::clone(api), entity, DiscountResolver::default(), storefront())
}

#[tokio::test]
async fn create_then_update_through_an_early_handle() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, None);
    let handle = editor.submit_handle();

    editor.set_title("Window sticker");
    editor.handle_picker(pick(red_shoes())).unwrap();

    let created = handle.submit().await.unwrap();
    let id = created.id().cloned().unwrap();
    assert_eq!(created, SubmitOutcome::Created { id: id.clone() });
    assert_eq!(editor.id(), Some(id.clone()));
    assert_eq!(editor.phase(), EditPhase::Clean);

    editor.set_title("Door sticker");
    let updated = handle.submit().await.unwrap();
    assert_eq!(updated, SubmitOutcome::Updated { id: id.clone() });

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], ApiCall::Create(body) if body.title == "Window sticker"));
    assert!(matches!(&calls[1], ApiCall::Update(sent, body) if *sent == id && body.title == "Door sticker"));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_api() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, None);

    let err = editor.submit().await.unwrap_err();

    let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
    assert_eq!(fields, vec![FieldName::Title, FieldName::ProductId]);
    assert!(api.calls().is_empty());

    let view = editor.view();
    assert_eq!(view.title.error.as_deref(), Some(TITLE_REQUIRED));
    assert_eq!(view.product.error.as_deref(), Some(PRODUCT_REQUIRED));
}

#[tokio::test]
async fn editing_clears_the_field_error() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, None);
    let _ = editor.submit().await;

    editor.set_title("Window sticker");

    assert_eq!(editor.view().title.error, None);
    assert_eq!(editor.view().product.error.as_deref(), Some(PRODUCT_REQUIRED));
}

#[tokio::test]
async fn failed_update_keeps_the_draft() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));
    editor.set_title("Window sticker");
    let before = editor.values();

    api.fail_next(502);
    let err = editor.submit().await.unwrap_err();

    assert!(matches!(err, SaveError::Transport(_)));
    assert!(err.is_retryable());
    assert!(editor.is_dirty());
    assert_eq!(editor.phase(), EditPhase::Dirty);
    assert_eq!(editor.values(), before);
    assert_eq!(editor.persisted().unwrap().title, "Shelf display");

    let retried = editor.submit().await.unwrap();
    assert!(matches!(retried, SubmitOutcome::Updated { .. }));
    assert_eq!(editor.persisted().unwrap().title, "Window sticker");
    assert_eq!(editor.phase(), EditPhase::Clean);
}

#[tokio::test]
async fn unchanged_code_is_not_resubmitted() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));

    assert_eq!(editor.submit().await.unwrap(), SubmitOutcome::NoChanges);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn delete_needs_an_id() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, None);

    assert!(!editor.can_delete());
    assert!(!editor.view().can_delete);
    assert!(matches!(editor.delete().await, Err(DeleteError::NotPersisted)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn delete_returns_to_listing() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));
    assert!(editor.can_delete());

    assert_eq!(editor.delete().await.unwrap(), Navigation::Listing);

    assert_eq!(editor.persisted(), None);
    assert!(editor.is_closed());
    assert!(!editor.can_delete());
    editor.set_title("Too late");
    assert!(matches!(editor.submit().await, Err(SaveError::Unmounted)));
    assert!(matches!(editor.delete().await, Err(DeleteError::Unmounted)));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn failed_delete_changes_nothing() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));

    api.fail_next(500);
    assert!(matches!(editor.delete().await, Err(DeleteError::Transport(_))));

    assert_eq!(editor.persisted(), Some(persisted_code("7")));
    assert!(editor.can_delete());
    assert!(!editor.is_closed());
}

#[tokio::test]
async fn discount_selection_sets_and_clears_code() {
    let api = Arc::new(RecordingApi::new());
    let catalog = StaticCatalog::new(discount_page());
    let editor = mount(&api, Some(persisted_code("7")));

    let loaded = editor.load_discounts(&catalog).await.unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(catalog.requests(), vec![25]);

    let view = editor.view().discount;
    assert!(view.enabled);
    assert_eq!(view.options[0], DiscountOption::none());
    assert_eq!(view.options[0].label, NO_DISCOUNT_LABEL);
    assert_eq!(
        view.options[1..].iter().map(|o| o.label.as_str()).collect::<Vec<_>>(),
        vec!["SAVE10", "FREESHIP"]
    );

    let selection = editor.select_discount("gid://shopify/DiscountCodeNode/1").unwrap();
    assert_eq!(selection.code(), Some("SAVE10"));
    assert_eq!(editor.values().discount_code, "SAVE10");
    assert!(editor.is_dirty());

    let cleared = editor.select_discount("").unwrap();
    assert!(cleared.is_none());
    assert_eq!(editor.values().discount_id, "");
    assert_eq!(editor.values().discount_code, "");
    assert_eq!(editor.phase(), EditPhase::Clean);
}

#[tokio::test]
async fn unavailable_catalog_disables_discounts_only() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));

    assert!(editor.load_discounts(&StaticCatalog::failing(503)).await.is_err());

    let view = editor.view();
    assert!(!view.discount.enabled);
    assert!(view.discount.options.is_empty());
    assert_eq!(
        editor.select_discount("gid://shopify/DiscountCodeNode/1"),
        Err(EditError::DiscountsUnavailable)
    );

    editor.set_title("Window sticker");
    assert!(matches!(editor.submit().await, Ok(SubmitOutcome::Updated { .. })));
}

#[test]
fn cancel_then_select_changes_only_the_product() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));
    let before = editor.values();

    assert!(editor.toggle_picker());
    editor.handle_picker(PickerEvent::Cancelled).unwrap();
    assert_eq!(editor.values(), before);
    assert!(!editor.view().product.picker_open);

    assert!(editor.toggle_picker());
    editor.handle_picker(pick(blue_hat())).unwrap();
    let after = editor.values();

    assert_eq!(after.title, before.title);
    assert_eq!(after.destination, before.destination);
    assert_eq!(after.discount_id, before.discount_id);
    assert_eq!(after.product_id, "gid://shopify/Product/2");
    assert_eq!(after.variant_id, "gid://shopify/ProductVariant/21");
    assert_eq!(after.handle, "blue-hat");
    assert_eq!(after.selected_product, Some(blue_hat().display()));

    let view = editor.view();
    assert_eq!(view.product.title.as_deref(), Some("Blue Hat"));
    assert!(view.product.placeholder);
}

#[test]
fn discard_reverts_product_and_fields() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, Some(persisted_code("7")));
    let before = editor.values();

    editor.set_title("Window sticker");
    editor.set_destination(DestinationMode::Checkout);
    editor.handle_picker(pick(blue_hat())).unwrap();
    editor.discard().unwrap();

    assert_eq!(editor.values(), before);
    assert_eq!(editor.view().product.title.as_deref(), Some("Red Shoes"));
}

#[tokio::test]
async fn checkout_destination_carries_variant_and_code() {
    let api = Arc::new(RecordingApi::new());
    let editor = mount(&api, None);
    editor
        .load_discounts(&StaticCatalog::new(discount_page()))
        .await
        .unwrap();

    editor
        .handle_picker(pick(PickedProduct {
            id: "p1".to_string(),
            title: "Red Shoes".to_string(),
            images: Vec::new(),
            handle: "red-shoes".to_string(),
            variants: vec![PickedVariant { id: "v1".to_string() }],
        }))
        .unwrap();
    assert_eq!(
        editor.destination_url().unwrap().as_str(),
        "https://shop.example.com/products/red-shoes?variant=v1"
    );

    editor.set_destination(DestinationMode::Checkout);
    editor.select_discount("gid://shopify/DiscountCodeNode/1").unwrap();

    assert_eq!(
        editor.destination_url().unwrap().as_str(),
        "https://shop.example.com/cart/v1:1?discount=SAVE10"
    );
    assert_eq!(editor.view().preview_url, editor.destination_url());
}

#[tokio::test]
async fn stored_discount_missing_from_catalog_loses_its_code() {
    let api = Arc::new(RecordingApi::new());
    let saved = qrc_model::QrCode {
        discount_id: Some("gid://shopify/DiscountCodeNode/99".to_string()),
        discount_code: Some("GONE50".to_string()),
        ..persisted_code("7")
    };
    let editor = mount(&api, Some(saved));
    assert_eq!(
        editor.destination_url().unwrap().as_str(),
        "https://shop.example.com/discount/GONE50?redirect=%2Fproducts%2Fred-shoes%3Fvariant%3D11"
    );

    editor
        .load_discounts(&StaticCatalog::new(discount_page()))
        .await
        .unwrap();

    let view = editor.view();
    assert_eq!(view.discount.selected, "gid://shopify/DiscountCodeNode/99");
    assert_eq!(view.discount.code, None);
    assert_eq!(editor.values().discount_code, "");
    assert_eq!(
        editor.destination_url().unwrap().as_str(),
        "https://shop.example.com/products/red-shoes?variant=11"
    );
    assert_eq!(editor.phase(), EditPhase::Dirty);
}

#[tokio::test]
async fn stored_discount_in_catalog_stays_clean() {
    let api = Arc::new(RecordingApi::new());
    let saved = qrc_model::QrCode {
        discount_id: Some("gid://shopify/DiscountCodeNode/1".to_string()),
        discount_code: Some("SAVE10".to_string()),
        ..persisted_code("7")
    };
    let editor = mount(&api, Some(saved));

    editor
        .load_discounts(&StaticCatalog::new(discount_page()))
        .await
        .unwrap();

    assert_eq!(editor.view().discount.code.as_deref(), Some("SAVE10"));
    assert_eq!(editor.phase(), EditPhase::Clean);
}
