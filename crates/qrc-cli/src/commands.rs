//! Subcommand implementations

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use qrc_client::HttpQrCodeClient;
use qrc_core::{
    destination_url, DestinationRequest, EditorConfig, Navigation, QrCodeEditor, SubmitOutcome,
};
use qrc_discount::{DiscountCodeCache, DiscountResolver, GraphqlDiscountCatalog};
use qrc_model::{DestinationMode, PickedProduct, PickedVariant, PickerEvent, PickerSelection, QrCode, QrCodeId};
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Access token sent to the discount catalog, if set
const CATALOG_TOKEN_ENV: &str = "QRC_CATALOG_TOKEN";
const CATALOG_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

pub(crate) async fn run(config: &EditorConfig, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("preview", args)) => {
            println!("{}", preview_url(config, args)?);
            Ok(())
        }
        Some(("create", args)) => save(config, args, None).await,
        Some(("update", args)) => save(config, args, Some(qr_code_id(args)?)).await,
        Some(("delete", args)) => delete(config, qr_code_id(args)?).await,
        Some(("discounts", _)) => discounts(config).await,
        Some(("image-url", args)) => {
            println!("{}", http_client(config)?.image_url(&qr_code_id(args)?));
            Ok(())
        }
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("no command given"),
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn optional<'a>(args: &'a ArgMatches, name: &str) -> Option<&'a str> {
    args.get_one::<String>(name).map(String::as_str)
}

fn qr_code_id(args: &ArgMatches) -> Result<QrCodeId> {
    Ok(QrCodeId::new(required(args, "id")?)?)
}

fn mode(args: &ArgMatches, name: &str) -> DestinationMode {
    args.get_one::<DestinationMode>(name).copied().unwrap_or_default()
}

fn http_client(config: &EditorConfig) -> Result<HttpQrCodeClient> {
    Ok(HttpQrCodeClient::new(
        config.api_base_url()?,
        config.request_timeout(),
    )?)
}

fn catalog(config: &EditorConfig) -> Result<Option<GraphqlDiscountCatalog>> {
    let Some(endpoint) = config.catalog_endpoint()? else {
        return Ok(None);
    };

    let mut headers = HeaderMap::new();
    if let Ok(token) = std::env::var(CATALOG_TOKEN_ENV) {
        let value = HeaderValue::from_str(&token)
            .with_context(|| format!("{CATALOG_TOKEN_ENV} is not a valid header value"))?;
        headers.insert(CATALOG_TOKEN_HEADER, value);
    }
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout())
        .build()?;

    Ok(Some(GraphqlDiscountCatalog::new(client, endpoint)))
}

/// Destination URL for the `preview` arguments
pub(crate) fn preview_url(config: &EditorConfig, args: &ArgMatches) -> Result<Url> {
    let origin = match args.get_one::<Url>("origin") {
        Some(origin) if origin.cannot_be_a_base() => bail!("--origin must be an http(s) origin"),
        Some(origin) => origin.clone(),
        None => config.storefront_origin()?,
    };
    let handle = required(args, "handle")?;
    if handle.trim().is_empty() {
        bail!("--handle must not be empty");
    }
    let mode = mode(args, "mode");
    let variant_id = optional(args, "variant");
    if mode == DestinationMode::Checkout && variant_id.is_none() {
        bail!("checkout destination needs --variant");
    }

    Ok(destination_url(&DestinationRequest {
        origin: &origin,
        handle,
        variant_id,
        discount_code: optional(args, "discount"),
        mode,
    }))
}

/// Picker result equivalent to the product arguments
fn picked_product(args: &ArgMatches) -> Result<PickerEvent> {
    let handle = required(args, "handle")?;
    let product = PickedProduct {
        id: required(args, "product-id")?.to_string(),
        title: handle.to_string(),
        images: Vec::new(),
        handle: handle.to_string(),
        variants: vec![PickedVariant {
            id: required(args, "variant-id")?.to_string(),
        }],
    };
    Ok(PickerEvent::Selected(PickerSelection::single(product)))
}

async fn save(config: &EditorConfig, args: &ArgMatches, id: Option<QrCodeId>) -> Result<()> {
    let client = http_client(config)?;
    let entity = id.map(|id| QrCode {
        id: Some(id),
        ..QrCode::default()
    });
    let editor = QrCodeEditor::mount(Arc::new(client.clone()), entity, config)?;

    editor.set_title(required(args, "title")?);
    editor.handle_picker(picked_product(args)?)?;
    editor.set_destination(mode(args, "destination"));

    if let Some(discount_id) = optional(args, "discount-id") {
        let catalog = catalog(config)?.context("--discount-id needs catalog_endpoint in the config")?;
        editor.load_discounts(&catalog).await?;
        let selection = editor.select_discount(discount_id)?;
        if selection.code().is_none() {
            bail!("discount {discount_id} is not in the catalog");
        }
    }

    match editor.submit().await? {
        SubmitOutcome::Created { id } => println!("created {id}"),
        SubmitOutcome::Updated { id } => println!("updated {id}"),
        SubmitOutcome::NoChanges => println!("no changes"),
    }

    let view = editor.view();
    if let Some(url) = view.preview_url.as_ref() {
        println!("destination: {url}");
    }
    if let Some(url) = view.image_url(&client) {
        println!("image: {url}");
    }
    Ok(())
}

async fn delete(config: &EditorConfig, id: QrCodeId) -> Result<()> {
    let entity = QrCode {
        id: Some(id.clone()),
        ..QrCode::default()
    };
    let editor = QrCodeEditor::mount(Arc::new(http_client(config)?), Some(entity), config)?;

    match editor.delete().await? {
        Navigation::Listing => println!("deleted {id}"),
    }
    Ok(())
}

async fn discounts(config: &EditorConfig) -> Result<()> {
    let catalog = catalog(config)?.context("no catalog_endpoint in the config")?;
    let mut resolver = DiscountResolver::new(
        DiscountCodeCache::new(config.discount_cache_capacity),
        config.discount_page_size,
    );

    let count = resolver.load(&catalog).await?;
    info!(count, "discount catalog fetched");
    for option in resolver.options() {
        println!("{}\t{}", option.label, option.value);
    }
    Ok(())
}
