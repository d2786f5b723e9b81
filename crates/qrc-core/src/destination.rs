//! Storefront URL a scan resolves to
//!
//! Pure functions; the editor only calls them once a handle is known.

use qrc_model::DestinationMode;
use url::Url;

/// Inputs for [`destination_url`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationRequest<'a> {
    /// Storefront origin, e.g. `https://shop.example.com`
    pub origin: &'a Url,
    /// Product handle; must not be empty
    pub handle: &'a str,
    /// Variant id, numeric or a `gid://` reference
    pub variant_id: Option<&'a str>,
    /// Discount code to apply
    pub discount_code: Option<&'a str>,
    /// Product page or checkout
    pub mode: DestinationMode,
}

/// Build the URL for `request`
///
/// Checkout needs a variant; without one the product page is returned.
#[must_use]
pub fn destination_url(request: &DestinationRequest<'_>) -> Url {
    debug_assert!(!request.handle.is_empty(), "destination requested without a handle");

    let variant_id = non_empty(request.variant_id);
    let discount_code = non_empty(request.discount_code);

    match (request.mode, variant_id) {
        (DestinationMode::Checkout, Some(variant_id)) => {
            checkout_url(request.origin, variant_id, 1, discount_code)
        }
        _ => product_url(request.origin, request.handle, variant_id, discount_code),
    }
}

/// `{origin}/products/{handle}[?variant=..]`, wrapped in `/discount/{code}`
/// when a code is present
#[must_use]
pub fn product_url(
    origin: &Url,
    handle: &str,
    variant_id: Option<&str>,
    discount_code: Option<&str>,
) -> Url {
    let mut page = with_path(origin, &["products", handle]);
    if let Some(variant_id) = variant_id {
        page.query_pairs_mut()
            .append_pair("variant", numeric_id(variant_id));
    }

    let Some(code) = discount_code else {
        return page;
    };

    let mut redirect = page.path().to_string();
    if let Some(query) = page.query() {
        redirect.push('?');
        redirect.push_str(query);
    }

    let mut url = with_path(origin, &["discount", code]);
    url.query_pairs_mut().append_pair("redirect", &redirect);
    url
}

/// `{origin}/cart/{variant}:{quantity}[?discount={code}]`
#[must_use]
pub fn checkout_url(
    origin: &Url,
    variant_id: &str,
    quantity: u32,
    discount_code: Option<&str>,
) -> Url {
    let line = format!("{}:{quantity}", numeric_id(variant_id));
    let mut url = with_path(origin, &["cart", &line]);
    if let Some(code) = discount_code {
        url.query_pairs_mut().append_pair("discount", code);
    }
    url
}

/// Trailing numeric part of a `gid://shopify/Type/123` reference
///
/// Plain ids come back unchanged.
#[must_use]
pub fn numeric_id(id: &str) -> &str {
    if id.starts_with("gid://") {
        id.rsplit('/').next().unwrap_or(id)
    } else {
        id
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn with_path(origin: &Url, segments: &[&str]) -> Url {
    let mut url = origin.clone();
    url.set_query(None);
    url.set_fragment(None);
    // origins are validated to carry a path
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url
}
