//! Discount catalog collaborator
//!
//! The catalog is read-only from the editor's point of view: it is queried
//! for one page of code discounts and never written back.

use crate::error::CatalogError;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// One discount as the catalog reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountRecord {
    /// Catalog id (`gid://shopify/DiscountCodeNode/..`)
    pub id: String,
    /// Redeemable codes; the first is the representative one
    pub codes: Vec<String>,
}

impl DiscountRecord {
    /// Record with a single code
    #[must_use]
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codes: vec![code.into()],
        }
    }

    /// Representative code shown to the operator
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

/// Paged, read-only discount query service
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DiscountCatalog: Send + Sync {
    /// Fetch up to `first` code discounts
    async fn code_discounts(&self, first: u32) -> Result<Vec<DiscountRecord>, CatalogError>;
}

/// Query for code discounts, one representative code each
pub const DISCOUNTS_QUERY: &str = r"
query discounts($first: Int!) {
  codeDiscountNodes(first: $first) {
    edges {
      node {
        id
        codeDiscount {
          ... on DiscountCodeBasic { codes(first: 1) { edges { node { code } } } }
          ... on DiscountCodeBxgy { codes(first: 1) { edges { node { code } } } }
          ... on DiscountCodeFreeShipping { codes(first: 1) { edges { node { code } } } }
        }
      }
    }
  }
}
";

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<DiscountsData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscountsData {
    code_discount_nodes: Connection<DiscountNode>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscountNode {
    id: String,
    #[serde(default)]
    code_discount: Option<CodeDiscount>,
}

#[derive(Debug, Deserialize)]
struct CodeDiscount {
    #[serde(default)]
    codes: Option<Connection<CodeNode>>,
}

#[derive(Debug, Deserialize)]
struct CodeNode {
    code: String,
}

fn records_from_response(response: GraphqlResponse) -> Result<Vec<DiscountRecord>, CatalogError> {
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(CatalogError::Query(messages.join("; ")));
    }
    let data = response
        .data
        .ok_or_else(|| CatalogError::Decode("missing data".to_string()))?;

    Ok(data
        .code_discount_nodes
        .edges
        .into_iter()
        .map(|edge| DiscountRecord {
            id: edge.node.id,
            codes: edge
                .node
                .code_discount
                .and_then(|d| d.codes)
                .map(|c| c.edges.into_iter().map(|e| e.node.code).collect())
                .unwrap_or_default(),
        })
        .collect())
}

/// Catalog backed by a GraphQL admin endpoint
///
/// Authentication is the caller's concern: pass a `reqwest::Client` built
/// with whatever default headers the endpoint requires.
#[derive(Debug, Clone)]
pub struct GraphqlDiscountCatalog {
    endpoint: Url,
    client: reqwest::Client,
}

impl GraphqlDiscountCatalog {
    /// Catalog posting to `endpoint` with `client`
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl DiscountCatalog for GraphqlDiscountCatalog {
    #[tracing::instrument(skip(self), err)]
    async fn code_discounts(&self, first: u32) -> Result<Vec<DiscountRecord>, CatalogError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({
                "query": DISCOUNTS_QUERY,
                "variables": { "first": first },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let parsed: GraphqlResponse =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        records_from_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<Vec<DiscountRecord>, CatalogError> {
        records_from_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn parses_code_discount_page() {
        let records = parse(
            r#"{"data": {"codeDiscountNodes": {"edges": [
                {"node": {"id": "d1", "codeDiscount": {"codes": {"edges": [{"node": {"code": "SAVE10"}}]}}}},
                {"node": {"id": "d2", "codeDiscount": {}}}
            ]}}}"#,
        )
        .unwrap();

        assert_eq!(
            records,
            vec![
                DiscountRecord::new("d1", "SAVE10"),
                DiscountRecord {
                    id: "d2".to_string(),
                    codes: Vec::new()
                },
            ]
        );
        assert_eq!(records[1].code(), None);
    }

    #[test]
    fn graphql_errors_fail_the_page() {
        let err = parse(r#"{"data": null, "errors": [{"message": "throttled"}]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Query(ref m) if m == "throttled"));
    }

    #[test]
    fn missing_data_is_decode_error() {
        assert!(matches!(parse("{}").unwrap_err(), CatalogError::Decode(_)));
    }
}
