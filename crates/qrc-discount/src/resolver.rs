//! Discount option list and id-to-code resolution
//!
//! The resolver fetches exactly one catalog page. Discounts beyond the first
//! `page_size` records are not offered; there is no "load more".

use crate::cache::DiscountCodeCache;
use crate::catalog::{DiscountCatalog, DiscountRecord};
use crate::error::CatalogError;
use qrc_model::DiscountSelection;

/// Label of the sentinel option
pub const NO_DISCOUNT_LABEL: &str = "No discount";

/// Records requested from the catalog
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// One entry of the discount select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountOption {
    /// Display code
    pub label: String,
    /// Discount id, empty for the sentinel
    pub value: String,
}

impl DiscountOption {
    /// The "No discount" sentinel
    #[must_use]
    pub fn none() -> Self {
        Self {
            label: NO_DISCOUNT_LABEL.to_string(),
            value: String::new(),
        }
    }
}

/// Where the catalog fetch stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    /// Fetch not yet completed
    Pending,
    /// Current catalog snapshot, sentinel excluded
    Ready(Vec<DiscountOption>),
    /// Fetch failed; the control stays disabled
    Unavailable(String),
}

/// Builds discount options and resolves ids to codes
#[derive(Debug, Clone)]
pub struct DiscountResolver {
    cache: DiscountCodeCache,
    page_size: u32,
    state: CatalogState,
}

impl DiscountResolver {
    /// Resolver writing into `cache`
    #[must_use]
    pub fn new(cache: DiscountCodeCache, page_size: u32) -> Self {
        Self {
            cache,
            page_size,
            state: CatalogState::Pending,
        }
    }

    /// Records requested per fetch
    #[inline]
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Current fetch state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Shared id-to-code cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &DiscountCodeCache {
        &self.cache
    }

    /// Fetch the single catalog page and ingest it
    ///
    /// # Errors
    /// Returns the catalog error after marking the resolver unavailable
    pub async fn load<C>(&mut self, catalog: &C) -> Result<usize, CatalogError>
    where
        C: DiscountCatalog + ?Sized,
    {
        match catalog.code_discounts(self.page_size).await {
            Ok(records) => Ok(self.ingest(records)),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Replace the snapshot with `records`, filling the cache
    ///
    /// Records without a code are skipped. Returns the number of options.
    pub fn ingest(&mut self, records: Vec<DiscountRecord>) -> usize {
        let options: Vec<DiscountOption> = records
            .into_iter()
            .filter_map(|record| {
                let code = record.code()?.to_string();
                self.cache.insert(record.id.clone(), code.clone());
                Some(DiscountOption {
                    label: code,
                    value: record.id,
                })
            })
            .collect();

        tracing::debug!(count = options.len(), "discount catalog loaded");
        let count = options.len();
        self.state = CatalogState::Ready(options);
        count
    }

    /// Mark the catalog unavailable; the cache is left untouched
    pub fn fail(&mut self, err: &CatalogError) {
        tracing::warn!(error = %err, "discount catalog unavailable");
        self.state = CatalogState::Unavailable(err.to_string());
    }

    /// Options for the select control: sentinel first, empty until loaded
    #[must_use]
    pub fn options(&self) -> Vec<DiscountOption> {
        match &self.state {
            CatalogState::Ready(options) => std::iter::once(DiscountOption::none())
                .chain(options.iter().cloned())
                .collect(),
            CatalogState::Pending | CatalogState::Unavailable(_) => Vec::new(),
        }
    }

    /// Whether the select control accepts input
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, CatalogState::Ready(_))
    }

    /// Resolve an id chosen in the control to its display code
    ///
    /// Ids missing from the current snapshot resolve to no code.
    #[must_use]
    pub fn resolve(&self, id: &str) -> DiscountSelection {
        if id.is_empty() {
            return DiscountSelection::none();
        }
        let CatalogState::Ready(options) = &self.state else {
            return DiscountSelection::new(id, None);
        };
        let code = options
            .iter()
            .find(|option| option.value == id)
            .map(|option| self.cache.get(id).unwrap_or_else(|| option.label.clone()));
        DiscountSelection::new(id, code)
    }
}

impl Default for DiscountResolver {
    fn default() -> Self {
        Self::new(DiscountCodeCache::default(), DEFAULT_PAGE_SIZE)
    }
}
