//! Bridge between the external product picker and the draft

use crate::draft::DraftFields;
use crate::error::SelectionError;
use qrc_model::{PickerEvent, PickerSelection};

/// What a picker event did to the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Product reference and display snapshot were replaced
    Selected {
        /// Newly referenced product
        product_id: String,
    },
    /// Picker closed without touching the draft
    Cancelled,
}

/// Tracks the picker surface and applies its result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductSelector {
    open: bool,
}

impl ProductSelector {
    /// Whether the picker surface is showing
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the picker
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Show or hide the picker
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Apply one picker event to `draft` and close the picker
    ///
    /// A selection updates product id, first variant id, handle and display
    /// snapshot together; a rejected selection updates nothing.
    ///
    /// # Errors
    /// - [`SelectionError::NotSingle`] unless exactly one product was picked
    /// - [`SelectionError::NoVariants`] if that product has no variants
    pub fn apply(
        &mut self,
        draft: &mut DraftFields,
        event: PickerEvent,
    ) -> Result<SelectionOutcome, SelectionError> {
        self.open = false;
        match event {
            PickerEvent::Cancelled => {
                tracing::debug!("product picker cancelled");
                Ok(SelectionOutcome::Cancelled)
            }
            PickerEvent::Selected(selection) => Self::select(draft, selection),
        }
    }

    fn select(
        draft: &mut DraftFields,
        selection: PickerSelection,
    ) -> Result<SelectionOutcome, SelectionError> {
        let [product] = <[_; 1]>::try_from(selection.selection)
            .map_err(|rest: Vec<_>| SelectionError::NotSingle(rest.len()))?;
        let variant = product
            .variants
            .first()
            .ok_or_else(|| SelectionError::NoVariants(product.id.clone()))?;

        draft.apply_product(&product, &variant.id);
        tracing::debug!(product_id = %product.id, variant_id = %variant.id, "product selected");
        Ok(SelectionOutcome::Selected {
            product_id: product.id,
        })
    }
}
