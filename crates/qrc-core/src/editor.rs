//! The edit/save controller
//!
//! One [`QrCodeEditor`] owns the draft of one QR code for as long as the edit
//! surface is mounted. All state sits behind a single lock; network calls run
//! with the lock released and re-acquire it to apply their result.
//!
//! ```text
//!            edit                 submit (valid)
//!   Clean ─────────▶ Dirty ───────────────────────▶ Submitting
//!     ▲  ◀───────────  │                                │
//!     │   discard /    │ ◀──── failure / late edits ────┤
//!     │   revert edit                                   │
//!     └───────────────────── success ───────────────────┘
//! ```

use crate::config::EditorConfig;
use crate::destination::{destination_url, DestinationRequest};
use crate::error::{ConfigError, DeleteError, EditError, SaveError};
use crate::state_machine::{validate_transition, EditPhase};
use crate::view::EditorView;
use parking_lot::Mutex;
use qrc_client::{ClientError, QrCodeApi};
use qrc_discount::{CatalogError, DiscountCatalog, DiscountCodeCache, DiscountResolver};
use qrc_draft::{DraftFields, DraftValues, FieldError, ProductSelector, SelectionError, SelectionOutcome};
use qrc_model::{DestinationMode, DiscountSelection, PickerEvent, QrCode, QrCodeBody, QrCodeId};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};
use url::Url;

/// Result of a submit that reached a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new code was created and its id adopted
    Created {
        /// Id assigned by the server
        id: QrCodeId,
    },
    /// The existing code was updated
    Updated {
        /// Id of the updated code
        id: QrCodeId,
    },
    /// Draft matched the persisted code; nothing was sent
    NoChanges,
}

impl SubmitOutcome {
    /// Id the editor now refers to, if a request was made
    #[must_use]
    pub fn id(&self) -> Option<&QrCodeId> {
        match self {
            Self::Created { id } | Self::Updated { id } => Some(id),
            Self::NoChanges => None,
        }
    }
}

/// Where the surface goes after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the list of codes
    Listing,
}

#[derive(Debug)]
pub(crate) struct EditorState {
    pub(crate) persisted: Option<QrCode>,
    pub(crate) draft: DraftFields,
    pub(crate) selector: ProductSelector,
    pub(crate) discounts: DiscountResolver,
    pub(crate) submitting: bool,
    pub(crate) closed: bool,
}

impl EditorState {
    pub(crate) fn phase(&self) -> EditPhase {
        if self.submitting {
            EditPhase::Submitting
        } else if self.draft.is_dirty() {
            EditPhase::Dirty
        } else {
            EditPhase::Clean
        }
    }

    pub(crate) fn persisted_id(&self) -> Option<QrCodeId> {
        self.persisted.as_ref().and_then(|code| code.id.clone())
    }

    pub(crate) fn destination_url(&self, origin: &Url) -> Option<Url> {
        let handle = self.draft.handle().value();
        if handle.is_empty() {
            return None;
        }
        Some(destination_url(&DestinationRequest {
            origin,
            handle,
            variant_id: Some(self.draft.variant_id().value()),
            discount_code: Some(self.draft.discount_code().value()),
            mode: *self.draft.destination().value(),
        }))
    }
}

type SharedState = Mutex<EditorState>;

/// Controller for one QR code edit surface
///
/// Dropping the editor unmounts it: responses still in flight through a
/// [`SubmitHandle`] are discarded.
pub struct QrCodeEditor<A: ?Sized> {
    state: Arc<SharedState>,
    api: Arc<A>,
    storefront_origin: Url,
}

impl<A: ?Sized> std::fmt::Debug for QrCodeEditor<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrCodeEditor")
            .field("state", &self.state)
            .field("storefront_origin", &self.storefront_origin.as_str())
            .finish_non_exhaustive()
    }
}

impl<A: QrCodeApi + ?Sized> QrCodeEditor<A> {
    /// Mount an editor for `entity`, or for a new code when `None`
    #[must_use]
    pub fn new(
        api: Arc<A>,
        entity: Option<QrCode>,
        discounts: DiscountResolver,
        storefront_origin: Url,
    ) -> Self {
        let draft = entity
            .as_ref()
            .map_or_else(DraftFields::empty, DraftFields::from_entity);
        match entity.as_ref().and_then(|code| code.id.as_ref()) {
            Some(id) => debug!(id = %id, "editor mounted"),
            None => debug!("editor mounted for a new qr code"),
        }

        Self {
            state: Arc::new(Mutex::new(EditorState {
                persisted: entity,
                draft,
                selector: ProductSelector::default(),
                discounts,
                submitting: false,
                closed: false,
            })),
            api,
            storefront_origin,
        }
    }

    /// Mount using `config` for the storefront origin and a fresh discount cache
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidUrl`] if the storefront origin is invalid.
    pub fn mount(api: Arc<A>, entity: Option<QrCode>, config: &EditorConfig) -> Result<Self, ConfigError> {
        let cache = DiscountCodeCache::new(config.discount_cache_capacity);
        let discounts = DiscountResolver::new(cache, config.discount_page_size);
        Ok(Self::new(api, entity, discounts, config.storefront_origin()?))
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> EditPhase {
        self.state.lock().phase()
    }

    /// Whether any field differs from its committed value
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().draft.is_dirty()
    }

    /// Whether a create or update is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    /// Whether the code was deleted and the surface should leave
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Code as last confirmed by the server
    #[must_use]
    pub fn persisted(&self) -> Option<QrCode> {
        self.state.lock().persisted.clone()
    }

    /// Id of the persisted code
    #[must_use]
    pub fn id(&self) -> Option<QrCodeId> {
        self.state.lock().persisted_id()
    }

    /// Snapshot of the draft
    #[must_use]
    pub fn values(&self) -> DraftValues {
        self.state.lock().draft.values()
    }

    /// Request body the draft would submit
    #[must_use]
    pub fn body(&self) -> QrCodeBody {
        self.state.lock().draft.to_body()
    }

    /// Field errors from the last validation
    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        self.state.lock().draft.errors()
    }

    /// Whether delete is offered
    #[must_use]
    pub fn can_delete(&self) -> bool {
        let state = self.state.lock();
        !state.closed && state.persisted_id().is_some()
    }

    /// Edit the title
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.mutate("set_title", |state| {
            state.draft.title_mut().set(title);
        });
    }

    /// Choose product page or checkout
    pub fn set_destination(&self, mode: DestinationMode) {
        self.mutate("set_destination", |state| {
            state.draft.destination_mut().set(mode);
        });
    }

    /// Select a discount by id; the empty id clears it
    ///
    /// # Errors
    /// Returns [`EditError::DiscountsUnavailable`] while the catalog is
    /// loading or after it failed.
    pub fn select_discount(&self, id: &str) -> Result<DiscountSelection, EditError> {
        self.mutate("select_discount", |state| {
            if !state.discounts.is_enabled() {
                return Err(EditError::DiscountsUnavailable);
            }
            let selection = state.discounts.resolve(id);
            state.draft.apply_discount(&selection);
            Ok(selection)
        })
    }

    /// Open or close the product picker, returning whether it is now open
    pub fn toggle_picker(&self) -> bool {
        let mut state = self.state.lock();
        state.selector.toggle();
        state.selector.is_open()
    }

    /// Apply the picker's result and close it
    ///
    /// # Errors
    /// See [`ProductSelector::apply`].
    pub fn handle_picker(&self, event: PickerEvent) -> Result<SelectionOutcome, SelectionError> {
        self.mutate("handle_picker", |state| {
            state.selector.apply(&mut state.draft, event)
        })
    }

    /// Restore every field and the product display to the committed values
    ///
    /// # Errors
    /// Returns [`EditError::Submitting`] while a save is in flight.
    pub fn discard(&self) -> Result<(), EditError> {
        self.mutate("discard", |state| {
            if state.submitting {
                return Err(EditError::Submitting);
            }
            state.draft.reset();
            Ok(())
        })
    }

    /// URL a scan would open, once a product is selected
    #[must_use]
    pub fn destination_url(&self) -> Option<Url> {
        self.state.lock().destination_url(&self.storefront_origin)
    }

    /// Render model for the edit surface
    #[must_use]
    pub fn view(&self) -> EditorView {
        EditorView::render(&self.state.lock(), &self.storefront_origin)
    }

    /// Handle that submits against this editor's live state
    #[must_use]
    pub fn submit_handle(&self) -> SubmitHandle<A> {
        SubmitHandle {
            state: Arc::downgrade(&self.state),
            api: Arc::clone(&self.api),
        }
    }

    /// Validate and persist the draft
    ///
    /// # Errors
    /// See [`SubmitHandle::submit`].
    pub async fn submit(&self) -> Result<SubmitOutcome, SaveError> {
        self.submit_handle().submit().await
    }

    /// Delete the persisted code
    ///
    /// On success the persisted code is cleared, the editor closes and the
    /// surface should return to the listing. On failure nothing changes.
    ///
    /// # Errors
    /// - [`DeleteError::NotPersisted`] without an id
    /// - [`DeleteError::Unmounted`] after a previous delete
    /// - [`DeleteError::Transport`] if the API call fails
    pub async fn delete(&self) -> Result<Navigation, DeleteError> {
        let id = {
            let state = self.state.lock();
            if state.closed {
                return Err(DeleteError::Unmounted);
            }
            state.persisted_id().ok_or(DeleteError::NotPersisted)?
        };

        if let Err(err) = self.api.delete(&id).await {
            warn!(id = %id, error = %err, "delete failed");
            return Err(err.into());
        }

        let mut state = self.state.lock();
        state.persisted = None;
        state.closed = true;
        info!(id = %id, "qr code deleted");
        Ok(Navigation::Listing)
    }

    /// Fetch one page of the discount catalog into the resolver
    ///
    /// The lock is not held while fetching. A failure leaves the discount
    /// control disabled; the rest of the editor is unaffected. On success
    /// the draft's discount is resolved against the new snapshot, so an id
    /// missing from it no longer carries a code.
    ///
    /// # Errors
    /// The catalog error, after recording it.
    pub async fn load_discounts<C>(&self, catalog: &C) -> Result<usize, CatalogError>
    where
        C: DiscountCatalog + ?Sized,
    {
        let page_size = self.state.lock().discounts.page_size();
        let result = catalog.code_discounts(page_size).await;

        self.mutate("load_discounts", |state| match result {
            Ok(records) => {
                let count = state.discounts.ingest(records);
                let selection = state.discounts.resolve(state.draft.discount_id().value());
                if state.draft.apply_discount(&selection) {
                    debug!(id = selection.id(), "discount code re-resolved");
                }
                Ok(count)
            }
            Err(err) => {
                state.discounts.fail(&err);
                Err(err)
            }
        })
    }

    fn mutate<R>(&self, op: &'static str, f: impl FnOnce(&mut EditorState) -> R) -> R {
        let mut state = self.state.lock();
        let before = state.phase();
        let out = f(&mut *state);
        let after = state.phase();
        if before != after {
            debug_assert!(
                validate_transition(before, after).is_ok(),
                "{op}: {before} -> {after}"
            );
            debug!(op, from = %before, to = %after, "phase changed");
        }
        out
    }
}

enum Dispatch {
    Create(QrCodeBody),
    Update(QrCodeId, QrCodeBody),
}

impl Dispatch {
    fn kind(&self) -> &'static str {
        match self {
            Dispatch::Create(_) => "create",
            Dispatch::Update(..) => "update",
        }
    }
}

/// Cloneable submit entry point for tasks outside the editor
///
/// Holds the editor state weakly and reads it when [`submit`](Self::submit)
/// runs, so a handle made before a create still updates the adopted id
/// afterwards.
pub struct SubmitHandle<A: ?Sized> {
    state: Weak<SharedState>,
    api: Arc<A>,
}

impl<A: ?Sized> Clone for SubmitHandle<A> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: ?Sized> std::fmt::Debug for SubmitHandle<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitHandle")
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

impl<A: ?Sized> SubmitHandle<A> {
    /// Whether the editor is still mounted
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state.strong_count() > 0
    }
}

impl<A: QrCodeApi + ?Sized> SubmitHandle<A> {
    /// Validate the draft and create or update the code
    ///
    /// Whether this creates or updates is decided from the persisted id at
    /// dispatch time. On success the response becomes the persisted code and
    /// the draft's committed values; on failure the draft is left as it was.
    ///
    /// # Errors
    /// - [`SaveError::Validation`] if a field is invalid; nothing is sent
    /// - [`SaveError::AlreadySubmitting`] while another submit is in flight
    /// - [`SaveError::Transport`] if the API call fails
    /// - [`SaveError::MissingId`] if a create response has no id
    /// - [`SaveError::Unmounted`] if the editor is gone or was deleted
    pub async fn submit(&self) -> Result<SubmitOutcome, SaveError> {
        let Some((dispatch, dispatched)) = self.begin()? else {
            return Ok(SubmitOutcome::NoChanges);
        };

        let mut in_flight = InFlight {
            state: &self.state,
            armed: true,
        };
        let result = match &dispatch {
            Dispatch::Create(body) => self.api.create(body).await,
            Dispatch::Update(id, body) => self.api.update(id, body).await,
        };
        in_flight.armed = false;

        self.complete(dispatch, &dispatched, result)
    }

    fn begin(&self) -> Result<Option<(Dispatch, DraftValues)>, SaveError> {
        let shared = self.state.upgrade().ok_or(SaveError::Unmounted)?;
        let mut state = shared.lock();

        if state.closed {
            return Err(SaveError::Unmounted);
        }
        if state.submitting {
            warn!("submit rejected, a save is already in flight");
            return Err(SaveError::AlreadySubmitting);
        }

        let id = state.persisted_id();
        if id.is_some() && !state.draft.is_dirty() {
            debug!("submit skipped, no changes");
            return Ok(None);
        }
        if !state.draft.validate() {
            let errors = state.draft.errors();
            debug!(count = errors.len(), "submit blocked by validation");
            return Err(SaveError::Validation(errors));
        }

        let before = state.phase();
        validate_transition(before, EditPhase::Submitting)?;
        state.submitting = true;

        let body = state.draft.to_body();
        let dispatch = match id {
            Some(id) => Dispatch::Update(id, body),
            None => Dispatch::Create(body),
        };
        let to = EditPhase::Submitting;
        debug!(from = %before, to = %to, kind = dispatch.kind(), "phase changed");
        Ok(Some((dispatch, state.draft.values())))
    }

    fn complete(
        &self,
        dispatch: Dispatch,
        dispatched: &DraftValues,
        result: Result<QrCode, ClientError>,
    ) -> Result<SubmitOutcome, SaveError> {
        let kind = dispatch.kind();
        let Some(shared) = self.state.upgrade() else {
            warn!(kind, "editor dropped before the response arrived, discarding it");
            return Err(SaveError::Unmounted);
        };
        let mut state = shared.lock();
        state.submitting = false;

        if state.closed {
            warn!(kind, "editor closed before the response arrived, discarding it");
            return Err(SaveError::Unmounted);
        }

        let mut code = match result {
            Ok(code) => code,
            Err(err) => {
                warn!(kind, error = %err, "save failed, draft kept");
                return Err(err.into());
            }
        };

        let (id, created) = match (code.id.clone(), dispatch) {
            (Some(id), Dispatch::Create(_)) => (id, true),
            (Some(id), Dispatch::Update(..)) => (id, false),
            (None, Dispatch::Update(id, _)) => {
                code.id = Some(id.clone());
                (id, false)
            }
            (None, Dispatch::Create(_)) => {
                warn!("create response has no id");
                return Err(SaveError::MissingId);
            }
        };

        state.draft.rebase(&code, dispatched);
        state.persisted = Some(code);
        let (from, to) = (EditPhase::Submitting, state.phase());
        debug!(from = %from, to = %to, kind, "phase changed");

        if created {
            info!(id = %id, "qr code created");
            Ok(SubmitOutcome::Created { id })
        } else {
            info!(id = %id, "qr code updated");
            Ok(SubmitOutcome::Updated { id })
        }
    }
}

/// Clears the submitting flag if the submit future is dropped mid-flight
struct InFlight<'a> {
    state: &'a Weak<SharedState>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(shared) = self.state.upgrade() {
            shared.lock().submitting = false;
            warn!("save cancelled before a response arrived");
        }
    }
}
