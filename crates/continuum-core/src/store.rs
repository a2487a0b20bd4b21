//! Board store: the in-memory board and its sync policy.
//!
//! Every mutation runs the same sequence: set `loading` and clear `error`,
//! call the API, apply the server's card (or, if the call failed, the
//! caller's data) to the in-memory cards, mirror the cards and selector to
//! the blob store, clear `loading`. A failed delete is the exception: the
//! card stays where it is.
//!
//! Mutations hold an async lock from start to finish, so only one is ever in
//! flight. Reads never wait on that lock and may see `loading == true`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use continuum_api::ApiClient;
use continuum_storage::BlobStore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::board::fallback_categories;
use crate::board::model::{
    BoardState, Card, CardUpdate, Category, CategoryId, ColumnId, ColumnView, NewCard,
};
use crate::codec::{self, StoredBoard, STORAGE_KEY};
use crate::config::ClientConfig;
use crate::error::{CoreError, CoreResult};

/// Construction options for [`BoardStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Selected category when the cache has none.
    pub default_category: CategoryId,
    /// Blob store key for the cached board.
    pub storage_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_category: CategoryId::default(),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

/// The board store.
pub struct BoardStore {
    api: ApiClient,
    storage: Arc<dyn BlobStore>,
    storage_key: String,
    state: RwLock<BoardState>,
    mutation: tokio::sync::Mutex<()>,
}

impl BoardStore {
    /// Create the store and load the board.
    ///
    /// Restores the cached category selector, then fetches categories and
    /// cards. Returns once both fetches have finished or fallen back to
    /// local data.
    pub async fn connect(
        api: ApiClient,
        storage: Arc<dyn BlobStore>,
        options: StoreOptions,
    ) -> Self {
        let store = Self {
            api,
            storage,
            storage_key: options.storage_key,
            state: RwLock::new(BoardState::new(options.default_category)),
            mutation: tokio::sync::Mutex::new(()),
        };

        if let Some(stored) = store.read_cached().await {
            if let Some(active) = stored.active_category {
                store.write().active_category = active;
            }
        }

        // One loading cycle for both fetches, so a categories failure is
        // still reported when the cards arrive.
        {
            let _guard = store.mutation.lock().await;
            store.begin();
            store.load_categories().await;
            store.load_cards().await;
            store.finish();
        }

        {
            let state = store.read();
            info!(
                categories = state.categories.len(),
                cards = state.cards.len(),
                active_category = %state.active_category,
                "Board store ready"
            );
        }
        store
    }

    /// Open the configured storage backend and connect to the configured API.
    pub async fn open(config: &ClientConfig) -> CoreResult<Self> {
        let storage = continuum_storage::open(&config.storage).await?;
        let options = StoreOptions {
            default_category: config.default_category,
            ..Default::default()
        };
        Ok(Self::connect(ApiClient::new(&config.api_url), storage, options).await)
    }

    // ── Read side ──

    pub fn snapshot(&self) -> BoardState {
        self.read().clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.read().cards.clone()
    }

    pub fn card(&self, id: &str) -> Option<Card> {
        self.read().card(id).cloned()
    }

    pub fn active_category(&self) -> CategoryId {
        self.read().active_category
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn active_category_cards(&self) -> Vec<Card> {
        self.read().active_category_cards()
    }

    pub fn todo_cards(&self) -> Vec<Card> {
        self.read().column_cards(ColumnId::Todo)
    }

    pub fn in_progress_cards(&self) -> Vec<Card> {
        self.read().column_cards(ColumnId::InProgress)
    }

    pub fn done_cards(&self) -> Vec<Card> {
        self.read().column_cards(ColumnId::Done)
    }

    pub fn columns(&self) -> Vec<ColumnView> {
        self.read().columns()
    }

    // ── Loading ──

    /// Fetch the category list. On failure the built-in categories are
    /// installed and cached cards are loaded. Returns whether the API answered.
    pub async fn fetch_categories(&self) -> bool {
        let _guard = self.mutation.lock().await;
        self.begin();
        let ok = self.load_categories().await;
        self.finish();
        ok
    }

    /// Fetch all cards, replacing the in-memory collection. On failure the
    /// cached cards are loaded instead. Returns whether the API answered.
    pub async fn fetch_cards(&self) -> bool {
        let _guard = self.mutation.lock().await;
        self.begin();
        let ok = self.load_cards().await;
        self.finish();
        ok
    }

    async fn load_categories(&self) -> bool {
        let result = match self.api.get_categories().await {
            Ok(payloads) => payloads
                .into_iter()
                .map(Category::from_payload)
                .collect::<CoreResult<Vec<_>>>(),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(categories) => {
                debug!(count = categories.len(), "Categories loaded");
                self.write().categories = categories;
                true
            }
            Err(e) => {
                self.fail("Failed to load categories", &e);
                self.write().categories = fallback_categories();
                self.load_cached().await;
                false
            }
        }
    }

    async fn load_cards(&self) -> bool {
        let result = match self.api.get_cards(None).await {
            Ok(payloads) => payloads
                .into_iter()
                .map(Card::from_payload)
                .collect::<CoreResult<Vec<_>>>(),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(cards) => {
                debug!(count = cards.len(), "Cards loaded");
                self.write().replace_cards(cards);
                self.persist().await;
                true
            }
            Err(e) => {
                self.fail("Failed to load cards", &e);
                self.load_cached().await;
                false
            }
        }
    }

    // ── Mutations ──

    /// Create a card with a fresh id.
    ///
    /// Returns the server's card, or the locally built one when the API
    /// call failed. Only validation errors are returned as `Err`.
    pub async fn create_card(&self, new_card: NewCard) -> CoreResult<Card> {
        new_card.validate()?;

        let _guard = self.mutation.lock().await;
        self.begin();

        let local = new_card.into_card(Uuid::new_v4().to_string(), Utc::now());
        let result = match self.api.create_card(&local.to_new_payload()).await {
            Ok(payload) => Card::from_payload(payload),
            Err(e) => Err(e.into()),
        };

        let card = match result {
            Ok(card) => {
                info!(card_id = %card.id, "Card created");
                card
            }
            Err(e) => {
                self.fail("Failed to create card", &e);
                local
            }
        };
        self.write().upsert_card(card.clone());
        self.persist().await;

        self.finish();
        Ok(card)
    }

    /// Update some fields of a card.
    ///
    /// Returns the updated card, or `None` when the API call failed and the
    /// card is not known locally either.
    pub async fn update_card(&self, id: &str, updates: CardUpdate) -> CoreResult<Option<Card>> {
        updates.validate()?;

        let _guard = self.mutation.lock().await;
        self.begin();

        let result = match self.api.update_card(id, &updates.to_payload()).await {
            Ok(payload) => Card::from_payload(payload),
            Err(e) => Err(e.into()),
        };

        let card = match result {
            Ok(card) => {
                info!(card_id = %card.id, "Card updated");
                self.write().upsert_card(card.clone());
                Some(card)
            }
            Err(e) => {
                self.fail("Failed to update card", &e);
                self.write().card_mut(id).map(|card| {
                    updates.apply_to(card);
                    card.clone()
                })
            }
        };
        self.persist().await;

        self.finish();
        Ok(card)
    }

    /// Move a card to another column. Only the column changes.
    pub async fn move_card(&self, id: &str, column_id: ColumnId) -> Option<Card> {
        let _guard = self.mutation.lock().await;
        self.begin();

        let result = match self.api.move_card(id, column_id.as_str()).await {
            Ok(payload) => Card::from_payload(payload),
            Err(e) => Err(e.into()),
        };

        let card = match result {
            Ok(card) => {
                info!(card_id = %card.id, column = %card.column_id, "Card moved");
                self.write().upsert_card(card.clone());
                Some(card)
            }
            Err(e) => {
                self.fail("Failed to move card", &e);
                self.write().card_mut(id).map(|card| {
                    card.column_id = column_id;
                    card.touch();
                    card.clone()
                })
            }
        };
        self.persist().await;

        self.finish();
        card
    }

    /// Delete a card. Returns whether it was removed.
    ///
    /// When the API call fails the card is left in place; the server stays
    /// the authority on deletion.
    pub async fn delete_card(&self, id: &str) -> bool {
        let _guard = self.mutation.lock().await;
        self.begin();

        let removed = match self.api.delete_card(id).await {
            Ok(()) => {
                info!(card_id = %id, "Card deleted");
                self.write().remove_card(id)
            }
            Err(e) => {
                self.fail("Failed to delete card", &e.into());
                false
            }
        };
        self.persist().await;

        self.finish();
        removed
    }

    /// Select the category the views are scoped to. Does not refetch.
    pub async fn set_active_category(&self, category_id: CategoryId) {
        let _guard = self.mutation.lock().await;
        self.write().active_category = category_id;
        self.persist().await;
    }

    /// Drop every card from memory and remove the cached blob.
    /// Categories and the selector are kept.
    pub async fn clear_all_data(&self) {
        let _guard = self.mutation.lock().await;
        self.write().cards.clear();
        if let Err(e) = self.storage.remove(&self.storage_key).await {
            warn!(key = %self.storage_key, error = %e, "Failed to remove cached board");
        }
        info!("Board data cleared");
    }

    /// Mirror the cards and selector to the blob store.
    pub async fn save_to_storage(&self) {
        let _guard = self.mutation.lock().await;
        self.persist().await;
    }

    /// Replace cards (and selector, if present) with the cached blob.
    /// Returns whether a cached board was applied.
    pub async fn load_from_storage(&self) -> bool {
        let _guard = self.mutation.lock().await;
        self.load_cached().await
    }

    // ── Internals ──

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) {
        let mut state = self.write();
        state.loading = true;
        state.error = None;
    }

    fn finish(&self) {
        self.write().loading = false;
    }

    fn fail(&self, message: &str, err: &CoreError) {
        error!(error = %err, "{}", message);
        self.write().error = Some(message.to_string());
    }

    async fn persist(&self) {
        let blob = {
            let state = self.read();
            codec::encode(&state.cards, state.active_category)
        };
        let blob = match blob {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to encode board for storage");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.storage_key, &blob).await {
            warn!(key = %self.storage_key, error = %e, "Failed to save board to storage");
        }
    }

    async fn read_cached(&self) -> Option<StoredBoard> {
        let blob = match self.storage.get(&self.storage_key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = %self.storage_key, "No cached board");
                return None;
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "Failed to read cached board");
                return None;
            }
        };
        match codec::decode(&blob) {
            Ok(stored) => Some(stored),
            Err(e) => {
                error!(error = %e, "Failed to load from storage");
                None
            }
        }
    }

    async fn load_cached(&self) -> bool {
        let Some(stored) = self.read_cached().await else {
            return false;
        };
        let mut state = self.write();
        info!(cards = stored.cards.len(), "Loaded board from storage");
        state.cards = stored.cards;
        if let Some(active) = stored.active_category {
            state.active_category = active;
        }
        true
    }
}
