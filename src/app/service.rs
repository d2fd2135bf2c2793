use crate::core::identity::{normalize_size, LineKey};
use crate::core::reconciler::{reconcile, SnapshotEntry};
use crate::core::store::CartStore;
use crate::domain::model::{CartItemView, SyncNotice};
use crate::domain::ports::{Catalog, CartRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub cart_items: Vec<SyncEntryDto>,
}

/// One saved line from the client's local cart. The id field is `_id` for
/// compatibility with the storefront's existing sync payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncEntryDto {
    #[serde(rename = "_id")]
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_items: Vec<CartItemView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_messages: Option<Vec<SyncNotice>>,
}

impl CartResponse {
    fn from_view(view: crate::domain::model::CartView) -> Self {
        Self {
            cart_items: view.items,
            validation_messages: None,
        }
    }
}

/// The surface the HTTP layer consumes; one method per route.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn get_cart(&self, user_id: &str) -> Result<CartResponse>;
    async fn add_item(&self, user_id: &str, request: AddItemRequest) -> Result<CartResponse>;
    async fn update_item(
        &self,
        user_id: &str,
        product_id: &str,
        request: UpdateItemRequest,
    ) -> Result<CartResponse>;
    async fn remove_item(
        &self,
        user_id: &str,
        product_id: &str,
        size: Option<&str>,
    ) -> Result<CartResponse>;
    async fn clear_cart(&self, user_id: &str) -> Result<CartResponse>;
    async fn sync_cart(&self, user_id: &str, request: SyncRequest) -> Result<CartResponse>;
}

/// Cart application service. Mutations for one user are serialized through
/// a per-user mutex, so a rapid double-submit cannot lose an update; the
/// underlying document store itself is last-write-wins.
pub struct CartService<C: Catalog, R: CartRepository> {
    store: CartStore<C, R>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<C: Catalog, R: CartRepository> CartService<C, R> {
    pub fn new(catalog: C, repo: R) -> Self {
        Self {
            store: CartStore::new(catalog, repo),
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Collapse duplicate identities in a client snapshot by summing their
/// quantities, keeping first-occurrence order. Reconciliation itself
/// assumes distinct identities per entry.
pub fn merge_snapshot(entries: &[SyncEntryDto]) -> Vec<SnapshotEntry> {
    let mut order: Vec<LineKey> = Vec::new();
    let mut merged: HashMap<LineKey, SnapshotEntry> = HashMap::new();

    for dto in entries {
        let size = normalize_size(dto.size.as_deref());
        let key = LineKey::new(dto.product_id.clone(), size.as_deref());
        match merged.entry(key) {
            std::collections::hash_map::Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.requested = entry.requested.saturating_add(dto.quantity);
            }
            std::collections::hash_map::Entry::Vacant(vacant) => {
                order.push(vacant.key().clone());
                vacant.insert(SnapshotEntry {
                    product_id: dto.product_id.clone(),
                    size,
                    requested: dto.quantity,
                });
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}

#[async_trait]
impl<C: Catalog, R: CartRepository> CartApi for CartService<C, R> {
    async fn get_cart(&self, user_id: &str) -> Result<CartResponse> {
        Ok(CartResponse::from_view(self.store.current(user_id).await?))
    }

    async fn add_item(&self, user_id: &str, request: AddItemRequest) -> Result<CartResponse> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let view = self
            .store
            .add(
                user_id,
                &request.product_id,
                request.size.as_deref(),
                request.quantity,
            )
            .await?;
        tracing::info!("🛒 Added {} x{} for user {}", request.product_id, request.quantity, user_id);
        Ok(CartResponse::from_view(view))
    }

    async fn update_item(
        &self,
        user_id: &str,
        product_id: &str,
        request: UpdateItemRequest,
    ) -> Result<CartResponse> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let view = self
            .store
            .update(user_id, product_id, request.size.as_deref(), request.quantity)
            .await?;
        Ok(CartResponse::from_view(view))
    }

    async fn remove_item(
        &self,
        user_id: &str,
        product_id: &str,
        size: Option<&str>,
    ) -> Result<CartResponse> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let view = self.store.remove(user_id, product_id, size).await?;
        Ok(CartResponse::from_view(view))
    }

    async fn clear_cart(&self, user_id: &str) -> Result<CartResponse> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let view = self.store.clear(user_id).await?;
        Ok(CartResponse::from_view(view))
    }

    async fn sync_cart(&self, user_id: &str, request: SyncRequest) -> Result<CartResponse> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let entries = merge_snapshot(&request.cart_items);
        let outcome = reconcile(self.store.catalog(), &entries).await?;
        // 同步是破壞性覆寫：以對帳結果取代整個持久化購物車
        let view = self.store.replace(user_id, outcome.lines).await?;

        tracing::info!(
            "🔄 Cart sync for user {}: {} item(s), {} notice(s)",
            user_id,
            view.items.len(),
            outcome.notices.len()
        );

        Ok(CartResponse {
            cart_items: view.items,
            validation_messages: if outcome.notices.is_empty() {
                None
            } else {
                Some(outcome.notices)
            },
        })
    }
}
