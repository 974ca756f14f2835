// ── Product store ──
//
// Owns the displayed product list and its derived state (total count,
// loading flag, last error). Reads go through the response cache;
// mutations wipe it and apply optimistic or confirmed edits to the list.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use catalog_api::{ProductsClient, TlsMode, TransportConfig};

use super::cache::{CachedPage, ResponseCache};
use super::entries::{ListEntry, ProductList, Snapshot};
use crate::config::{CatalogConfig, TlsVerification};
use crate::convert::{create_request, update_request};
use crate::error::CoreError;
use crate::model::{Product, ProductCreate, ProductFilters, ProductId, ProductUpdate};
use crate::query::{CanonicalQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::stream::StateStream;

pub const LOAD_FAILED: &str = "Failed to load products. Please try again later.";
pub const NOT_FOUND: &str = "Product not found.";
pub const CREATE_FAILED: &str = "Failed to create product.";
pub const UPDATE_FAILED: &str = "Failed to update product.";
pub const DELETE_FAILED: &str = "Failed to delete product.";

/// Page and page size of the most recent `list` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
}

/// Reactive, cache-backed store for catalog products.
///
/// Cheap to clone; clones share state. Every piece of state lives behind a
/// `watch` channel, so readers take snapshots and subscribers are pushed
/// each change. No lock is held across an `.await`.
#[derive(Clone)]
pub struct ProductStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    client: ProductsClient,
    cache: ResponseCache,
    products: ProductList,
    total_count: watch::Sender<u64>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    page: watch::Sender<PageInfo>,
    default_limit: u32,
}

/// Clears the loading flag on drop, whichever way the request ends.
struct LoadingGuard<'a> {
    loading: &'a watch::Sender<bool>,
}

impl<'a> LoadingGuard<'a> {
    fn start(loading: &'a watch::Sender<bool>) -> Self {
        loading.send_replace(true);
        Self { loading }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.send_replace(false);
    }
}

/// Optimistic list edit still waiting for the backend.
enum Undo {
    RemovePlaceholder(ProductId),
    Restore { index: usize, entry: Box<ListEntry> },
}

/// Reverts an optimistic edit on drop unless disarmed first.
struct Rollback {
    inner: Arc<StoreInner>,
    undo: Option<Undo>,
}

impl Rollback {
    fn arm(inner: &Arc<StoreInner>, undo: Undo) -> Self {
        Self {
            inner: Arc::clone(inner),
            undo: Some(undo),
        }
    }

    fn disarmed(inner: &Arc<StoreInner>) -> Self {
        Self {
            inner: Arc::clone(inner),
            undo: None,
        }
    }

    fn disarm(&mut self) {
        self.undo = None;
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        match self.undo.take() {
            Some(Undo::RemovePlaceholder(temp_id)) => {
                debug!(%temp_id, "rolling back optimistic create");
                self.inner.products.remove(&temp_id);
            }
            Some(Undo::Restore { index, entry }) => {
                debug!(id = %entry.id(), index, "rolling back optimistic delete");
                self.inner.products.restore(index, *entry);
            }
            None => {}
        }
    }
}

impl ProductStore {
    /// Build a store talking to the backend described by `config`.
    pub fn new(config: &CatalogConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = ProductsClient::new(&config.api_url, &transport)?;
        Ok(Self::with_client(client, config.page_limit))
    }

    /// Build a store around an existing client. `default_limit` is the
    /// page size used when a request names none.
    pub fn with_client(client: ProductsClient, default_limit: u32) -> Self {
        let default_limit = if default_limit == 0 {
            DEFAULT_LIMIT
        } else {
            default_limit
        };
        let (total_count, _) = watch::channel(0);
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        let (page, _) = watch::channel(PageInfo {
            page: DEFAULT_PAGE,
            limit: default_limit,
        });

        Self {
            inner: Arc::new(StoreInner {
                client,
                cache: ResponseCache::new(),
                products: ProductList::new(),
                total_count,
                loading,
                error,
                page,
                default_limit,
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch one page of products matching `filters`.
    ///
    /// Served from the cache when an identical request succeeded before
    /// and no mutation has happened since.
    pub async fn list(&self, filters: &ProductFilters) -> Result<Vec<Product>, CoreError> {
        let inner = &self.inner;
        let _loading = LoadingGuard::start(&inner.loading);
        inner.error.send_replace(None);

        let query = CanonicalQuery::build(filters, inner.default_limit);
        inner.page.send_replace(PageInfo {
            page: query.page(),
            limit: query.limit(),
        });

        if let Some(hit) = inner.cache.get(query.key()) {
            debug!(key = query.key(), "product list cache hit");
            inner.products.replace_all(hit.products.clone());
            inner.total_count.send_replace(hit.total);
            return Ok(hit.products.clone());
        }
        debug!(key = query.key(), "product list cache miss");

        let page = inner
            .client
            .list_products(&query.params())
            .await
            .map_err(|e| inner.fail(LOAD_FAILED, &e))?;

        let products: Vec<Product> = page.items.into_iter().map(Product::from).collect();
        let total = page
            .total_count
            .unwrap_or_else(|| u64::try_from(products.len()).unwrap_or(u64::MAX));

        inner.cache.put(
            query.key(),
            CachedPage {
                products: products.clone(),
                total,
            },
        );
        inner.products.replace_all(products.clone());
        inner.total_count.send_replace(total);
        Ok(products)
    }

    /// Look up a single product, preferring the displayed list.
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Product, CoreError> {
        let inner = &self.inner;
        if let Some(product) = inner.products.get(id) {
            debug!(%id, "product served from local list");
            return Ok(product);
        }

        let _loading = LoadingGuard::start(&inner.loading);
        match inner.client.get_product(id.as_str()).await {
            Ok(resp) => Ok(Product::from(resp)),
            Err(e) if e.is_not_found() => {
                inner.record(NOT_FOUND, &e);
                Err(CoreError::NotFound {
                    entity_type: "product".into(),
                    identifier: id.to_string(),
                })
            }
            Err(e) => Err(inner.fail(NOT_FOUND, &e)),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a product optimistically.
    ///
    /// The placeholder is inserted at the front of the list before this
    /// method returns, so subscribers see it while the request is in
    /// flight. The returned future reconciles it on success; failure or
    /// dropping the future unfinished removes it.
    pub fn create(
        &self,
        data: ProductCreate,
    ) -> impl Future<Output = Result<Product, CoreError>> + Send + use<> {
        let inner = Arc::clone(&self.inner);
        inner.cache.clear();

        let now = Utc::now();
        let temp_id = ProductId::temporary();
        inner.products.prepend(ListEntry::Pending {
            product: data.to_placeholder(temp_id.clone(), now),
            temp_id: temp_id.clone(),
        });
        let body = create_request(&data, now);
        let mut rollback = Rollback::arm(&inner, Undo::RemovePlaceholder(temp_id.clone()));

        async move {
            match inner.client.create_product(&body).await {
                Ok(resp) => {
                    rollback.disarm();
                    let product = Product::from(resp);
                    info!(id = %product.id, name = %product.name, "product created");
                    inner.products.reconcile(&temp_id, product.clone());
                    Ok(product)
                }
                Err(e) => {
                    drop(rollback);
                    Err(inner.fail(CREATE_FAILED, &e))
                }
            }
        }
    }

    /// Apply a partial update. The list changes only once the backend
    /// confirms.
    pub async fn update(&self, id: &ProductId, changes: ProductUpdate) -> Result<Product, CoreError> {
        let inner = &self.inner;
        inner.cache.clear();

        let body = update_request(changes, Utc::now());
        let resp = inner
            .client
            .update_product(id.as_str(), &body)
            .await
            .map_err(|e| inner.fail(UPDATE_FAILED, &e))?;

        let product = Product::from(resp);
        info!(id = %product.id, "product updated");
        inner.products.replace(product.clone());
        Ok(product)
    }

    /// Delete a product optimistically.
    ///
    /// The entry leaves the list before this method returns. If the
    /// backend refuses, or the future is dropped before the backend
    /// answers, it goes back where it was.
    pub fn delete(&self, id: &ProductId) -> impl Future<Output = Result<(), CoreError>> + Send + use<> {
        let inner = Arc::clone(&self.inner);
        inner.cache.clear();

        let id = id.clone();
        let mut rollback = match inner.products.remove(&id) {
            Some((index, entry)) => Rollback::arm(
                &inner,
                Undo::Restore {
                    index,
                    entry: Box::new(entry),
                },
            ),
            None => Rollback::disarmed(&inner),
        };

        async move {
            match inner.client.delete_product(id.as_str()).await {
                Ok(()) => {
                    rollback.disarm();
                    info!(%id, "product deleted");
                    Ok(())
                }
                Err(e) => {
                    drop(rollback);
                    Err(inner.fail(DELETE_FAILED, &e))
                }
            }
        }
    }

    /// Put `product` into the list without touching the backend. An entry
    /// with the same id is replaced in place.
    pub fn add_locally(&self, product: Product) {
        self.inner.products.upsert(product);
    }

    /// Drop a product from the list without touching the backend.
    pub fn remove_locally(&self, id: &ProductId) -> Option<Product> {
        self.inner
            .products
            .remove(id)
            .map(|(_, entry)| entry.into_product())
    }

    // ── State accessors ──────────────────────────────────────────────

    /// Current list entries, pending placeholders included.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.products.snapshot()
    }

    pub fn products(&self) -> Vec<Product> {
        self.snapshot()
            .iter()
            .map(|entry| entry.product().clone())
            .collect()
    }

    /// Number of entries currently displayed.
    pub fn product_count(&self) -> usize {
        self.inner.products.len()
    }

    pub fn total_count(&self) -> u64 {
        *self.inner.total_count.borrow()
    }

    pub fn loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.error.borrow().clone()
    }

    pub fn page_info(&self) -> PageInfo {
        *self.inner.page.borrow()
    }

    /// `ceil(total_count / limit)` for the last list request.
    pub fn total_pages(&self) -> u64 {
        let limit = u64::from(self.page_info().limit);
        if limit == 0 {
            0
        } else {
            self.total_count().div_ceil(limit)
        }
    }

    /// Number of cached list responses.
    pub fn cached_queries(&self) -> usize {
        self.inner.cache.len()
    }

    /// Forget every cached list response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.clear();
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> StateStream<Snapshot> {
        StateStream::new(self.inner.products.subscribe())
    }

    pub fn subscribe_total_count(&self) -> StateStream<u64> {
        StateStream::new(self.inner.total_count.subscribe())
    }

    pub fn subscribe_loading(&self) -> StateStream<bool> {
        StateStream::new(self.inner.loading.subscribe())
    }

    pub fn subscribe_error(&self) -> StateStream<Option<String>> {
        StateStream::new(self.inner.error.subscribe())
    }
}

impl StoreInner {
    /// Log the technical detail and publish the canned message.
    fn record(&self, message: &str, err: &catalog_api::Error) {
        warn!(error = %err, "{message}");
        self.error.send_replace(Some(message.to_owned()));
    }

    /// `record`, then build the error handed back to the caller.
    fn fail(&self, message: &str, err: &catalog_api::Error) -> CoreError {
        self.record(message, err);
        CoreError::Request {
            message: message.to_owned(),
            reason: err.to_string(),
        }
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
