// ── Catalog context ──
//
// Bundles the product store, confirmation gate, notification queue and
// theme into one explicitly constructed object, and hosts the composite
// flows front ends run on top of them: save-with-feedback and
// confirm-then-delete with rollback.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::error::CoreError;
use crate::modal::{ConfirmGate, ModalKind, ModalOptions};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::notify::NotificationQueue;
use crate::store::ProductStore;
use crate::theme::{Theme, ThemeState};

pub const CREATED_MESSAGE: &str = "Product created successfully!";
pub const UPDATED_MESSAGE: &str = "Product updated successfully!";
pub const DELETE_STARTED_MESSAGE: &str = "Deletion in progress...";

/// What `save` should do.
#[derive(Debug, Clone)]
pub enum SaveTarget {
    Create(ProductCreate),
    Update { id: ProductId, changes: ProductUpdate },
}

/// Result of asking to delete a product.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The user declined, or the question was superseded.
    Cancelled,
    /// The product left the list; the backend call runs in the background.
    Started(DeleteTask),
}

/// Background delete started by [`Catalog::request_delete`].
#[derive(Debug)]
pub struct DeleteTask {
    handle: JoinHandle<Result<(), CoreError>>,
}

impl DeleteTask {
    /// Wait for the backend to answer. On failure the product has already
    /// been restored and an error notification queued.
    pub async fn finished(self) -> Result<(), CoreError> {
        self.handle
            .await
            .unwrap_or_else(|e| Err(CoreError::Internal(format!("delete task failed: {e}"))))
    }
}

/// The catalog data layer, ready for a front end.
///
/// Cheaply cloneable; clones share every component.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    config: CatalogConfig,
    store: ProductStore,
    modal: ConfirmGate,
    notifications: NotificationQueue,
    theme: ThemeState,
    cancel: CancellationToken,
}

impl Catalog {
    /// Build every component from `config`, starting with the light theme.
    pub fn new(config: CatalogConfig) -> Result<Self, CoreError> {
        Self::with_theme(config, Theme::default())
    }

    /// Like [`new`](Self::new) with a restored theme preference.
    pub fn with_theme(config: CatalogConfig, theme: Theme) -> Result<Self, CoreError> {
        let store = ProductStore::new(&config)?;
        Ok(Self::from_parts(config, store, theme))
    }

    /// Assemble a catalog around an existing store.
    pub fn from_parts(config: CatalogConfig, store: ProductStore, theme: Theme) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                config,
                store,
                modal: ConfirmGate::new(),
                notifications: NotificationQueue::new(),
                theme: ThemeState::new(theme),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &ProductStore {
        &self.inner.store
    }

    pub fn modal(&self) -> &ConfirmGate {
        &self.inner.modal
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.inner.notifications
    }

    pub fn theme(&self) -> &ThemeState {
        &self.inner.theme
    }

    // ── Composite flows ──────────────────────────────────────────────

    /// Create or update a product and queue a notification describing
    /// the result.
    ///
    /// An update with no changed fields is rejected before any request,
    /// and so is a create whose fields fail [`ProductCreate::validate`].
    pub async fn save(&self, target: SaveTarget) -> Result<Product, CoreError> {
        let notifications = &self.inner.notifications;
        let (result, success) = match target {
            SaveTarget::Create(data) => {
                data.validate()?;
                (self.inner.store.create(data).await, CREATED_MESSAGE)
            }
            SaveTarget::Update { id, changes } => {
                if changes.is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "no fields to update".into(),
                    });
                }
                (self.inner.store.update(&id, changes).await, UPDATED_MESSAGE)
            }
        };

        match &result {
            Ok(_) => {
                notifications.success(success);
            }
            Err(e) => {
                notifications.error(e.user_message());
            }
        }
        result
    }

    /// Ask for confirmation through the gate, then delete optimistically.
    ///
    /// Resolves once the question is answered. When confirmed, the product
    /// is already gone from the list and the backend call continues in
    /// the returned task; a failure puts the product back.
    pub async fn request_delete(&self, id: &ProductId, name: &str) -> DeleteOutcome {
        let options = ModalOptions::new(
            "Delete Product",
            format!("Are you sure you want to delete \"{name}\"? This action cannot be undone."),
        )
        .confirm_text("Delete")
        .kind(ModalKind::Danger);

        let handle = self.inner.modal.open(options);
        let answer = tokio::select! {
            answer = handle.wait() => answer,
            () = self.inner.cancel.cancelled() => None,
        };
        if answer != Some(true) {
            debug!(%id, ?answer, "delete not confirmed");
            return DeleteOutcome::Cancelled;
        }

        let delete = self.inner.store.delete(id);
        self.inner.notifications.success(DELETE_STARTED_MESSAGE);

        let notifications = self.inner.notifications.clone();
        let cancel = self.inner.cancel.child_token();
        let name = name.to_owned();
        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                result = delete => result,
                () = cancel.cancelled() => {
                    return Err(CoreError::Internal("delete abandoned at shutdown".into()));
                }
            };
            match &result {
                Ok(()) => {
                    notifications.success(format!("Product \"{name}\" deleted successfully"));
                }
                Err(_) => {
                    notifications.error(format!(
                        "Failed to delete \"{name}\". The item has been restored."
                    ));
                }
            }
            result
        });

        DeleteOutcome::Started(DeleteTask { handle })
    }

    /// Tear down: abandon background deletes, close any pending question
    /// and stop notification timers. Abandoned deletes put their product
    /// back in the list.
    pub fn shutdown(&self) {
        info!("catalog shutting down");
        self.inner.cancel.cancel();
        self.inner.modal.close();
        self.inner.notifications.shutdown();
    }
}
