// catalog-core: reactive data layer between catalog front ends and the
// product REST backend.

pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod modal;
pub mod model;
pub mod notify;
pub mod query;
pub mod store;
pub mod stream;
pub mod theme;

pub use catalog::{Catalog, DeleteOutcome, DeleteTask, SaveTarget};
pub use config::{CatalogConfig, TlsVerification};
pub use error::CoreError;
pub use modal::{ConfirmGate, ConfirmHandle, ModalKind, ModalOptions};
pub use model::{
    Product, ProductCategory, ProductCreate, ProductFilters, ProductId, ProductUpdate, SortField,
    SortOrder,
};
pub use notify::{Notification, NotificationKind, NotificationQueue};
pub use query::{CanonicalQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use store::{ListEntry, PageInfo, ProductSnapshot, ProductStore};
pub use stream::StateStream;
pub use theme::{Theme, ThemeState};
