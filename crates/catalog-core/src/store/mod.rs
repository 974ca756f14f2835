// ── Reactive product store ──
//
// Response cache, ordered product list, and the store that ties them to
// the backend client.

mod cache;
mod entries;
mod product_store;

pub use cache::{CachedPage, ResponseCache};
pub use entries::ListEntry;
pub use product_store::{
    CREATE_FAILED, DELETE_FAILED, LOAD_FAILED, NOT_FOUND, PageInfo, ProductStore, UPDATE_FAILED,
};

/// Shared, immutable view of the displayed list.
pub type ProductSnapshot = entries::Snapshot;
