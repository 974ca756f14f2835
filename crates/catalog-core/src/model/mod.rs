// ── Domain model ──

mod filters;
mod product;
mod product_id;

pub use filters::{ProductFilters, SortField, SortOrder};
pub use product::{Product, ProductCategory, ProductCreate, ProductUpdate};
pub use product_id::ProductId;
