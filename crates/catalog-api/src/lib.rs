// catalog-api: Async Rust client for the product catalog REST backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ProductsClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{ProductCreateRequest, ProductPage, ProductResponse, ProductUpdateRequest};
