// ── API-to-domain type conversions ──
//
// Bridges `catalog_api` wire types and `catalog_core::model` domain types.
// Outgoing bodies get their timestamps stamped here so callers never
// forget `updatedAt`.

use chrono::{DateTime, Utc};

use catalog_api::{ProductCreateRequest, ProductResponse, ProductUpdateRequest};

use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};

impl From<ProductResponse> for Product {
    fn from(r: ProductResponse) -> Self {
        Self {
            id: ProductId::from(r.id),
            name: r.name,
            description: r.description,
            price: r.price,
            category: r.category,
            image_url: r.image_url,
            stock: r.stock,
            rating: r.rating,
            tags: r.tags,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// `POST` body for `data`, with both timestamps set to `now`.
pub(crate) fn create_request(data: &ProductCreate, now: DateTime<Utc>) -> ProductCreateRequest {
    ProductCreateRequest {
        name: data.name.clone(),
        description: data.description.clone(),
        price: data.price,
        category: data.category.clone(),
        image_url: data.image_url.clone(),
        stock: data.stock,
        rating: data.rating,
        tags: data.tags.clone(),
        created_at: now,
        updated_at: now,
    }
}

/// `PATCH` body for `changes`, with `updatedAt` set to `now`.
pub(crate) fn update_request(changes: ProductUpdate, now: DateTime<Utc>) -> ProductUpdateRequest {
    ProductUpdateRequest {
        name: changes.name,
        description: changes.description,
        price: changes.price,
        category: changes.category,
        image_url: changes.image_url,
        stock: changes.stock,
        rating: changes.rating,
        tags: changes.tags,
        updated_at: now,
    }
}
