// Wire types for the /products resource.
//
// Field names follow the backend's camelCase JSON. Everything except the
// id is defaulted on read so partially populated records still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Backends like json-server hand out numeric ids for some records and
    /// string ids for others; both are accepted and kept as a string.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<ProductResponse>,
    /// Value of the `X-Total-Count` header, when the backend sent one.
    pub total_count: Option<u64>,
}

/// `POST /products` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub stock: u32,
    pub rating: f64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `PATCH /products/:id` body. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_id_decodes_as_string() {
        let p: ProductResponse = serde_json::from_value(json!({
            "id": 7,
            "name": "Lamp",
            "price": 12.5
        }))
        .unwrap();
        assert_eq!(p.id, "7");
        assert_eq!(p.stock, 0);
        assert!(p.tags.is_empty());
        assert!(p.created_at.is_none());
    }

    #[test]
    fn camel_case_fields_decode() {
        let p: ProductResponse = serde_json::from_value(json!({
            "id": "a1",
            "name": "Desk",
            "imageUrl": "https://img/desk.png",
            "createdAt": "2024-06-15T10:30:00Z"
        }))
        .unwrap();
        assert_eq!(p.image_url, "https://img/desk.png");
        assert!(p.created_at.is_some());
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let body = ProductUpdateRequest {
            price: Some(19.0),
            ..ProductUpdateRequest::default()
        };
        let value = serde_json::to_value(&body).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("price"));
        assert!(obj.contains_key("updatedAt"));
        assert!(!obj.contains_key("name"));
    }
}
