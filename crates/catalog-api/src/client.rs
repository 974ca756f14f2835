// HTTP client for the product catalog backend.
//
// Wraps `reqwest::Client` with URL construction for the `/products`
// resource, total-count header extraction, and uniform error mapping.

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{ProductCreateRequest, ProductPage, ProductResponse, ProductUpdateRequest};

/// Header carrying the number of records matching a list query.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

const PRODUCTS: &str = "products";

/// Async client for the `/products` REST resource.
///
/// Every method returns decoded payloads; non-success statuses are turned
/// into [`Error::Api`] before the caller sees the response.
pub struct ProductsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProductsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the backend rooted at `base_url`
    /// (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parse the base URL and make sure it can carry path segments.
    /// A trailing `/products` is stripped so either form is accepted.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        let path = path.strip_suffix("/products").unwrap_or(&path).to_owned();
        url.set_path(&path);
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/products` or `{base}/products/{id}`, with the id
    /// percent-encoded as a single path segment.
    fn products_url(&self, id: Option<&str>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(PRODUCTS);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        decode_body(body)
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw.chars().take(200).collect()
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET /products?{params}`.
    ///
    /// `params` are sent verbatim as query pairs. The total match count is
    /// read from the `X-Total-Count` header when present.
    pub async fn list_products(&self, params: &[(String, String)]) -> Result<ProductPage, Error> {
        let url = self.products_url(None)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let total_count = total_count(resp.headers());
        trace!(?total_count, "list response headers parsed");

        let body = resp.text().await?;
        let items: Vec<ProductResponse> = decode_body(body)?;
        Ok(ProductPage { items, total_count })
    }

    /// `GET /products/:id`.
    pub async fn get_product(&self, id: &str) -> Result<ProductResponse, Error> {
        self.get(self.products_url(Some(id))?).await
    }

    /// `POST /products`.
    pub async fn create_product(
        &self,
        body: &ProductCreateRequest,
    ) -> Result<ProductResponse, Error> {
        self.post(self.products_url(None)?, body).await
    }

    /// `PATCH /products/:id`.
    pub async fn update_product(
        &self,
        id: &str,
        body: &ProductUpdateRequest,
    ) -> Result<ProductResponse, Error> {
        self.patch(self.products_url(Some(id))?, body).await
    }

    /// `DELETE /products/:id`.
    pub async fn delete_product(&self, id: &str) -> Result<(), Error> {
        self.delete(self.products_url(Some(id))?).await
    }
}

fn decode_body<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ProductsClient {
        ProductsClient::with_client(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn products_url_appends_resource() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.products_url(None).unwrap().as_str(),
            "http://localhost:3000/products"
        );
    }

    #[test]
    fn products_url_accepts_resource_in_base() {
        let c = client("http://localhost:3000/api/products/");
        assert_eq!(
            c.products_url(Some("42")).unwrap().as_str(),
            "http://localhost:3000/api/products/42"
        );
    }

    #[test]
    fn product_id_is_a_single_encoded_segment() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.products_url(Some("a/b")).unwrap().as_str(),
            "http://localhost:3000/products/a%2Fb"
        );
    }

    #[test]
    fn non_base_url_is_rejected() {
        let result = ProductsClient::with_client(reqwest::Client::new(), "mailto:shop@example.com");
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn total_count_header_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT_HEADER, "25".parse().unwrap());
        assert_eq!(total_count(&headers), Some(25));

        headers.insert(TOTAL_COUNT_HEADER, "many".parse().unwrap());
        assert_eq!(total_count(&headers), None);
    }
}
