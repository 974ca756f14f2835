// ── Query builder ──
//
// Turns a `ProductFilters` request into the exact query parameters sent to
// the backend. The same parameters, sorted and URL-encoded, form the cache
// key, so two requests that mean the same thing always share one entry.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::ProductFilters;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

pub(crate) const PARAM_SEARCH: &str = "q";
pub(crate) const PARAM_CATEGORY: &str = "category";
pub(crate) const PARAM_MIN_PRICE: &str = "price_gte";
pub(crate) const PARAM_MAX_PRICE: &str = "price_lte";
pub(crate) const PARAM_SORT: &str = "_sort";
pub(crate) const PARAM_ORDER: &str = "_order";
pub(crate) const PARAM_PAGE: &str = "_page";
pub(crate) const PARAM_LIMIT: &str = "_limit";

/// Normalized list request: wire parameters plus their canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalQuery {
    params: BTreeMap<&'static str, String>,
    key: String,
    page: u32,
    limit: u32,
}

impl CanonicalQuery {
    /// Build the canonical form of `filters`.
    ///
    /// Blank strings and zero or non-finite prices are treated as absent.
    /// `page` and `limit` fall back to [`DEFAULT_PAGE`] and `default_limit`
    /// when absent or zero and are always emitted. Sort parameters are
    /// always emitted too, defaulting to `createdAt` descending, so an
    /// absent sort and the explicit default share one key.
    pub fn build(filters: &ProductFilters, default_limit: u32) -> Self {
        let mut params = BTreeMap::new();

        if let Some(search) = non_blank(filters.search.as_deref()) {
            params.insert(PARAM_SEARCH, search.to_owned());
        }
        if let Some(category) = non_blank(filters.category.as_deref()) {
            params.insert(PARAM_CATEGORY, category.to_owned());
        }
        if let Some(min) = non_zero(filters.min_price) {
            params.insert(PARAM_MIN_PRICE, min.to_string());
        }
        if let Some(max) = non_zero(filters.max_price) {
            params.insert(PARAM_MAX_PRICE, max.to_string());
        }
        let sort_by = filters.sort_by.unwrap_or_default();
        let sort_order = filters.sort_order.unwrap_or_default();
        params.insert(PARAM_SORT, sort_by.to_string());
        params.insert(PARAM_ORDER, sort_order.to_string());

        let page = filters.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let fallback_limit = if default_limit == 0 {
            DEFAULT_LIMIT
        } else {
            default_limit
        };
        let limit = filters.limit.filter(|l| *l > 0).unwrap_or(fallback_limit);
        params.insert(PARAM_PAGE, page.to_string());
        params.insert(PARAM_LIMIT, limit.to_string());

        let key = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();

        Self {
            params,
            key,
            page,
            limit,
        }
    }

    /// The cache key: parameters sorted by name, `k=v&k=v`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Owned `(name, value)` pairs ready for the HTTP client.
    pub fn params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    /// Value of a single wire parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl fmt::Display for CanonicalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && v.abs() > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SortField, SortOrder};
    use pretty_assertions::assert_eq;

    fn build(filters: &ProductFilters) -> CanonicalQuery {
        CanonicalQuery::build(filters, DEFAULT_LIMIT)
    }

    #[test]
    fn empty_filters_emit_pagination_and_default_sort() {
        let q = build(&ProductFilters::default());
        assert_eq!(q.key(), "_limit=10&_order=desc&_page=1&_sort=createdAt");
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn explicit_defaults_match_absent_values() {
        let absent = build(&ProductFilters::default());
        let explicit = build(&ProductFilters::default().page(1).limit(10));
        assert_eq!(absent.key(), explicit.key());
    }

    #[test]
    fn field_order_does_not_change_key() {
        let a = ProductFilters {
            search: Some("lamp".into()),
            category: Some("Home".into()),
            ..ProductFilters::default()
        };
        let b = ProductFilters::default().category("Home").search("lamp");
        assert_eq!(build(&a).key(), build(&b).key());
    }

    #[test]
    fn blank_and_zero_values_are_dropped() {
        let q = build(&ProductFilters {
            search: Some("   ".into()),
            category: Some(String::new()),
            min_price: Some(0.0),
            max_price: Some(f64::NAN),
            page: Some(0),
            limit: Some(0),
            ..ProductFilters::default()
        });
        assert_eq!(q.key(), "_limit=10&_order=desc&_page=1&_sort=createdAt");
    }

    #[test]
    fn search_is_trimmed() {
        let q = build(&ProductFilters::default().search("  desk lamp "));
        assert_eq!(q.get(PARAM_SEARCH), Some("desk lamp"));
        assert!(q.key().contains("q=desk+lamp"));
    }

    #[test]
    fn sort_order_defaults_to_desc() {
        let q = build(&ProductFilters {
            sort_by: Some(SortField::CreatedAt),
            ..ProductFilters::default()
        });
        assert_eq!(q.get(PARAM_SORT), Some("createdAt"));
        assert_eq!(q.get(PARAM_ORDER), Some("desc"));
    }

    #[test]
    fn sort_order_without_field_applies_to_created_at() {
        let q = build(&ProductFilters {
            sort_order: Some(SortOrder::Asc),
            ..ProductFilters::default()
        });
        assert_eq!(q.get(PARAM_SORT), Some("createdAt"));
        assert_eq!(q.get(PARAM_ORDER), Some("asc"));
    }

    #[test]
    fn absent_sort_matches_explicit_default_sort() {
        let absent = build(&ProductFilters::default());
        let explicit = build(&ProductFilters::default().sort(SortField::CreatedAt, SortOrder::Desc));
        let field_only = build(&ProductFilters {
            sort_by: Some(SortField::CreatedAt),
            ..ProductFilters::default()
        });
        assert_eq!(absent.key(), explicit.key());
        assert_eq!(absent.key(), field_only.key());
    }

    #[test]
    fn full_request_uses_wire_names() {
        let q = build(&ProductFilters {
            search: Some("chair".into()),
            category: Some("Home".into()),
            min_price: Some(5.0),
            max_price: Some(99.5),
            sort_by: Some(SortField::Price),
            sort_order: Some(SortOrder::Asc),
            page: Some(2),
            limit: Some(8),
        });
        assert_eq!(
            q.key(),
            "_limit=8&_order=asc&_page=2&_sort=price&category=Home&price_gte=5&price_lte=99.5&q=chair"
        );
        assert_eq!(q.params().len(), 8);
    }

    #[test]
    fn store_default_limit_is_used() {
        let q = CanonicalQuery::build(&ProductFilters::default(), 25);
        assert_eq!(q.limit(), 25);
        assert_eq!(q.get(PARAM_LIMIT), Some("25"));
    }
}
