//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::url_service::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Pagination query parameters for `GET /v1/api/urls`.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
/// `pageSize` is accepted as an alias of `limit`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListUrlsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default, alias = "pageSize")]
    pub limit: Option<i64>,
}

impl ListUrlsQuery {
    /// Requested page, 1 when absent.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Requested page size, 10 when absent.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> ListUrlsQuery {
        serde_json::from_str(query).unwrap()
    }

    #[test]
    fn test_defaults() {
        let q = parse("{}");
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn test_explicit_values() {
        let q = parse(r#"{"page": "3", "limit": "25"}"#);
        assert_eq!(q.page(), 3);
        assert_eq!(q.limit(), 25);
    }

    #[test]
    fn test_page_size_alias() {
        let q = parse(r#"{"pageSize": "50"}"#);
        assert_eq!(q.limit(), 50);
    }

    #[test]
    fn test_non_numeric_is_error() {
        assert!(serde_json::from_str::<ListUrlsQuery>(r#"{"page": "first"}"#).is_err());
    }
}
