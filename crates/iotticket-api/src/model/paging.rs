// ── Paging envelope ──

use serde::{Deserialize, Serialize};

/// Generic paging wrapper returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedResult<T> {
    #[serde(rename = "items", default, deserialize_with = "super::null_as_empty")]
    pub result: Vec<T>,
    #[serde(rename = "offset")]
    pub skip: i64,
    #[serde(rename = "limit")]
    pub requested_count: i64,
    #[serde(rename = "fullSize")]
    pub total_count: i64,
}

impl<T> PagedResult<T> {
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn len(&self) -> usize {
        self.result.len()
    }

    /// Whether more items exist beyond this page.
    pub fn has_more(&self) -> bool {
        let seen = self.skip.saturating_add(i64::try_from(self.result.len()).unwrap_or(i64::MAX));
        seen < self.total_count
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.result.iter()
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.result.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.result.iter()
    }
}
