use serde::{Deserialize, Serialize};

/// A list endpoint response.
///
/// Paginated views answer with a DRF page object while the admin views
/// answer with a bare array; both collapse into [`Page::into_items`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Paginated {
        count: u64,
        next: Option<String>,
        previous: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> Page<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results, .. } => results,
            Self::Bare(items) => items,
        }
    }

    /// Total count reported by the server, or the length of a bare list.
    pub fn total(&self) -> u64 {
        match self {
            Self::Paginated { count, .. } => *count,
            Self::Bare(items) => items.len() as u64,
        }
    }
}
