//! Search result types.

use serde::{Deserialize, Serialize};

/// One organic result from the search provider.
///
/// Provider ordering is preserved; no dedup is performed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    /// Publication date, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
