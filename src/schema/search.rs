use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{conforms, entries_are_objects};

pub const SEARCH_MIN_QUERY_LENGTH: usize = 2;

/// What kind of record a search hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResultType {
    Project,
    Experience,
    Certification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    /// Highlighted snippet around the match.
    pub excerpt: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SearchResultType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// Any JSON number; the backend sends integers but nothing guarantees it.
    pub total: f64,
    pub results: Vec<SearchResultItem>,
}

pub fn is_valid_search_result_item(data: &Value) -> bool {
    conforms::<SearchResultItem>(data)
}

pub fn is_valid_search_response(data: &Value) -> bool {
    entries_are_objects(data, "results") && conforms::<SearchResponse>(data)
}
