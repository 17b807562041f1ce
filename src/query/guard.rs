//! Enablement predicates for reads. A read whose guard fails stays idle.

use crate::schema::search::SEARCH_MIN_QUERY_LENGTH;

/// Detail reads need an identifier.
pub fn non_empty(id: &str) -> bool {
    !id.is_empty()
}

/// At least `min` characters, counted as chars rather than bytes.
pub fn min_length(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn search_query(q: &str) -> bool {
    min_length(q, SEARCH_MIN_QUERY_LENGTH)
}
