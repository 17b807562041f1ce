use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ErrorReason, ResourceDomain};
use crate::fetchers::{get_validated, lang_param, Expected};
use crate::i18n::Language;
use crate::schema::search::SearchResponse;
use crate::schema::Variant;

const RESPONSE: Expected = Expected::new(
    ResourceDomain::Search,
    Variant::Full,
    ErrorReason::InvalidResponse,
);

pub async fn fetch_search_results(
    client: &ApiClient,
    query: &str,
    lang: Language,
) -> Result<SearchResponse, ApiError> {
    get_validated(
        client,
        &endpoints::search(),
        &[("q", query.to_string()), lang_param(lang)],
        RESPONSE,
    )
    .await
}
