use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ErrorReason, ResourceDomain};
use crate::fetchers::{get_validated, lang_and_limit, lang_param, Expected};
use crate::i18n::Language;
use crate::schema::blog::{BlogBriefResponse, BlogListResponse, BlogResponse};
use crate::schema::{BlogCategory, Variant};

const LIST: Expected = Expected::new(
    ResourceDomain::Blog,
    Variant::List,
    ErrorReason::InvalidListResponse,
);
const FULL_ARRAY: Expected = Expected::new(
    ResourceDomain::Blog,
    Variant::FullArray,
    ErrorReason::InvalidResponse,
);
const NAV: Expected = Expected::new(
    ResourceDomain::Blog,
    Variant::BriefArray,
    ErrorReason::InvalidBriefResponse,
);
const FULL: Expected = Expected::new(
    ResourceDomain::Blog,
    Variant::Full,
    ErrorReason::InvalidResponse,
);

pub async fn fetch_blogs(client: &ApiClient, lang: Language) -> Result<BlogListResponse, ApiError> {
    get_validated(client, &endpoints::blogs::list(), &[lang_param(lang)], LIST).await
}

pub async fn fetch_featured_blogs(
    client: &ApiClient,
    lang: Language,
    limit: Option<u32>,
) -> Result<Vec<BlogResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::blogs::featured(),
        &lang_and_limit(lang, limit),
        FULL_ARRAY,
    )
    .await
}

pub async fn fetch_blogs_nav(
    client: &ApiClient,
    lang: Language,
) -> Result<Vec<BlogBriefResponse>, ApiError> {
    get_validated(client, &endpoints::blogs::nav(), &[lang_param(lang)], NAV).await
}

pub async fn fetch_blogs_by_category(
    client: &ApiClient,
    category: BlogCategory,
    lang: Language,
) -> Result<Vec<BlogResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::blogs::by_category(category),
        &[lang_param(lang)],
        FULL_ARRAY,
    )
    .await
}

pub async fn fetch_blog_by_id(
    client: &ApiClient,
    id: &str,
    lang: Language,
) -> Result<BlogResponse, ApiError> {
    get_validated(client, &endpoints::blogs::by_id(id), &[lang_param(lang)], FULL).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::test_support::client_for;
    use crate::schema::blog::fixtures::{blog, blog_brief};
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetch_blogs_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/blogs/category/deep_dive"))
            .and(query_param("lang", "fr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([blog(json!("deep_dive"))])))
            .expect(1)
            .mount(&server)
            .await;

        let blogs = fetch_blogs_by_category(&client_for(&server), BlogCategory::DeepDive, Language::FRENCH)
            .await
            .unwrap();
        assert_eq!(blogs[0].category, Some(BlogCategory::DeepDive));
        assert_eq!(blogs[0].language, Language::FRENCH);
    }

    #[tokio::test]
    async fn test_featured_without_limit_omits_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/blogs/featured"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let featured = fetch_featured_blogs(&client_for(&server), Language::ENGLISH, None)
            .await
            .unwrap();
        assert!(featured.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query_pairs().all(|(k, _)| k != "limit"));
    }

    #[tokio::test]
    async fn test_fetch_nav() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/blogs/nav"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([blog_brief()])))
            .mount(&server)
            .await;

        let nav = fetch_blogs_nav(&client_for(&server), Language::ENGLISH).await.unwrap();
        assert!(nav[0].is_featured);
    }

    #[tokio::test]
    async fn test_blog_with_null_category_accepted() {
        let server = MockServer::start().await;
        let id = "1f2e3d4c-5b6a-4978-8695-a4b3c2d1e0f9";
        Mock::given(method("GET"))
            .and(path(format!("/v1/blogs/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(blog(json!(null))))
            .mount(&server)
            .await;

        let record = fetch_blog_by_id(&client_for(&server), id, Language::FRENCH)
            .await
            .unwrap();
        assert_eq!(record.category, None);
    }
}
