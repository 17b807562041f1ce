//! Integration tests for portfolio-data
//!
//! These tests drive the public `Portfolio` API against a mocked content
//! API and check the combined behavior of keys, fetchers, validation and
//! the cache.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use serial_test::serial;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use portfolio_data::retry::RetryConfig;
use portfolio_data::{
    keys, ApiClient, Config, Language, LanguageStore, Portfolio, QueryState, QueryStrategy,
    ResourceDomain,
};

// ==================== Test Helpers ====================

const SLUG: &str = "fullstack-template";

fn portfolio_for(server: &MockServer, language: Language) -> Portfolio {
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("valid mock URI");
    Portfolio::new(api, Arc::new(LanguageStore::new(language)))
}

/// Portfolio whose reads never retry, so failures settle immediately.
fn no_retry_portfolio(server: &MockServer) -> Portfolio {
    portfolio_for(server, Language::ENGLISH).with_strategies(
        QueryStrategy::static_content().with_retry(RetryConfig::none()),
        QueryStrategy::standard().with_retry(RetryConfig::none()),
    )
}

fn project_json(slug: &str, language: &str) -> Value {
    json!({
        "id": "0b5c4f3e-8a1d-4f6b-9c2e-1d3f5a7b9c0e",
        "created_at": "2025-01-10T08:00:00Z",
        "updated_at": null,
        "slug": slug,
        "language": language,
        "title": "Fullstack Template",
        "subtitle": null,
        "description": "FastAPI + React template",
        "technical_details": null,
        "tech_stack": ["python", "typescript"],
        "github_url": null,
        "demo_url": null,
        "website_url": null,
        "docs_url": null,
        "blog_url": null,
        "pypi_url": null,
        "npm_url": null,
        "ios_url": null,
        "android_url": null,
        "code_snippet": null,
        "code_language": null,
        "code_filename": null,
        "thumbnail_url": null,
        "banner_url": null,
        "screenshots": null,
        "stars_count": 42,
        "forks_count": null,
        "downloads_count": null,
        "users_count": null,
        "display_order": 0,
        "is_complete": true,
        "is_featured": true,
        "status": "active",
        "start_date": null,
        "end_date": null
    })
}

async fn mount_project(server: &MockServer, language: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/projects/{}", SLUG)))
        .and(query_param("lang", language))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_json(SLUG, language))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

// ==================== Detail Read ====================

#[tokio::test]
async fn test_project_detail_settles_into_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/fullstack-template"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(SLUG, "en")))
        .expect(1)
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let handle = portfolio.project(SLUG, None);

    assert_eq!(
        handle.key().tokens(),
        &["projects", "detail", "fullstack-template", "en"]
    );

    let state = handle.settled().await;
    let project = state.data().expect("project should load");
    assert_eq!(project.slug, SLUG);
    assert_eq!(project.language, Language::ENGLISH);
    assert_eq!(project.base.id.as_str(), "0b5c4f3e-8a1d-4f6b-9c2e-1d3f5a7b9c0e");
    assert!(state.is_success());
}

#[tokio::test]
async fn test_language_switch_discards_previous_result() {
    let server = MockServer::start().await;
    mount_project(&server, "en", Duration::from_millis(150)).await;
    mount_project(&server, "zh", Duration::ZERO).await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let handle = portfolio.project(SLUG, None);
    let en_key = handle.key();
    tokio::time::sleep(Duration::from_millis(20)).await;

    portfolio.set_language(Language::MANDARIN).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handle.key(), keys::projects::by_slug(SLUG, Language::MANDARIN));
    assert_eq!(portfolio.queries().observer_count(&en_key), 0);

    let state = handle.settled().await;
    assert_eq!(
        state.data().map(|p| p.language),
        Some(Language::MANDARIN)
    );

    tokio::time::sleep(Duration::from_millis(300)).await;

    let metrics = portfolio.queries().metrics();
    assert_eq!(metrics.discarded, 1);
    assert!(portfolio
        .queries()
        .get_query_data::<portfolio_data::schema::project::ProjectResponse>(&en_key)
        .is_none());
}

#[tokio::test]
async fn test_pinned_language_survives_switch() {
    let server = MockServer::start().await;
    mount_project(&server, "en", Duration::from_millis(50)).await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let handle = portfolio.project(SLUG, Some(Language::ENGLISH));
    portfolio.set_language(Language::MANDARIN).unwrap();

    let state = handle.settled().await;
    assert_eq!(state.data().map(|p| p.language), Some(Language::ENGLISH));
    assert_eq!(portfolio.queries().metrics().discarded, 0);
}

// ==================== Single Flight ====================

#[tokio::test]
async fn test_concurrent_reads_issue_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/blogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [], "total": 0, "skip": 0, "limit": 100}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let a = portfolio.blogs(None);
    let b = portfolio.blogs(None);
    let c = portfolio.blogs(Some(Language::ENGLISH));

    let (sa, sb, sc) = tokio::join!(a.settled(), b.settled(), c.settled());
    assert!(sa.is_success() && sb.is_success() && sc.is_success());

    // Fresh static data is served from cache afterwards.
    let d = portfolio.blogs(None);
    assert!(d.state().is_success());
    assert_eq!(portfolio.queries().metrics().fetches, 1);
}

// ==================== Gates ====================

#[tokio::test]
async fn test_disabled_reads_never_hit_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let search = portfolio.search("r", None);
    let project = portfolio.project("", None);
    let blog = portfolio.blog("", None);

    assert!(search.settled().await.is_idle());
    assert!(project.settled().await.is_idle());
    assert!(blog.refetch().await.is_idle());
}

#[tokio::test]
async fn test_search_enabled_at_two_characters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "rs"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "rs",
            "total": 0,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let state = portfolio.search("rs", None).settled().await;
    assert_eq!(state.data().map(|r| r.total), Some(0.0));
}

// ==================== Errors ====================

#[tokio::test]
async fn test_invalid_body_is_validation_error() {
    let server = MockServer::start().await;
    let mut body = project_json(SLUG, "en");
    body["stars_count"] = json!("42");
    Mock::given(method("GET"))
        .and(path(format!("/v1/projects/{}", SLUG)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let portfolio = no_retry_portfolio(&server);
    let state = portfolio.project(SLUG, None).settled().await;

    let error = state.error().expect("should fail validation");
    assert!(!error.is_transport());
    assert_eq!(error.name(), "ProjectResponseError");
    assert_eq!(
        error.to_string(),
        "ProjectResponseError: Invalid project data from server"
    );
    assert_eq!(error.endpoint(), Some("/v1/projects/fullstack-template"));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/experiences"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let portfolio = no_retry_portfolio(&server);
    let state = portfolio.experiences(None).settled().await;

    let error = state.error().expect("should fail");
    assert!(error.is_transport());
    assert_eq!(error.name(), "TransportError");
}

#[tokio::test]
async fn test_not_found_maps_to_domain_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/certifications/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let portfolio = no_retry_portfolio(&server);
    let state = portfolio.certification("missing", None).settled().await;

    let error = state.error().cloned().expect("should fail");
    assert!(error.is_not_found());

    let mapped = error.into_not_found(ResourceDomain::Certification);
    assert_eq!(
        mapped.to_string(),
        "CertificationResponseError: Certification not found"
    );
}

#[tokio::test]
async fn test_transient_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/certifications/badges"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/certifications/badges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "OSCP",
            "issuer": "OffSec",
            "badge_image_url": null,
            "category": "security",
            "is_expired": false
        }])))
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH).with_strategies(
        QueryStrategy::static_content()
            .with_retry(RetryConfig::new(3).with_initial_delay(Duration::from_millis(5))),
        QueryStrategy::standard(),
    );

    let state = portfolio.certification_badges(None).settled().await;
    assert_eq!(state.data().map(|b| b.len()), Some(1));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 3);
}

// ==================== Envelope Tolerance ====================

#[tokio::test]
async fn test_partial_page_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [project_json("a", "en"), project_json("b", "en")],
            "total": 25,
            "skip": 10,
            "limit": 20
        })))
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let state = portfolio.projects(None).settled().await;
    let list = state.data().expect("list should load");

    assert_eq!(list.items.len(), 2);
    assert_eq!(list.total, 25);
    assert!(list.has_more());
}

// ==================== Invalidation ====================

#[tokio::test]
async fn test_invalidate_resource_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/blogs/nav"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let portfolio = portfolio_for(&server, Language::ENGLISH);
    let nav = portfolio.blogs_nav(None);
    nav.settled().await;

    assert_eq!(portfolio.queries().invalidate(&keys::blogs::all()), 1);
    assert!(nav.settled().await.is_success());
}

// ==================== Configuration ====================

#[tokio::test]
async fn test_from_config_persists_language() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let language_file = temp_dir.path().join("language.json");

    let config = Config {
        api_base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        default_language: Language::ENGLISH,
        language_file: Some(language_file.clone()),
    };

    let portfolio = Portfolio::from_config(&config).expect("portfolio from config");
    assert_eq!(portfolio.language(), Language::ENGLISH);
    portfolio.set_language(Language::SPANISH).unwrap();

    let reloaded = Portfolio::from_config(&config).expect("portfolio from config");
    assert_eq!(reloaded.language(), Language::SPANISH);
}

#[tokio::test]
#[serial]
async fn test_config_from_env_drives_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/experiences/timeline"))
        .and(query_param("lang", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("PORTFOLIO_API_URL", server.uri());
    std::env::set_var("PORTFOLIO_DEFAULT_LANGUAGE", "fr");
    std::env::remove_var("PORTFOLIO_LANGUAGE_FILE");
    std::env::remove_var("PORTFOLIO_API_TIMEOUT_SECS");

    let config = Config::from_env().expect("config should load");
    let portfolio = Portfolio::from_config(&config).expect("portfolio from config");
    let state = portfolio.experience_timeline(None).settled().await;
    assert!(matches!(state, QueryState::Success(ref items) if items.is_empty()));

    std::env::remove_var("PORTFOLIO_API_URL");
    std::env::remove_var("PORTFOLIO_DEFAULT_LANGUAGE");
}

// ==================== Key Properties ====================

fn language() -> impl Strategy<Value = Language> {
    prop::sample::select(vec![
        Language::ENGLISH,
        Language::MANDARIN,
        Language::HINDI,
        Language::SPANISH,
        Language::FRENCH,
        Language::ARABIC,
        Language::PORTUGUESE,
    ])
}

proptest! {
    #[test]
    fn prop_keys_are_deterministic(slug in "[a-z0-9-]{0,24}", lang in language()) {
        prop_assert_eq!(
            keys::projects::by_slug(&slug, lang),
            keys::projects::by_slug(&slug, lang)
        );
        prop_assert_eq!(
            keys::search::query(&slug, lang),
            keys::search::query(&slug, lang)
        );
    }

    #[test]
    fn prop_language_separates_keys(
        id in "[a-f0-9-]{1,36}",
        a in language(),
        b in language(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(keys::blogs::by_id(&id, a), keys::blogs::by_id(&id, b));
        prop_assert_ne!(keys::experiences::by_id(&id, a), keys::experiences::by_id(&id, b));
    }

    #[test]
    fn prop_every_key_extends_its_resource(id in "[a-z]{1,12}", lang in language()) {
        prop_assert!(keys::certifications::by_id(&id, lang).starts_with(&keys::certifications::all()));
        prop_assert!(keys::projects::featured(lang, Some(3)).starts_with(&keys::projects::all()));
        prop_assert!(!keys::blogs::by_id(&id, lang).starts_with(&keys::projects::all()));
    }
}
