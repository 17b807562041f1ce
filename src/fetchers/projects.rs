use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ErrorReason, ResourceDomain};
use crate::fetchers::{get_validated, lang_and_limit, lang_param, Expected};
use crate::i18n::Language;
use crate::schema::project::{ProjectListResponse, ProjectNavResponse, ProjectResponse};
use crate::schema::Variant;

const LIST: Expected = Expected::new(
    ResourceDomain::Project,
    Variant::List,
    ErrorReason::InvalidListResponse,
);
const FULL_ARRAY: Expected = Expected::new(
    ResourceDomain::Project,
    Variant::FullArray,
    ErrorReason::InvalidResponse,
);
const NAV: Expected = Expected::new(
    ResourceDomain::Project,
    Variant::Nav,
    ErrorReason::InvalidBriefResponse,
);
const FULL: Expected = Expected::new(
    ResourceDomain::Project,
    Variant::Full,
    ErrorReason::InvalidResponse,
);

pub async fn fetch_projects(client: &ApiClient, lang: Language) -> Result<ProjectListResponse, ApiError> {
    get_validated(client, &endpoints::projects::list(), &[lang_param(lang)], LIST).await
}

pub async fn fetch_featured_projects(
    client: &ApiClient,
    lang: Language,
    limit: Option<u32>,
) -> Result<Vec<ProjectResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::projects::featured(),
        &lang_and_limit(lang, limit),
        FULL_ARRAY,
    )
    .await
}

pub async fn fetch_projects_nav(client: &ApiClient, lang: Language) -> Result<ProjectNavResponse, ApiError> {
    get_validated(client, &endpoints::projects::nav(), &[lang_param(lang)], NAV).await
}

pub async fn fetch_project_by_slug(
    client: &ApiClient,
    slug: &str,
    lang: Language,
) -> Result<ProjectResponse, ApiError> {
    get_validated(client, &endpoints::projects::by_slug(slug), &[lang_param(lang)], FULL).await
}
