use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ErrorReason, ResourceDomain};
use crate::fetchers::{get_validated, lang_param, Expected};
use crate::i18n::Language;
use crate::schema::experience::{ExperienceBriefResponse, ExperienceListResponse, ExperienceResponse};
use crate::schema::Variant;

const LIST: Expected = Expected::new(
    ResourceDomain::Experience,
    Variant::List,
    ErrorReason::InvalidListResponse,
);
const FULL_ARRAY: Expected = Expected::new(
    ResourceDomain::Experience,
    Variant::FullArray,
    ErrorReason::InvalidResponse,
);
const TIMELINE: Expected = Expected::new(
    ResourceDomain::Experience,
    Variant::BriefArray,
    ErrorReason::InvalidBriefResponse,
);
const FULL: Expected = Expected::new(
    ResourceDomain::Experience,
    Variant::Full,
    ErrorReason::InvalidResponse,
);

pub async fn fetch_experiences(
    client: &ApiClient,
    lang: Language,
) -> Result<ExperienceListResponse, ApiError> {
    get_validated(client, &endpoints::experiences::list(), &[lang_param(lang)], LIST).await
}

pub async fn fetch_current_experiences(
    client: &ApiClient,
    lang: Language,
) -> Result<Vec<ExperienceResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::experiences::current(),
        &[lang_param(lang)],
        FULL_ARRAY,
    )
    .await
}

pub async fn fetch_experience_timeline(
    client: &ApiClient,
    lang: Language,
) -> Result<Vec<ExperienceBriefResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::experiences::timeline(),
        &[lang_param(lang)],
        TIMELINE,
    )
    .await
}

pub async fn fetch_experience_by_id(
    client: &ApiClient,
    id: &str,
    lang: Language,
) -> Result<ExperienceResponse, ApiError> {
    get_validated(client, &endpoints::experiences::by_id(id), &[lang_param(lang)], FULL).await
}
