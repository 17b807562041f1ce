use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ErrorReason, ResourceDomain};
use crate::fetchers::{get_validated, lang_param, Expected};
use crate::i18n::Language;
use crate::schema::certification::{
    CertificationBriefResponse, CertificationListResponse, CertificationResponse,
};
use crate::schema::{CertificationCategory, Variant};

const LIST: Expected = Expected::new(
    ResourceDomain::Certification,
    Variant::List,
    ErrorReason::InvalidListResponse,
);
const FULL_ARRAY: Expected = Expected::new(
    ResourceDomain::Certification,
    Variant::FullArray,
    ErrorReason::InvalidResponse,
);
const BADGES: Expected = Expected::new(
    ResourceDomain::Certification,
    Variant::BriefArray,
    ErrorReason::InvalidBriefResponse,
);
const FULL: Expected = Expected::new(
    ResourceDomain::Certification,
    Variant::Full,
    ErrorReason::InvalidResponse,
);

pub async fn fetch_certifications(
    client: &ApiClient,
    lang: Language,
) -> Result<CertificationListResponse, ApiError> {
    get_validated(client, &endpoints::certifications::list(), &[lang_param(lang)], LIST).await
}

pub async fn fetch_active_certifications(
    client: &ApiClient,
    lang: Language,
) -> Result<Vec<CertificationResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::certifications::active(),
        &[lang_param(lang)],
        FULL_ARRAY,
    )
    .await
}

pub async fn fetch_certification_badges(
    client: &ApiClient,
    lang: Language,
) -> Result<Vec<CertificationBriefResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::certifications::badges(),
        &[lang_param(lang)],
        BADGES,
    )
    .await
}

pub async fn fetch_certifications_by_category(
    client: &ApiClient,
    category: CertificationCategory,
    lang: Language,
) -> Result<Vec<CertificationResponse>, ApiError> {
    get_validated(
        client,
        &endpoints::certifications::by_category(category),
        &[lang_param(lang)],
        FULL_ARRAY,
    )
    .await
}

pub async fn fetch_certification_by_id(
    client: &ApiClient,
    id: &str,
    lang: Language,
) -> Result<CertificationResponse, ApiError> {
    get_validated(
        client,
        &endpoints::certifications::by_id(id),
        &[lang_param(lang)],
        FULL,
    )
    .await
}
