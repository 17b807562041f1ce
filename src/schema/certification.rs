use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Language;
use crate::schema::common::{nullable, BaseRecord, CertificationCategory, ListEnvelope};
use crate::schema::{conforms, conforms_array, conforms_envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationResponse {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub language: Language,
    pub name: String,
    pub issuer: String,
    #[serde(deserialize_with = "nullable")]
    pub issuer_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub issuer_logo_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub credential_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub verification_url: Option<String>,
    pub date_obtained: String,
    #[serde(deserialize_with = "nullable")]
    pub expiry_date: Option<String>,
    pub is_expired: bool,
    #[serde(deserialize_with = "nullable")]
    pub badge_image_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub category: Option<CertificationCategory>,
    pub display_order: i64,
    pub is_visible: bool,
}

/// Badge wall entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationBriefResponse {
    pub name: String,
    pub issuer: String,
    #[serde(deserialize_with = "nullable")]
    pub badge_image_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub category: Option<CertificationCategory>,
    pub is_expired: bool,
}

pub type CertificationListResponse = ListEnvelope<CertificationResponse>;

pub fn is_valid_certification_response(data: &Value) -> bool {
    conforms::<CertificationResponse>(data)
}

pub fn is_valid_certification_list_response(data: &Value) -> bool {
    conforms_envelope::<CertificationListResponse>(data)
}

pub fn is_valid_certification_brief_array_response(data: &Value) -> bool {
    conforms_array::<CertificationBriefResponse>(data)
}

pub fn is_valid_certification_array_response(data: &Value) -> bool {
    conforms_array::<CertificationResponse>(data)
}
