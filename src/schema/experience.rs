use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Language;
use crate::schema::common::{nullable, BaseRecord, EmploymentType, ListEnvelope};
use crate::schema::{conforms, conforms_array, conforms_envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceResponse {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub language: Language,
    pub company: String,
    #[serde(deserialize_with = "nullable")]
    pub company_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub company_logo_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub location: Option<String>,
    pub role: String,
    #[serde(deserialize_with = "nullable")]
    pub department: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub employment_type: Option<EmploymentType>,
    pub start_date: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub responsibilities: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub achievements: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub tech_stack: Option<Vec<String>>,
    pub display_order: i64,
    pub is_visible: bool,
}

/// Timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBriefResponse {
    pub company: String,
    pub role: String,
    pub start_date: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date: Option<String>,
    pub is_current: bool,
}

pub type ExperienceListResponse = ListEnvelope<ExperienceResponse>;

pub fn is_valid_experience_response(data: &Value) -> bool {
    conforms::<ExperienceResponse>(data)
}

pub fn is_valid_experience_list_response(data: &Value) -> bool {
    conforms_envelope::<ExperienceListResponse>(data)
}

pub fn is_valid_experience_brief_array_response(data: &Value) -> bool {
    conforms_array::<ExperienceBriefResponse>(data)
}

pub fn is_valid_experience_array_response(data: &Value) -> bool {
    conforms_array::<ExperienceResponse>(data)
}
