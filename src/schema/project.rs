use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Language;
use crate::schema::common::{nullable, BaseRecord, ListEnvelope, NavEnvelope, ProjectStatus};
use crate::schema::{conforms, conforms_array, conforms_envelope};

/// A project in one language, as served by `/projects/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub slug: String,
    pub language: Language,
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub subtitle: Option<String>,
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub technical_details: Option<String>,
    pub tech_stack: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub github_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub demo_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub website_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub docs_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub blog_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub pypi_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub npm_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub ios_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub android_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub code_snippet: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub code_language: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub code_filename: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub banner_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub screenshots: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub stars_count: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub forks_count: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub downloads_count: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub users_count: Option<i64>,
    pub display_order: i64,
    pub is_complete: bool,
    pub is_featured: bool,
    #[serde(deserialize_with = "nullable")]
    pub status: Option<ProjectStatus>,
    #[serde(deserialize_with = "nullable")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub end_date: Option<String>,
}

/// Sidebar projection of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBriefResponse {
    pub slug: String,
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub status: Option<ProjectStatus>,
    pub is_featured: bool,
}

pub type ProjectListResponse = ListEnvelope<ProjectResponse>;
pub type ProjectNavResponse = NavEnvelope<ProjectBriefResponse>;

pub fn is_valid_project_response(data: &Value) -> bool {
    conforms::<ProjectResponse>(data)
}

pub fn is_valid_project_brief_response(data: &Value) -> bool {
    conforms::<ProjectBriefResponse>(data)
}

pub fn is_valid_project_list_response(data: &Value) -> bool {
    conforms_envelope::<ProjectListResponse>(data)
}

pub fn is_valid_project_nav_response(data: &Value) -> bool {
    conforms_envelope::<ProjectNavResponse>(data)
}

pub fn is_valid_project_array_response(data: &Value) -> bool {
    conforms_array::<ProjectResponse>(data)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn project(slug: &str, language: &str) -> Value {
        json!({
            "id": "0b5c4f3e-8a1d-4f6b-9c2e-1d3f5a7b9c0e",
            "created_at": "2025-01-10T08:00:00Z",
            "updated_at": "2025-02-01T12:30:00Z",
            "slug": slug,
            "language": language,
            "title": "Fullstack Template",
            "subtitle": "Production-ready starter",
            "description": "FastAPI + React template",
            "technical_details": null,
            "tech_stack": ["python", "typescript"],
            "github_url": "https://github.com/example/fullstack-template",
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
            "screenshots": ["one.png"],
            "stars_count": 120,
            "forks_count": null,
            "downloads_count": null,
            "users_count": null,
            "display_order": 1,
            "is_complete": true,
            "is_featured": true,
            "status": "active",
            "start_date": "2024-06-01",
            "end_date": null
        })
    }

    pub fn project_brief(slug: &str) -> Value {
        json!({
            "slug": slug,
            "title": "Fullstack Template",
            "subtitle": null,
            "status": "maintained",
            "is_featured": false
        })
    }
}
