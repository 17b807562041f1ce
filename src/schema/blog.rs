use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Language;
use crate::schema::common::{nullable, BaseRecord, BlogCategory, ListEnvelope};
use crate::schema::{conforms, conforms_array, conforms_envelope};

/// An article hosted elsewhere and linked from the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogResponse {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub language: Language,
    pub title: String,
    pub description: String,
    pub external_url: String,
    #[serde(deserialize_with = "nullable")]
    pub category: Option<BlogCategory>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub published_date: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub read_time_minutes: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub views_count: Option<i64>,
    pub display_order: i64,
    pub is_visible: bool,
    pub is_featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogBriefResponse {
    pub title: String,
    pub external_url: String,
    #[serde(deserialize_with = "nullable")]
    pub category: Option<BlogCategory>,
    pub is_featured: bool,
}

pub type BlogListResponse = ListEnvelope<BlogResponse>;

pub fn is_valid_blog_response(data: &Value) -> bool {
    conforms::<BlogResponse>(data)
}

pub fn is_valid_blog_list_response(data: &Value) -> bool {
    conforms_envelope::<BlogListResponse>(data)
}

pub fn is_valid_blog_brief_array_response(data: &Value) -> bool {
    conforms_array::<BlogBriefResponse>(data)
}

pub fn is_valid_blog_array_response(data: &Value) -> bool {
    conforms_array::<BlogResponse>(data)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{blog, blog_brief};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_blog() {
        assert!(is_valid_blog_response(&blog(json!("deep_dive"))));
        assert!(is_valid_blog_response(&blog(Value::Null)));
    }

    #[test]
    fn test_blog_category_outside_set() {
        assert!(!is_valid_blog_response(&blog(json!("news"))));
        assert!(!is_valid_blog_response(&blog(json!("DEEP_DIVE"))));
    }

    #[test]
    fn test_read_time_not_coerced() {
        let mut raw = blog(json!("career"));
        raw["read_time_minutes"] = json!("7");
        assert!(!is_valid_blog_response(&raw));
    }

    #[test]
    fn test_missing_nullable_field_is_rejected() {
        let mut raw = blog(json!("opinion"));
        raw.as_object_mut().unwrap().remove("views_count");
        assert!(!is_valid_blog_response(&raw));

        let mut raw = blog(json!("opinion"));
        raw.as_object_mut().unwrap().remove("updated_at");
        assert!(!is_valid_blog_response(&raw));

        let mut brief = blog_brief();
        brief.as_object_mut().unwrap().remove("category");
        assert!(!is_valid_blog_brief_array_response(&json!([brief])));
    }

    #[test]
    fn test_nav_is_brief_array() {
        assert!(is_valid_blog_brief_array_response(&json!([blog_brief()])));
        assert!(is_valid_blog_brief_array_response(&json!([])));
        assert!(!is_valid_blog_brief_array_response(&json!([{"title": "x"}])));
    }

    #[test]
    fn test_list_and_array() {
        let list = json!({"items": [blog(json!("project"))], "total": 9, "skip": 0, "limit": 1});
        assert!(is_valid_blog_list_response(&list));
        assert!(is_valid_blog_array_response(&json!([blog(json!("project"))])));
    }
}
