//! Versioned endpoint paths, relative to the API base URL.
//!
//! Identifier segments are percent-encoded, so a slug containing `/` or `?`
//! stays one path segment.

use std::borrow::Cow;

use crate::schema::{BlogCategory, CertificationCategory};

pub const API_VERSION: &str = "v1";

fn segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

pub mod projects {
    use super::API_VERSION;

    pub fn list() -> String {
        format!("/{}/projects", API_VERSION)
    }

    pub fn featured() -> String {
        format!("/{}/projects/featured", API_VERSION)
    }

    pub fn nav() -> String {
        format!("/{}/projects/nav", API_VERSION)
    }

    pub fn by_slug(slug: &str) -> String {
        format!("/{}/projects/{}", API_VERSION, super::segment(slug))
    }
}

pub mod experiences {
    use super::API_VERSION;

    pub fn list() -> String {
        format!("/{}/experiences", API_VERSION)
    }

    pub fn current() -> String {
        format!("/{}/experiences/current", API_VERSION)
    }

    pub fn timeline() -> String {
        format!("/{}/experiences/timeline", API_VERSION)
    }

    pub fn by_id(id: &str) -> String {
        format!("/{}/experiences/{}", API_VERSION, super::segment(id))
    }
}

pub mod certifications {
    use super::{CertificationCategory, API_VERSION};

    pub fn list() -> String {
        format!("/{}/certifications", API_VERSION)
    }

    pub fn active() -> String {
        format!("/{}/certifications/active", API_VERSION)
    }

    pub fn badges() -> String {
        format!("/{}/certifications/badges", API_VERSION)
    }

    pub fn by_category(category: CertificationCategory) -> String {
        format!("/{}/certifications/category/{}", API_VERSION, category.as_str())
    }

    pub fn by_id(id: &str) -> String {
        format!("/{}/certifications/{}", API_VERSION, super::segment(id))
    }
}

pub mod blogs {
    use super::{BlogCategory, API_VERSION};

    pub fn list() -> String {
        format!("/{}/blogs", API_VERSION)
    }

    pub fn featured() -> String {
        format!("/{}/blogs/featured", API_VERSION)
    }

    pub fn nav() -> String {
        format!("/{}/blogs/nav", API_VERSION)
    }

    pub fn by_category(category: BlogCategory) -> String {
        format!("/{}/blogs/category/{}", API_VERSION, category.as_str())
    }

    pub fn by_id(id: &str) -> String {
        format!("/{}/blogs/{}", API_VERSION, super::segment(id))
    }
}

pub fn search() -> String {
    format!("/{}/search", API_VERSION)
}
