//! Schema registry: every (resource, variant) pair the API serves, mapped to
//! its validator.

use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

use crate::error::ResourceDomain;
use crate::schema::{blog, certification, experience, project, search};

/// A named projection of a resource's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Full,
    FullArray,
    Brief,
    BriefArray,
    List,
    Nav,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Full => "full",
            Self::FullArray => "full[]",
            Self::Brief => "brief",
            Self::BriefArray => "brief[]",
            Self::List => "list",
            Self::Nav => "nav",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy)]
pub struct SchemaEntry {
    pub resource: ResourceDomain,
    pub variant: Variant,
    pub validate: fn(&Value) -> bool,
}

pub struct SchemaRegistry {
    entries: Vec<SchemaEntry>,
}

static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Shorthand for `SchemaRegistry::get()`.
pub fn registry() -> &'static SchemaRegistry {
    SchemaRegistry::get()
}

impl SchemaRegistry {
    pub fn get() -> &'static SchemaRegistry {
        REGISTRY.get_or_init(|| SchemaRegistry {
            entries: default_entries(),
        })
    }

    pub fn lookup(&self, resource: ResourceDomain, variant: Variant) -> Option<&SchemaEntry> {
        self.entries
            .iter()
            .find(|entry| entry.resource == resource && entry.variant == variant)
    }

    /// Validate `value` as the given (resource, variant). Unregistered pairs
    /// never validate.
    pub fn validate(&self, resource: ResourceDomain, variant: Variant, value: &Value) -> bool {
        self.lookup(resource, variant)
            .map(|entry| (entry.validate)(value))
            .unwrap_or(false)
    }

    pub fn variants_of(&self, resource: ResourceDomain) -> Vec<Variant> {
        self.entries
            .iter()
            .filter(|entry| entry.resource == resource)
            .map(|entry| entry.variant)
            .collect()
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }
}

fn entry(resource: ResourceDomain, variant: Variant, validate: fn(&Value) -> bool) -> SchemaEntry {
    SchemaEntry {
        resource,
        variant,
        validate,
    }
}

fn default_entries() -> Vec<SchemaEntry> {
    use ResourceDomain::*;
    use Variant::*;

    vec![
        entry(Project, Full, project::is_valid_project_response),
        entry(Project, FullArray, project::is_valid_project_array_response),
        entry(Project, Brief, project::is_valid_project_brief_response),
        entry(Project, List, project::is_valid_project_list_response),
        entry(Project, Nav, project::is_valid_project_nav_response),
        entry(Experience, Full, experience::is_valid_experience_response),
        entry(Experience, FullArray, experience::is_valid_experience_array_response),
        entry(Experience, BriefArray, experience::is_valid_experience_brief_array_response),
        entry(Experience, List, experience::is_valid_experience_list_response),
        entry(Certification, Full, certification::is_valid_certification_response),
        entry(Certification, FullArray, certification::is_valid_certification_array_response),
        entry(
            Certification,
            BriefArray,
            certification::is_valid_certification_brief_array_response,
        ),
        entry(Certification, List, certification::is_valid_certification_list_response),
        entry(Blog, Full, blog::is_valid_blog_response),
        entry(Blog, FullArray, blog::is_valid_blog_array_response),
        entry(Blog, BriefArray, blog::is_valid_blog_brief_array_response),
        entry(Blog, List, blog::is_valid_blog_list_response),
        entry(Search, Full, search::is_valid_search_response),
        entry(Search, Brief, search::is_valid_search_result_item),
    ]
}
