//! Query key builders.
//!
//! A key is an ordered token sequence `[resource, variant, ...params]`. Every
//! builder for a resource starts from that resource's `all()` key, so
//! invalidating `all()` reaches every variant and language of it.

use std::fmt;

use crate::i18n::Language;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Append one token, returning the extended key.
    pub fn with(mut self, token: impl Into<String>) -> Self {
        self.0.push(token.into());
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefix match, token by token. Every key starts with the empty key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

fn with_limit(key: QueryKey, limit: Option<u32>) -> QueryKey {
    match limit {
        Some(limit) => key.with(limit.to_string()),
        None => key,
    }
}

pub mod projects {
    use super::*;

    pub fn all() -> QueryKey {
        QueryKey::new(["projects"])
    }

    pub fn list(lang: Language) -> QueryKey {
        all().with("list").with(lang.code())
    }

    pub fn featured(lang: Language, limit: Option<u32>) -> QueryKey {
        with_limit(all().with("featured").with(lang.code()), limit)
    }

    pub fn nav(lang: Language) -> QueryKey {
        all().with("nav").with(lang.code())
    }

    pub fn by_slug(slug: &str, lang: Language) -> QueryKey {
        all().with("detail").with(slug).with(lang.code())
    }
}

pub mod experiences {
    use super::*;

    pub fn all() -> QueryKey {
        QueryKey::new(["experiences"])
    }

    pub fn list(lang: Language) -> QueryKey {
        all().with("list").with(lang.code())
    }

    pub fn current(lang: Language) -> QueryKey {
        all().with("current").with(lang.code())
    }

    pub fn timeline(lang: Language) -> QueryKey {
        all().with("timeline").with(lang.code())
    }

    pub fn by_id(id: &str, lang: Language) -> QueryKey {
        all().with("detail").with(id).with(lang.code())
    }
}

pub mod certifications {
    use super::*;
    use crate::schema::CertificationCategory;

    pub fn all() -> QueryKey {
        QueryKey::new(["certifications"])
    }

    pub fn list(lang: Language) -> QueryKey {
        all().with("list").with(lang.code())
    }

    pub fn active(lang: Language) -> QueryKey {
        all().with("active").with(lang.code())
    }

    pub fn badges(lang: Language) -> QueryKey {
        all().with("badges").with(lang.code())
    }

    pub fn by_category(category: CertificationCategory, lang: Language) -> QueryKey {
        all()
            .with("category")
            .with(category.as_str())
            .with(lang.code())
    }

    pub fn by_id(id: &str, lang: Language) -> QueryKey {
        all().with("detail").with(id).with(lang.code())
    }
}

pub mod blogs {
    use super::*;
    use crate::schema::BlogCategory;

    pub fn all() -> QueryKey {
        QueryKey::new(["blogs"])
    }

    pub fn list(lang: Language) -> QueryKey {
        all().with("list").with(lang.code())
    }

    pub fn featured(lang: Language, limit: Option<u32>) -> QueryKey {
        with_limit(all().with("featured").with(lang.code()), limit)
    }

    pub fn nav(lang: Language) -> QueryKey {
        all().with("nav").with(lang.code())
    }

    pub fn by_category(category: BlogCategory, lang: Language) -> QueryKey {
        all()
            .with("category")
            .with(category.as_str())
            .with(lang.code())
    }

    pub fn by_id(id: &str, lang: Language) -> QueryKey {
        all().with("detail").with(id).with(lang.code())
    }
}

pub mod search {
    use super::*;

    pub fn all() -> QueryKey {
        QueryKey::new(["search"])
    }

    pub fn query(q: &str, lang: Language) -> QueryKey {
        all().with(q).with(lang.code())
    }
}
