//! Language type: validated language tag.
//!
//! `Language` is both a field on full records and a dimension of every
//! query key, so it (de)serializes as its bare tag.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::i18n::{LanguageConfig, LanguageRegistry};

/// Errors produced when turning a string into a `Language`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("Unknown language code: '{0}'")]
    UnknownCode(String),

    #[error("Language '{0}' cannot be selected")]
    NotSelectable(String),
}

/// A language tag that is known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const MANDARIN: Language = Language { code: "zh" };
    pub const HINDI: Language = Language { code: "hi" };
    pub const SPANISH: Language = Language { code: "es" };
    pub const FRENCH: Language = Language { code: "fr" };
    pub const ARABIC: Language = Language { code: "ar" };
    pub const PORTUGUESE: Language = Language { code: "pt" };

    /// Valid tag for records whose language the backend could not determine.
    pub const UNKNOWN: Language = Language { code: "unknown" };

    /// Create a Language from its tag.
    ///
    /// # Example
    /// ```ignore
    /// let spanish = Language::from_code("es")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language, LanguageError> {
        LanguageRegistry::get()
            .get_by_code(code)
            .map(|config| Language { code: config.code })
            .ok_or_else(|| LanguageError::UnknownCode(code.to_string()))
    }

    /// The language used when nothing else was chosen (English).
    pub fn default_language() -> Language {
        Language {
            code: LanguageRegistry::get().default_language().code,
        }
    }

    /// The tag as a static string (e.g., "en", "zh").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// # Panics
    /// Panics if the tag is not in the registry, which cannot happen for
    /// values built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_unknown(&self) -> bool {
        *self == Language::UNKNOWN
    }

    /// `Ok(self)` when this language may be the active selection.
    pub fn ensure_selectable(self) -> Result<Language, LanguageError> {
        if self.config().selectable {
            Ok(self)
        } else {
            Err(LanguageError::NotSelectable(self.code.to_string()))
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::default_language()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LanguageVisitor;

        impl Visitor<'_> for LanguageVisitor {
            type Value = Language;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a registered language tag")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Language, E> {
                Language::from_code(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(LanguageVisitor)
    }
}
