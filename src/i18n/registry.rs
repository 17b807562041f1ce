//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is the closed set of language tags the content API knows
//! about. It is built once on first access and is immutable afterwards.

use std::sync::OnceLock;

/// Metadata for a supported language tag.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Tag as it appears on the wire and in query keys (e.g., "en", "zh")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Mandarin")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "中文")
    pub native_name: &'static str,

    /// Whether this is the default language used when nothing was persisted
    pub is_default: bool,

    /// Whether a user may pick this language in a language switcher.
    ///
    /// `unknown` is a valid tag on records but is never offered for selection.
    pub selectable: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its tag.
    ///
    /// Lookup is exact: `"EN"` and `" en"` are not `"en"`.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Languages that can be offered to a user.
    pub fn list_selectable(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.selectable).collect()
    }

    /// Every registered tag, including `unknown`.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the default language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one default language
    /// (this indicates a programming error in `default_languages`).
    pub fn default_language(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    /// Check if a tag is registered.
    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: true,
            selectable: true,
        },
        LanguageConfig {
            code: "zh",
            name: "Mandarin",
            native_name: "中文",
            is_default: false,
            selectable: true,
        },
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            is_default: false,
            selectable: true,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_default: false,
            selectable: true,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            is_default: false,
            selectable: true,
        },
        LanguageConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            is_default: false,
            selectable: true,
        },
        LanguageConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_default: false,
            selectable: true,
        },
        LanguageConfig {
            code: "unknown",
            name: "Unknown",
            native_name: "Unknown",
            is_default: false,
            selectable: false,
        },
    ]
}
