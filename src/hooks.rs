//! Resource reads bound to the cache and the active language.
//!
//! Every method builds the key for its resource, picks the caching strategy,
//! applies the enablement guard and returns a live `QueryHandle`. Given
//! `None` for the language, a handle follows the store's active selection
//! and moves to the new language's key whenever it changes.
//! Content reads use the static strategy; search uses the standard one.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::fetchers::{blogs, certifications, experiences, projects, search};
use crate::i18n::{Language, LanguageError, LanguageStore};
use crate::keys::{self, QueryKey};
use crate::query::{guard, QueryClient, QueryHandle, QueryOptions, QueryStrategy};
use crate::schema::blog::{BlogBriefResponse, BlogListResponse, BlogResponse};
use crate::schema::certification::{
    CertificationBriefResponse, CertificationListResponse, CertificationResponse,
};
use crate::schema::experience::{ExperienceBriefResponse, ExperienceListResponse, ExperienceResponse};
use crate::schema::project::{ProjectListResponse, ProjectNavResponse, ProjectResponse};
use crate::schema::search::SearchResponse;
use crate::schema::{BlogCategory, CertificationCategory};

pub struct Portfolio {
    queries: QueryClient,
    api: ApiClient,
    language: Arc<LanguageStore>,
    content: QueryStrategy,
    search: QueryStrategy,
}

impl Portfolio {
    pub fn new(api: ApiClient, language: Arc<LanguageStore>) -> Self {
        Self {
            queries: QueryClient::new(),
            api,
            language,
            content: QueryStrategy::static_content(),
            search: QueryStrategy::standard(),
        }
    }

    /// API client from the configured base URL, language store rehydrated
    /// from the configured file when one is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        let language = match &config.language_file {
            Some(path) => LanguageStore::load(path, config.default_language),
            None => LanguageStore::new(config.default_language),
        };
        Ok(Self::new(api, Arc::new(language)))
    }

    /// Replace the strategies used for content and search reads.
    pub fn with_strategies(mut self, content: QueryStrategy, search: QueryStrategy) -> Self {
        self.content = content;
        self.search = search;
        self
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn language_store(&self) -> &Arc<LanguageStore> {
        &self.language
    }

    pub fn language(&self) -> Language {
        self.language.get()
    }

    /// Switch the active language. Handles created without an explicit
    /// language move to the new language's keys.
    pub fn set_language(&self, language: Language) -> Result<(), LanguageError> {
        self.language.set(language)
    }

    /// Explicit `lang` pins the read to that language's key. `None` follows
    /// the store: the handle moves to the new key whenever the active
    /// language changes.
    fn read<T, K, F, Fut>(
        &self,
        lang: Option<Language>,
        options: QueryOptions,
        key: K,
        fetch: F,
    ) -> QueryHandle<T>
    where
        T: Send + Sync + 'static,
        K: Fn(Language) -> QueryKey + Send + Sync + 'static,
        F: Fn(ApiClient, Language) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let api = self.api.clone();
        let fetch = Arc::new(fetch);

        match lang {
            Some(lang) => self
                .queries
                .query(key(lang), options, move || (*fetch)(api.clone(), lang)),
            None => self
                .queries
                .query_following(self.language.subscribe(), options, move |lang| {
                    let api = api.clone();
                    let fetch = Arc::clone(&fetch);
                    (key(lang), move || (*fetch)(api.clone(), lang))
                }),
        }
    }

    fn content(&self) -> QueryOptions {
        QueryOptions::new(self.content.clone())
    }

    // ==================== Projects ====================

    pub fn projects(&self, lang: Option<Language>) -> QueryHandle<ProjectListResponse> {
        self.read(lang, self.content(), keys::projects::list, |api, lang| async move {
            projects::fetch_projects(&api, lang).await
        })
    }

    pub fn featured_projects(
        &self,
        limit: Option<u32>,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<ProjectResponse>> {
        self.read(
            lang,
            self.content(),
            move |lang| keys::projects::featured(lang, limit),
            move |api, lang| async move { projects::fetch_featured_projects(&api, lang, limit).await },
        )
    }

    pub fn projects_nav(&self, lang: Option<Language>) -> QueryHandle<ProjectNavResponse> {
        self.read(lang, self.content(), keys::projects::nav, |api, lang| async move {
            projects::fetch_projects_nav(&api, lang).await
        })
    }

    /// Disabled while `slug` is empty.
    pub fn project(&self, slug: &str, lang: Option<Language>) -> QueryHandle<ProjectResponse> {
        let options = self.content().enabled(guard::non_empty(slug));
        let (key_slug, slug) = (slug.to_string(), slug.to_string());
        self.read(
            lang,
            options,
            move |lang| keys::projects::by_slug(&key_slug, lang),
            move |api, lang| {
                let slug = slug.clone();
                async move { projects::fetch_project_by_slug(&api, &slug, lang).await }
            },
        )
    }

    // ==================== Experiences ====================

    pub fn experiences(&self, lang: Option<Language>) -> QueryHandle<ExperienceListResponse> {
        self.read(lang, self.content(), keys::experiences::list, |api, lang| async move {
            experiences::fetch_experiences(&api, lang).await
        })
    }

    pub fn current_experiences(
        &self,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<ExperienceResponse>> {
        self.read(lang, self.content(), keys::experiences::current, |api, lang| async move {
            experiences::fetch_current_experiences(&api, lang).await
        })
    }

    pub fn experience_timeline(
        &self,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<ExperienceBriefResponse>> {
        self.read(lang, self.content(), keys::experiences::timeline, |api, lang| async move {
            experiences::fetch_experience_timeline(&api, lang).await
        })
    }

    /// Disabled while `id` is empty.
    pub fn experience(&self, id: &str, lang: Option<Language>) -> QueryHandle<ExperienceResponse> {
        let options = self.content().enabled(guard::non_empty(id));
        let (key_id, id) = (id.to_string(), id.to_string());
        self.read(
            lang,
            options,
            move |lang| keys::experiences::by_id(&key_id, lang),
            move |api, lang| {
                let id = id.clone();
                async move { experiences::fetch_experience_by_id(&api, &id, lang).await }
            },
        )
    }

    // ==================== Certifications ====================

    pub fn certifications(&self, lang: Option<Language>) -> QueryHandle<CertificationListResponse> {
        self.read(lang, self.content(), keys::certifications::list, |api, lang| async move {
            certifications::fetch_certifications(&api, lang).await
        })
    }

    pub fn active_certifications(
        &self,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<CertificationResponse>> {
        self.read(lang, self.content(), keys::certifications::active, |api, lang| async move {
            certifications::fetch_active_certifications(&api, lang).await
        })
    }

    pub fn certification_badges(
        &self,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<CertificationBriefResponse>> {
        self.read(lang, self.content(), keys::certifications::badges, |api, lang| async move {
            certifications::fetch_certification_badges(&api, lang).await
        })
    }

    pub fn certifications_by_category(
        &self,
        category: CertificationCategory,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<CertificationResponse>> {
        self.read(
            lang,
            self.content(),
            move |lang| keys::certifications::by_category(category, lang),
            move |api, lang| async move {
                certifications::fetch_certifications_by_category(&api, category, lang).await
            },
        )
    }

    /// Disabled while `id` is empty.
    pub fn certification(
        &self,
        id: &str,
        lang: Option<Language>,
    ) -> QueryHandle<CertificationResponse> {
        let options = self.content().enabled(guard::non_empty(id));
        let (key_id, id) = (id.to_string(), id.to_string());
        self.read(
            lang,
            options,
            move |lang| keys::certifications::by_id(&key_id, lang),
            move |api, lang| {
                let id = id.clone();
                async move { certifications::fetch_certification_by_id(&api, &id, lang).await }
            },
        )
    }

    // ==================== Blogs ====================

    pub fn blogs(&self, lang: Option<Language>) -> QueryHandle<BlogListResponse> {
        self.read(lang, self.content(), keys::blogs::list, |api, lang| async move {
            blogs::fetch_blogs(&api, lang).await
        })
    }

    pub fn featured_blogs(
        &self,
        limit: Option<u32>,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<BlogResponse>> {
        self.read(
            lang,
            self.content(),
            move |lang| keys::blogs::featured(lang, limit),
            move |api, lang| async move { blogs::fetch_featured_blogs(&api, lang, limit).await },
        )
    }

    pub fn blogs_nav(&self, lang: Option<Language>) -> QueryHandle<Vec<BlogBriefResponse>> {
        self.read(lang, self.content(), keys::blogs::nav, |api, lang| async move {
            blogs::fetch_blogs_nav(&api, lang).await
        })
    }

    pub fn blogs_by_category(
        &self,
        category: BlogCategory,
        lang: Option<Language>,
    ) -> QueryHandle<Vec<BlogResponse>> {
        self.read(
            lang,
            self.content(),
            move |lang| keys::blogs::by_category(category, lang),
            move |api, lang| async move { blogs::fetch_blogs_by_category(&api, category, lang).await },
        )
    }

    /// Disabled while `id` is empty.
    pub fn blog(&self, id: &str, lang: Option<Language>) -> QueryHandle<BlogResponse> {
        let options = self.content().enabled(guard::non_empty(id));
        let (key_id, id) = (id.to_string(), id.to_string());
        self.read(
            lang,
            options,
            move |lang| keys::blogs::by_id(&key_id, lang),
            move |api, lang| {
                let id = id.clone();
                async move { blogs::fetch_blog_by_id(&api, &id, lang).await }
            },
        )
    }

    // ==================== Search ====================

    /// Disabled until `query` has at least two characters.
    pub fn search(&self, query: &str, lang: Option<Language>) -> QueryHandle<SearchResponse> {
        let options = QueryOptions::new(self.search.clone()).enabled(guard::search_query(query));
        let (key_query, query) = (query.to_string(), query.to_string());
        self.read(
            lang,
            options,
            move |lang| keys::search::query(&key_query, lang),
            move |api, lang| {
                let query = query.clone();
                async move { search::fetch_search_results(&api, &query, lang).await }
            },
        )
    }
}
