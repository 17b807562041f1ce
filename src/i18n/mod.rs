//! Language tags and the active-language selection.
//!
//! - `registry`: the closed set of tags and their metadata
//! - `language`: the validated `Language` type used on records and in query keys
//! - `store`: the injectable active-language store with optional persistence

mod language;
mod registry;
mod store;

pub use language::{Language, LanguageError};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use store::LanguageStore;
