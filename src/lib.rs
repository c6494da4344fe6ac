pub mod config;
pub mod deck;
pub mod error;
pub mod io;
pub mod lemmatize;
pub mod llm;
pub mod models;
pub mod services;
pub mod stages;

pub use config::{Config, LlmProvider};
pub use error::EntryError;
pub use io::{KeySource, TermStore, TerminalKeys};
pub use lemmatize::{Lemmatizer, Lexicon};
pub use llm::{AnthropicClient, AnthropicConfig, LanguageModel, ModelClient, OpenAiClient};
pub use models::{DictionaryEntry, EntryId, FlashcardRecord, ManifestRow, ReviewCursor};
pub use services::{DictionaryService, GoogleImageSearch, ImageSearch, MerriamWebster};
pub use stages::{
    CleanTargets, Component, Curator, Reviewer, execute_assemble, execute_clean,
    execute_generate, execute_images, execute_manifest, execute_sanitize, run_session,
};
