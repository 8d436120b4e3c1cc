use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::profile::scrape::ProfileScraper;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Completion backend. Default: `OpenAiClient`.
    pub llm: Arc<dyn CompletionService>,
    pub sessions: SessionStore,
    pub scraper: ProfileScraper,
}

/// State wired to a scripted completion service and default config.
#[cfg(test)]
pub fn test_state(llm: Arc<dyn CompletionService>) -> AppState {
    use crate::analysis::AnalysisFormat;

    AppState {
        config: Config {
            openai_api_key: None,
            openai_api_base: "http://127.0.0.1:1/v1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            analysis_format: AnalysisFormat::Legacy,
            port: 0,
            rust_log: "debug".to_string(),
            session_idle_ttl_secs: 3600,
        },
        llm,
        sessions: SessionStore::new(),
        scraper: ProfileScraper::new(),
    }
}
