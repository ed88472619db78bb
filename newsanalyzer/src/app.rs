// Process wiring shared by the server and the one-shot CLI
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use common::{Config, RemoteLlmConfig};

use crate::analysis::Analyzer;
use crate::chat::ConversationDispatcher;
use crate::extraction::web::WebExtractor;
use crate::llm::remote::RemoteLlmProvider;
use crate::llm::LlmProvider;
use crate::models::ModelRegistry;
use crate::server::AppState;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_URL: &str = "http://localhost:11434/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: usize = 500;

/// LLM mode for selecting appropriate configuration
#[derive(Debug, Clone, Copy)]
pub enum LlmMode {
    Language, // translation, tone and style
    Chat,     // free conversation
}

/// Resolve `config.default.toml` + (`--config FILE` or `config.toml`) and load them.
pub async fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = explicit {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let config = Config::load_with_defaults(
        if default_path.exists() { Some(default_path.as_path()) } else { None },
        override_path.as_deref(),
    )
    .await?;
    info!(default = ?default_path, override = ?override_path, "configuration loaded");
    Ok(config)
}

/// Create an LLM provider based on configuration and mode
pub fn create_llm_provider(config: &Config, mode: LlmMode) -> Result<Arc<dyn LlmProvider>> {
    let adapter = config
        .llm
        .as_ref()
        .and_then(|l| l.adapter.as_deref())
        .unwrap_or("none");
    match adapter {
        "remote" => {
            let endpoint = match mode {
                LlmMode::Language => config.language_llm(),
                LlmMode::Chat => config.chat_llm(),
            }
            .with_context(|| format!("Remote adapter selected but no LLM config found for mode {:?}", mode))?;
            let provider = remote_provider(endpoint)?;
            info!(?mode, model = provider.model(), "LLM provider initialized");
            Ok(Arc::new(provider))
        }
        "none" => anyhow::bail!("No LLM adapter configured (set llm.adapter = \"remote\")"),
        _ => anyhow::bail!("Unknown LLM adapter type: {}", adapter),
    }
}

fn remote_provider(endpoint: &RemoteLlmConfig) -> Result<RemoteLlmProvider> {
    let api_key_env = endpoint
        .api_key_env
        .as_deref()
        .context("Missing api_key_env in remote config")?;
    let api_key = std::env::var(api_key_env)
        .with_context(|| format!("LLM API key env var '{}' not set", api_key_env))?;

    let model = endpoint.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let api_url = endpoint.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string());

    Ok(RemoteLlmProvider::new(api_url, api_key, model).with_defaults(
        endpoint.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
        endpoint.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        0.7,
    ))
}

/// Load models, build the extractor and the language provider.
pub fn build_analyzer(config: &Config, models_dir: Option<&Path>) -> Result<Analyzer> {
    let models = match models_dir {
        Some(dir) => ModelRegistry::load(dir, config.models.classifier_mode, &config.models.ensemble),
        None => ModelRegistry::from_config(&config.models),
    }
    .context("failed to load model artifacts")?;

    let extractor = WebExtractor::new(&config.extraction)?;
    let language_llm = create_llm_provider(config, LlmMode::Language)?;

    Ok(Analyzer::new(Arc::new(extractor), language_llm, Arc::new(models)))
}

/// Everything the HTTP server manages.
pub fn build_state(config: &Config, models_dir: Option<&Path>) -> Result<AppState> {
    let analyzer = Arc::new(build_analyzer(config, models_dir)?);
    let chat_llm = create_llm_provider(config, LlmMode::Chat)?;
    let chat_endpoint = config.chat_llm();
    let max_tokens = chat_endpoint
        .and_then(|c| c.max_tokens)
        .unwrap_or(DEFAULT_MAX_TOKENS);
    let chat_model = chat_endpoint.and_then(|c| c.model.clone());

    let dispatcher = ConversationDispatcher::new(analyzer.clone(), chat_llm, max_tokens);
    Ok(AppState::new(analyzer, Arc::new(dispatcher), chat_model))
}
