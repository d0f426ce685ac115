//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds all shared resources, such
//! as the configuration, the writeup client with its provider backends, and the
//! session store, making them accessible to all request handlers.

use crate::config::AppConfig;
use ctfrag::{
    providers::{
        ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider, EmbeddingClient},
        vector::{pinecone::PineconeProvider, VectorStore},
    },
    retrieval::RetrievalBackend,
    session::SessionStore,
    validate::ValidationRules,
    WriteupClient, WriteupClientBuilder,
};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The writeup pipeline: validation, retrieval, and generation.
    pub client: Arc<WriteupClient>,
    /// Session directories and downloadable artifact packaging.
    pub sessions: Arc<SessionStore>,
}

/// Builds the shared application state from the configuration.
///
/// This function instantiates the configured generation provider and the
/// retrieval backend, assembles them into a `WriteupClient`, and prepares the
/// session store. Both backends are optional: a missing generation provider
/// leaves the server up but rejecting writeup requests, and a missing
/// retrieval backend means writeups are generated without reference examples.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let mut builder = WriteupClientBuilder::new().validation_rules(ValidationRules::new(
        config.validation.min_prompt_chars,
        config.validation.meaningless_inputs.clone(),
        config.validation.topic_keywords.clone(),
    ));

    match &config.generation {
        Some(generation) => {
            let provider: Box<dyn AiProvider> = match generation.provider.as_str() {
                "gemini" => {
                    let api_key = generation.api_key.clone().ok_or_else(|| {
                        anyhow::anyhow!("api_key is required for the gemini provider")
                    })?;
                    // If api_url is not provided in config, construct it from the model name.
                    let api_url = generation.api_url.clone().unwrap_or_else(|| {
                        format!(
                            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                            generation.model_name
                        )
                    });
                    Box::new(GeminiProvider::new(api_url, api_key, timeout)?)
                }
                "local" => {
                    // For local providers, the URL is always required.
                    let api_url = generation.api_url.clone().ok_or_else(|| {
                        anyhow::anyhow!(
                            "api_url is required for the local provider. Please set LOCAL_AI_API_URL in your .env file."
                        )
                    })?;
                    // An empty model name means "let the endpoint pick".
                    let model = Some(generation.model_name.clone()).filter(|m| !m.is_empty());
                    Box::new(LocalAiProvider::new(
                        api_url,
                        generation.api_key.clone(),
                        model,
                        timeout,
                    )?)
                }
                other => {
                    return Err(anyhow::anyhow!("Unsupported AI provider type '{other}'"));
                }
            };
            builder = builder.ai_provider(provider);
        }
        None => {
            warn!("No generation provider is configured. Writeup requests will be rejected.");
        }
    }

    if let Some(retrieval) = &config.retrieval {
        let embedder = EmbeddingClient::new(
            retrieval.embedding.api_url.clone(),
            retrieval.embedding.model_name.clone(),
            retrieval.embedding.api_key.clone(),
            timeout,
        )?;
        let api_key = retrieval.vector.api_key.clone().ok_or_else(|| {
            anyhow::anyhow!("api_key is required for the vector store. Please set VECTOR_API_KEY in your .env file.")
        })?;
        let store: Box<dyn VectorStore> = Box::new(PineconeProvider::new(
            retrieval.vector.api_url.clone(),
            api_key,
            timeout,
        )?);
        builder = builder.retrieval_backend(
            RetrievalBackend::new(embedder, store).with_limits(retrieval.top_k, retrieval.want_n),
        );
    } else {
        info!("No retrieval backend is configured. Writeups will be generated without reference examples.");
    }

    let sessions = SessionStore::new(
        config.session.root.clone(),
        config.session.converter.clone(),
    );
    let max_age = Duration::from_secs(config.session.max_age_hours * 3600);
    match sessions.purge_expired(max_age) {
        Ok(0) => {}
        Ok(removed) => info!(removed, "Purged expired session directories on startup"),
        Err(e) => warn!(error = %e, "Failed to purge expired session directories"),
    }

    Ok(AppState {
        config: Arc::new(config),
        client: Arc::new(builder.build()),
        sessions: Arc::new(sessions),
    })
}
