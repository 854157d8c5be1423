//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use abpx_common::AppConfig;
use abpx_peptide::{Classifier, ForestClassifier, PredictionPipeline};
use abpx_structure::FoldingClient;
use minijinja::Environment;
use tracing::info;

use crate::error::WebError;
use crate::render;
use crate::session::SessionStore;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: PredictionPipeline,
    pub folding: FoldingClient,
    pub templates: Environment<'static>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig, classifier: Arc<dyn Classifier>) -> Result<Self, WebError> {
        let folding = FoldingClient::new(&config.folding)?;
        let sessions = SessionStore::new(Duration::from_secs(config.session.ttl_secs));
        Ok(Self {
            pipeline: PredictionPipeline::new(classifier),
            folding,
            templates: render::environment()?,
            sessions,
            config,
        })
    }

    /// Load the forest named in `config.model.path` and build the state around it.
    pub fn from_config(config: AppConfig) -> Result<Self, WebError> {
        let forest = ForestClassifier::load(&config.model.path)?;
        info!("Classifier ready: {}", forest.info().kind);
        Self::new(config, Arc::new(forest))
    }
}

pub type SharedState = Arc<AppState>;
