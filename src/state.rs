//! App state wiring for the embedding shell.
//!
//! One `AppState` per process: config, the planner with its completion
//! client, and the event store. The shell constructs this once at startup
//! and routes every user action through it.

use std::sync::Arc;

use crate::completion::OpenAiClient;
use crate::config::{self, Config};
use crate::error::CoreError;
use crate::planner::Planner;
use crate::store::EventStore;

pub struct AppState {
    pub config: Config,
    pub planner: Planner,
    pub store: EventStore,
}

impl AppState {
    /// Initialize from the default config and data locations
    /// (`~/.gatherly/`). A missing config file falls back to defaults;
    /// a missing API key only surfaces on the first completion call.
    pub fn init() -> Result<Self, CoreError> {
        let config = config::load_config()?;
        log::info!(
            "core initialized (model: {}, api key configured: {})",
            config.model,
            config.resolve_api_key().is_some()
        );

        let provider = Arc::new(OpenAiClient::new(&config));
        let planner = Planner::new(provider);
        let store = EventStore::open(&config::data_dir()?)?;

        Ok(Self {
            config,
            planner,
            store,
        })
    }
}
