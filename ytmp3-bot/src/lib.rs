//! ytmp3-bot library interface
//!
//! Exposes public APIs for the binary and for integration testing

pub mod auth;
pub mod commands;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod telegram;

pub use crate::error::{RequestError, RequestResult};

use std::path::PathBuf;
use std::sync::Arc;
use ytmp3_common::config::TomlConfig;

use crate::auth::{AuthorizationPolicy, UsernamePolicy};
use crate::services::{HttpCoverFetcher, RequestOrchestrator, Workspace, YtDlpExtractor};

/// Application context shared across handlers
///
/// Built once at startup and handed to every handler.
pub struct AppContext {
    /// Bootstrap configuration
    pub config: TomlConfig,
    /// Request state machine driver (owns the workspace)
    pub orchestrator: RequestOrchestrator,
    /// Who may run `/clear`
    pub auth: Arc<dyn AuthorizationPolicy>,
}

impl AppContext {
    pub fn new(
        config: TomlConfig,
        orchestrator: RequestOrchestrator,
        auth: Arc<dyn AuthorizationPolicy>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            auth,
        }
    }

    /// Wire the production services from configuration
    ///
    /// Creates the working-directory root if it does not exist.
    pub fn from_config(
        config: TomlConfig,
        root_folder: PathBuf,
        admin_username: Option<String>,
    ) -> ytmp3_common::Result<Self> {
        let workspace = Workspace::open(root_folder)?;

        let extractor =
            YtDlpExtractor::new(config.ytdlp_path.clone(), config.audio_quality.clone());
        let cover_fetcher = HttpCoverFetcher::new(ytmp3_common::time::secs_to_duration(
            config.thumbnail_timeout_secs,
        ))
        .map_err(|e| ytmp3_common::Error::Internal(format!("HTTP client init failed: {}", e)))?;

        let orchestrator =
            RequestOrchestrator::new(workspace, Arc::new(extractor), Arc::new(cover_fetcher));
        let auth = UsernamePolicy::new(admin_username.or_else(|| config.admin_username.clone()));

        Ok(Self::new(config, orchestrator, Arc::new(auth)))
    }
}
