//! Runtime configuration
//!
//! Tuning constants live in `lib.rs`; this covers what the host picks at
//! startup: backend endpoint, timeout, lexicon file, log location.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::core::{AnalysisEngine, ChatBackend, HttpBackend, Lexicon, OfflineBackend};
use crate::error::{LexiconError, RemoteError};
use crate::types::LexiconConfig;
use crate::{MENU_SUGGESTION_COUNT, REMOTE_TIMEOUT_SECS};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base URL of the chat backend; `None` runs fully offline
    pub backend_url: Option<String>,
    pub timeout_secs: u64,
    /// TOML lexicon; `None` uses the built-in tables
    pub lexicon_path: Option<PathBuf>,
    /// Event log file (CLI) or directory (server)
    pub log_path: Option<PathBuf>,
    pub suggestion_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            timeout_secs: REMOTE_TIMEOUT_SECS,
            lexicon_path: None,
            log_path: None,
            suggestion_count: MENU_SUGGESTION_COUNT,
        }
    }
}

impl EngineConfig {
    pub fn load_lexicon(&self) -> Result<Arc<Lexicon>, LexiconError> {
        match &self.lexicon_path {
            Some(path) => {
                let config = LexiconConfig::load(path)?;
                info!(path = %path.display(), "lexicon loaded");
                Ok(Arc::new(Lexicon::compile(config)?))
            }
            None => Ok(Lexicon::builtin()),
        }
    }

    pub fn build_engine(&self) -> Result<Arc<AnalysisEngine>, LexiconError> {
        let engine = AnalysisEngine::new(self.load_lexicon()?)
            .with_suggestion_count(self.suggestion_count);
        Ok(Arc::new(engine))
    }

    /// HTTP client for `backend_url`, offline when unset or blank
    pub fn build_backend(&self) -> Result<Arc<dyn ChatBackend>, RemoteError> {
        match self.backend_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                let timeout = Duration::from_secs(self.timeout_secs.max(1));
                Ok(Arc::new(HttpBackend::with_timeout(url, timeout)?))
            }
            None => Ok(Arc::new(OfflineBackend)),
        }
    }
}
