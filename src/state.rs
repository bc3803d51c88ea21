use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::{ChatBackend, ChatError};
use crate::config::SiteConfig;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub content_dir: Arc<PathBuf>,
    pub chat: ChatBackend,
}

impl AppState {
    pub fn new(content_dir: impl Into<PathBuf>, chat: ChatBackend) -> Self {
        Self {
            content_dir: Arc::new(content_dir.into()),
            chat,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, ChatError> {
        Ok(Self::new(
            config.content_dir.clone(),
            ChatBackend::from_config(&config.chat)?,
        ))
    }
}
