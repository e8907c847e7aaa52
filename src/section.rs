use std::path::{Path, PathBuf};

use tokio::fs;

/// A unit of fragment content injected into the page at startup.
///
/// Sections start out `Pending`; the bootstrap sequence settles each one
/// exactly once, either with the fragment's text or with an inline error
/// notice. A failed section never aborts the bootstrap.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub path: PathBuf,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Pending,
    Loaded(String),
    Failed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SectionError {
    #[error("unable to read {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Reads the fragment's full text. Each call is independent; the caller
/// decides whether loads run sequentially or concurrently.
pub async fn fetch(path: PathBuf) -> Result<String, SectionError> {
    fs::read_to_string(&path)
        .await
        .map_err(|e| SectionError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

pub fn error_notice(err: &SectionError) -> String {
    format!("Failed to load this section. {err}")
}

impl Section {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            content: Content::Pending,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settles the section with a fetch result. On failure the error is
    /// logged and the section shows the notice instead of its fragment.
    pub fn apply(&mut self, result: Result<String, SectionError>) {
        match result {
            Ok(text) => self.content = Content::Loaded(text),
            Err(err) => {
                tracing::error!(section = %self.id, %err, "failed to load section");
                self.content = Content::Failed(error_notice(&err));
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.content, Content::Loaded(_))
    }

    pub fn text(&self) -> &str {
        match &self.content {
            Content::Pending => "",
            Content::Loaded(text) | Content::Failed(text) => text,
        }
    }
}
