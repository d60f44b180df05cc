use crate::config::ScreenshotConfig;
use crate::session::Session;
use scout_common::error::SessionError;
use std::path::{Path, PathBuf};
use tracing::info;

/// File stem used when a caller passes a blank name.
const FALLBACK_NAME: &str = "screenshot";

/// Writes session screenshots as `<dir>/<name>.png`.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", sanitize(name)))
    }

    /// Capture the current screen and write it, creating the directory if
    /// needed. Returns the written path.
    pub async fn capture<S: Session + ?Sized>(
        &self,
        session: &mut S,
        name: &str,
    ) -> Result<PathBuf, SessionError> {
        let png = session.screenshot().await?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(name);
        tokio::fs::write(&path, png).await?;
        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }
}

impl From<&ScreenshotConfig> for ScreenshotStore {
    fn from(config: &ScreenshotConfig) -> Self {
        Self::new(config.dir.clone())
    }
}

/// Keep names to a single, non-empty path component.
fn sanitize(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}
