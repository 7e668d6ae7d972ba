//! Environment/runtime helpers
//!
//! Sanity checks to ensure the durable session file can be written at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of the session storage file exists.
pub async fn ensure_storage_dir(storage_path: &str) -> anyhow::Result<()> {
    let parent = match Path::new(storage_path).parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            debug!(%storage_path, "session storage lives in the working directory");
            return Ok(());
        }
    };
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "session storage directory missing; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}
