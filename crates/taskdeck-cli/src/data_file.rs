//! The CLI keeps the store in a JSON file: a map of task id to stored document.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use taskdeck_core::domain::TaskId;
use taskdeck_core::impls::InMemoryTaskStore;
use taskdeck_core::ports::TaskDocument;

pub type Documents = BTreeMap<TaskId, TaskDocument>;

/// Load the store. A missing file is an empty store.
pub fn load(path: &Path) -> anyhow::Result<InMemoryTaskStore> {
    let documents: Documents = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Documents::new(),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    tracing::debug!(path = %path.display(), tasks = documents.len(), "data file loaded");
    Ok(InMemoryTaskStore::with_documents(documents))
}

pub async fn save(path: &Path, store: &InMemoryTaskStore) -> anyhow::Result<()> {
    let documents = store.documents().await;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(&documents)?;
    std::fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), tasks = documents.len(), "data file saved");
    Ok(())
}
