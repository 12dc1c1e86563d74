//! Workspace files: the namespace document and the small state file beside it.

use std::{
    error::Error,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use waymark::{Namespace, Presenter, constants::DOCUMENT_FILE};

/// Per-workspace state that is not part of the tree document.
pub const STATE_FILE: &str = ".waymark-state.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkspaceState {
    pub active_group: String,
}

pub fn document_path(workspace: &Path) -> PathBuf {
    workspace.join(DOCUMENT_FILE)
}

pub fn state_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_FILE)
}

/// Reads the namespace document of `workspace`, or `None` if it has none yet.
pub async fn read_document(workspace: &Path) -> Result<Option<String>, Box<dyn Error>> {
    read_optional(&document_path(workspace)).await
}

/// Reads the workspace state. A missing or unreadable file yields the default.
pub async fn read_state(workspace: &Path) -> WorkspaceState {
    let path = state_path(workspace);
    match read_optional(&path).await {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable state file {}: {e}", path.display());
            WorkspaceState::default()
        }),
        Ok(None) => WorkspaceState::default(),
        Err(e) => {
            tracing::warn!("Failed to read state file {}: {e}", path.display());
            WorkspaceState::default()
        }
    }
}

/// Writes the namespace document and state of `workspace`.
pub async fn write<R: Presenter>(
    workspace: &Path,
    namespace: &Namespace<R>,
) -> Result<(), Box<dyn Error>> {
    tokio::fs::create_dir_all(workspace).await?;
    write_replacing(&document_path(workspace), &namespace.to_json()?).await?;

    let state = WorkspaceState {
        active_group: namespace.active_group().to_string(),
    };
    write_replacing(&state_path(workspace), &serde_json::to_string_pretty(&state)?).await?;
    tracing::debug!(workspace = %workspace.display(), "Saved workspace");
    Ok(())
}

async fn read_optional(path: &Path) -> Result<Option<String>, Box<dyn Error>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes next to `path` first, then renames over it.
async fn write_replacing(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    tokio::fs::write(&staging, contents).await?;
    tokio::fs::rename(&staging, path).await?;
    Ok(())
}
