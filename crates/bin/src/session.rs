//! The open workspaces of one CLI invocation.

use std::{
    collections::BTreeSet,
    error::Error,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use waymark::{Config, MutationContext, MutationHook, Namespace, Registry};

use crate::{storage, view::TreeItems};

/// Remembers which namespaces changed so only those are written back.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    keys: Mutex<BTreeSet<String>>,
}

impl DirtyTracker {
    fn keys(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the dirty keys and forgets them.
    pub fn take(&self) -> BTreeSet<String> {
        std::mem::take(&mut *self.keys())
    }
}

impl MutationHook for DirtyTracker {
    fn on_mutation(&self, context: &MutationContext) -> waymark::Result<()> {
        tracing::debug!(namespace = %context.namespace, change = ?context.change, "Marking dirty");
        self.keys().insert(context.namespace.clone());
        Ok(())
    }
}

/// Registry plus the folders its namespaces belong to.
pub struct Session {
    registry: Registry<TreeItems>,
    workspaces: Vec<PathBuf>,
    dirty: Arc<DirtyTracker>,
}

impl Session {
    /// Opens every workspace in `workspaces`. The first one is the primary.
    pub async fn open(workspaces: &[PathBuf], config: Config) -> Result<Self, Box<dyn Error>> {
        let dirty = Arc::new(DirtyTracker::default());
        let mut registry = Registry::new(TreeItems, config);
        registry.add_hook(dirty.clone());

        let mut session = Self {
            registry,
            workspaces: Vec::new(),
            dirty,
        };
        for workspace in workspaces {
            session.open_workspace(workspace).await?;
        }
        if session.workspaces.is_empty() {
            return Err("no workspace given".into());
        }
        Ok(session)
    }

    /// Namespace key of a workspace folder.
    pub fn key(workspace: &Path) -> String {
        workspace.display().to_string()
    }

    /// Opens `workspace` unless it already is, returning its key.
    ///
    /// Every spelling of one folder resolves to the same key.
    pub async fn open_workspace(&mut self, workspace: &Path) -> Result<String, Box<dyn Error>> {
        let workspace = resolve(workspace).await?;
        let workspace = workspace.as_path();
        let key = Self::key(workspace);
        if self.registry.contains(&key) {
            return Ok(key);
        }

        let namespace = match storage::read_document(workspace).await? {
            Some(json) => self.registry.load(&key, &json)?,
            None => self.registry.create(&key)?,
        };
        let state = storage::read_state(workspace).await;
        if !state.active_group.is_empty() && !namespace.activate(&state.active_group) {
            tracing::warn!(
                "Active group '{}' no longer exists in {key}",
                state.active_group
            );
        }
        tracing::debug!(workspace = %key, nodes = namespace.len(), "Opened workspace");
        self.workspaces.push(workspace.to_path_buf());
        Ok(key)
    }

    /// Key of the workspace that path-taking commands operate on.
    pub fn primary(&self) -> String {
        self.workspaces
            .first()
            .map(|workspace| Self::key(workspace))
            .unwrap_or_default()
    }

    /// Keys of every open workspace, primary first.
    pub fn keys(&self) -> Vec<String> {
        self.workspaces.iter().map(|w| Self::key(w)).collect()
    }

    pub fn registry(&self) -> &Registry<TreeItems> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<TreeItems> {
        &mut self.registry
    }

    pub fn namespace(&self, key: &str) -> waymark::Result<&Namespace<TreeItems>> {
        self.registry.get(key)
    }

    /// Writes back every namespace changed since the last save. Returns their keys.
    pub async fn save(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let mut saved = Vec::new();
        for key in self.dirty.take() {
            let Some(workspace) = self.workspaces.iter().find(|w| Self::key(w) == key) else {
                tracing::warn!("Dirty namespace {key} has no workspace folder");
                continue;
            };
            storage::write(workspace, self.registry.get(&key)?).await?;
            saved.push(key);
        }
        Ok(saved)
    }
}

/// Canonical form of `workspace`. A folder that does not exist yet is only made absolute.
async fn resolve(workspace: &Path) -> std::io::Result<PathBuf> {
    match tokio::fs::canonicalize(workspace).await {
        Err(e) if e.kind() == ErrorKind::NotFound => std::path::absolute(workspace),
        resolved => resolved,
    }
}
