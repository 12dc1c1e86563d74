//! A keyed collection of namespaces.
//!
//! Hosts usually keep one [`Namespace`] per workspace folder. The [`Registry`]
//! owns them, routes operations by key, moves subtrees between namespaces, and
//! runs the registered [`MutationHook`]s after every successful mutation.
//!
//! Hooks run only when the operation succeeded. A failing hook is logged and
//! does not undo the change.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    Config, Result,
    index::Presenter,
    namespace::{Namespace, NamespaceError, OrderingStrategy},
    node::{Anchor, Node, NodeKind},
    shift::{EditOutcome, LineEdit},
};

mod errors;
mod hooks;

pub use errors::RegistryError;
pub use hooks::{Change, MutationContext, MutationHook};

/// Namespaces keyed by workspace, plus the hooks observing them.
pub struct Registry<R: Presenter> {
    namespaces: IndexMap<String, Namespace<R>>,
    presenter: R,
    config: Config,
    hooks: Vec<Arc<dyn MutationHook>>,
}

impl<R: Presenter + Clone> Registry<R> {
    /// Creates an empty registry. New namespaces share `presenter` and `config`.
    pub fn new(presenter: R, config: Config) -> Self {
        Self {
            namespaces: IndexMap::new(),
            presenter,
            config,
            hooks: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a hook to run after each successful mutation.
    pub fn add_hook(&mut self, hook: Arc<dyn MutationHook>) {
        self.hooks.push(hook);
    }

    /// Opens an empty namespace under `key`.
    pub fn create(&mut self, key: &str) -> Result<&mut Namespace<R>> {
        let namespace = Namespace::new(self.presenter.clone(), self.config.clone());
        self.attach(key, namespace)
    }

    /// Opens a namespace from its JSON document.
    ///
    /// An unreadable document yields an empty namespace, see
    /// [`Namespace::load_or_empty`].
    pub fn load(&mut self, key: &str, json: &str) -> Result<&mut Namespace<R>> {
        let namespace = Namespace::load_or_empty(json, self.presenter.clone(), self.config.clone());
        self.attach(key, namespace)
    }

    /// Registers an already built namespace under `key`.
    pub fn attach(&mut self, key: &str, namespace: Namespace<R>) -> Result<&mut Namespace<R>> {
        if self.namespaces.contains_key(key) {
            return Err(RegistryError::DuplicateNamespace {
                key: key.to_string(),
            }
            .into());
        }
        debug!(key, nodes = namespace.len(), "Opened namespace");
        Ok(self.namespaces.entry(key.to_string()).or_insert(namespace))
    }

    /// Closes the namespace under `key`, handing it back to the caller.
    pub fn remove(&mut self, key: &str) -> Option<Namespace<R>> {
        self.namespaces.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Result<&Namespace<R>> {
        self.namespaces.get(key).ok_or_else(|| {
            RegistryError::UnknownNamespace {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Mutable access that bypasses the hooks.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Namespace<R>> {
        self.namespaces.get_mut(key).ok_or_else(|| {
            RegistryError::UnknownNamespace {
                key: key.to_string(),
            }
            .into()
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.namespaces.contains_key(key)
    }

    /// Namespace keys in the order they were opened.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn insert(&mut self, key: &str, node: Node, group_path: &str) -> Result<String> {
        let path = self.get_mut(key)?.insert(node, group_path)?;
        self.notify(key, Change::Inserted { path: path.clone() });
        Ok(path)
    }

    pub fn delete(&mut self, key: &str, path: &str) -> Result<()> {
        self.get_mut(key)?.delete(path)?;
        self.notify(
            key,
            Change::Deleted {
                path: path.to_string(),
            },
        );
        Ok(())
    }

    pub fn rename(&mut self, key: &str, path: &str, new_name: &str) -> Result<String> {
        let renamed = self.get_mut(key)?.rename(path, new_name)?;
        self.notify(
            key,
            Change::Renamed {
                from: path.to_string(),
                to: renamed.clone(),
            },
        );
        Ok(renamed)
    }

    /// Moves a node within one namespace.
    pub fn move_node(
        &mut self,
        key: &str,
        path: &str,
        target_group: &str,
        strategy: OrderingStrategy,
    ) -> Result<String> {
        let moved = self.get_mut(key)?.move_node(path, target_group, strategy)?;
        self.notify(
            key,
            Change::Moved {
                from: path.to_string(),
                to: moved.clone(),
            },
        );
        Ok(moved)
    }

    /// Moves a subtree from one namespace into a group of another.
    ///
    /// Everything is validated before either namespace changes. The moved nodes
    /// get fresh payloads from the destination. When both keys are equal this
    /// is a plain [`Registry::move_node`].
    pub fn move_across(
        &mut self,
        from_key: &str,
        path: &str,
        to_key: &str,
        target_group: &str,
        strategy: OrderingStrategy,
    ) -> Result<String> {
        if from_key == to_key {
            return self.move_node(from_key, path, target_group, strategy);
        }
        let source = self.get(from_key)?;
        if source.resolve(path)? == source.tree.root() {
            return Err(NamespaceError::RootNode { operation: "move" }.into());
        }
        let stored = source.export_subtree(path)?;
        self.get(to_key)?.check_import(&stored, target_group)?;

        self.get_mut(from_key)?.delete(path)?;
        let landed = self
            .get_mut(to_key)?
            .import_subtree(stored, target_group, strategy)?;

        let change = Change::Transferred {
            from_namespace: from_key.to_string(),
            from: path.to_string(),
            to_namespace: to_key.to_string(),
            to: landed.clone(),
        };
        self.notify(from_key, change.clone());
        self.notify(to_key, change);
        Ok(landed)
    }

    pub fn transform(&mut self, key: &str, path: &str, to: NodeKind) -> Result<bool> {
        let changed = self.get_mut(key)?.transform(path, to)?;
        if changed {
            self.notify(
                key,
                Change::Transformed {
                    path: path.to_string(),
                    kind: to,
                },
            );
        }
        Ok(changed)
    }

    pub fn anchor_group(&mut self, key: &str, path: &str, anchor: Anchor) -> Result<()> {
        self.get_mut(key)?.anchor_group(path, anchor)?;
        self.notify(
            key,
            Change::Transformed {
                path: path.to_string(),
                kind: NodeKind::GroupMarker,
            },
        );
        Ok(())
    }

    /// Makes the group at `path` active. Returns false when nothing changed.
    pub fn activate(&mut self, key: &str, path: &str) -> Result<bool> {
        let changed = self.get_mut(key)?.activate(path);
        if changed {
            self.notify(
                key,
                Change::Activated {
                    path: path.to_string(),
                },
            );
        }
        Ok(changed)
    }

    pub fn apply_edit(&mut self, key: &str, file: &str, edit: LineEdit) -> Result<EditOutcome> {
        let outcome = self.get_mut(key)?.apply_edit(file, edit)?;
        self.notify_edit(key, file, &outcome);
        Ok(outcome)
    }

    pub fn apply_edits(&mut self, key: &str, file: &str, edits: &[LineEdit]) -> Result<EditOutcome> {
        let outcome = self.get_mut(key)?.apply_edits(file, edits)?;
        self.notify_edit(key, file, &outcome);
        Ok(outcome)
    }

    pub fn reanchor<S: AsRef<str>>(
        &mut self,
        key: &str,
        file: &str,
        lines: &[S],
    ) -> Result<EditOutcome> {
        let outcome = self.get_mut(key)?.reanchor(file, lines)?;
        self.notify_edit(key, file, &outcome);
        Ok(outcome)
    }

    fn notify_edit(&self, key: &str, file: &str, outcome: &EditOutcome) {
        if !outcome.is_empty() {
            self.notify(
                key,
                Change::Edited {
                    file: file.to_string(),
                    outcome: outcome.clone(),
                },
            );
        }
    }

    fn notify(&self, key: &str, change: Change) {
        if self.hooks.is_empty() {
            return;
        }
        let context = MutationContext {
            namespace: key.to_string(),
            change,
        };
        hooks::dispatch(&self.hooks, &context);
    }
}
