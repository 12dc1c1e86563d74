//! Post-mutation hooks.
//!
//! The engine never renders or persists anything itself. After every
//! successful mutation made through a [`Registry`](super::Registry), the
//! registered hooks are told which namespace changed and how, so the host can
//! refresh its views and schedule a save.

use std::sync::Arc;

use crate::{Result, node::NodeKind, shift::EditOutcome};

/// What a successful mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Inserted { path: String },
    Deleted { path: String },
    Renamed { from: String, to: String },
    Moved { from: String, to: String },
    /// A subtree left one namespace for another. Sent to both namespaces.
    Transferred {
        from_namespace: String,
        from: String,
        to_namespace: String,
        to: String,
    },
    Transformed { path: String, kind: NodeKind },
    Activated { path: String },
    Edited { file: String, outcome: EditOutcome },
}

/// Context information passed to hooks after a mutation.
#[derive(Debug, Clone)]
pub struct MutationContext {
    /// Key of the namespace that changed
    pub namespace: String,
    /// The change that was applied
    pub change: Change,
}

/// Trait for implementing hooks that run after each successful mutation.
pub trait MutationHook: Send + Sync {
    /// Called after a mutation has been fully applied.
    ///
    /// # Returns
    /// A Result indicating whether the hook processed successfully.
    /// Hook failures do not roll back the mutation, but are logged.
    fn on_mutation(&self, context: &MutationContext) -> Result<()>;
}

/// Runs every hook in registration order.
///
/// A failing hook is logged and does not stop the ones after it. Returns the
/// number of hooks that failed.
pub(crate) fn dispatch(hooks: &[Arc<dyn MutationHook>], context: &MutationContext) -> usize {
    hooks
        .iter()
        .filter_map(|hook| hook.on_mutation(context).err())
        .inspect(|err| {
            tracing::warn!(
                namespace = %context.namespace,
                change = ?context.change,
                "Mutation kept despite hook failure: {err}"
            );
        })
        .count()
}
