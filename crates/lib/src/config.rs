//! Engine configuration.
//!
//! Configuration is plain data: the library never reads files or the
//! environment itself. Hosts deserialize it from their own settings (every field
//! has a default) or build it from command-line arguments.
//!
//! ```rust
//! use waymark::{Config, SortPolicy};
//!
//! let config: Config = serde_json::from_str(r#"{ "sort": "manual" }"#)?;
//! assert_eq!(config.sort, SortPolicy::Manual);
//! assert_eq!(config.reanchor_radius, waymark::constants::DEFAULT_REANCHOR_RADIUS);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::{constants::DEFAULT_REANCHOR_RADIUS, node::SortPolicy};

/// Settings shared by every namespace of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Ordering applied to the children of every group.
    pub sort: SortPolicy,
    /// Lines searched above and below a marker when its snapshot no longer matches.
    pub reanchor_radius: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort: SortPolicy::default(),
            reanchor_radius: DEFAULT_REANCHOR_RADIUS,
        }
    }
}

impl Config {
    pub fn with_sort(mut self, sort: SortPolicy) -> Self {
        self.sort = sort;
        self
    }
}
