/// Shared configuration types used by the board and its hosts.
use serde::{Deserialize, Serialize};

pub const DEFAULT_LISTS_KEY: &str = "lists";
pub const DEFAULT_TASKS_KEY: &str = "tasks";

/// Names of the two persisted slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default = "default_lists_key")]
    pub lists_key: String,
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,
}

fn default_lists_key() -> String {
    DEFAULT_LISTS_KEY.to_string()
}

fn default_tasks_key() -> String {
    DEFAULT_TASKS_KEY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lists_key: default_lists_key(),
            tasks_key: default_tasks_key(),
        }
    }
}
