use serde::{Deserialize, Serialize};

/// Configuration from board.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Prefix for placeholder ids of tasks awaiting confirmation
    #[serde(default = "default_provisional_prefix")]
    pub provisional_prefix: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            provisional_prefix: default_provisional_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page document path, relative to the board/ directory
    #[serde(default = "default_page_file")]
    pub file: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            file: default_page_file(),
        }
    }
}

fn default_provisional_prefix() -> String {
    "pending".to_string()
}

fn default_page_file() -> String {
    "page.json".to_string()
}
