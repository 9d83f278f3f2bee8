use std::path::PathBuf;

use super::config::BoardConfig;
use super::page::Page;

/// A fully loaded board
#[derive(Debug)]
pub struct Board {
    /// Root directory of the board (parent of `board/`)
    pub root: PathBuf,
    /// Path to the `board/` directory
    pub board_dir: PathBuf,
    /// Parsed board.toml
    pub config: BoardConfig,
    /// The page document
    pub page: Page,
}

impl Board {
    /// Absolute path of the page document
    pub fn page_path(&self) -> PathBuf {
        self.board_dir.join(&self.config.page.file)
    }
}
