use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::model::board::Board;
use crate::model::config::BoardConfig;
use crate::model::page::Page;
use crate::ops::grid::{self, GridError};

/// Name of the directory holding a board's files
pub const BOARD_DIR: &str = "board";
/// Config file inside the board directory
pub const CONFIG_FILE: &str = "board.toml";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a taskboard directory: no board/ directory found")]
    NotABoard,
    #[error("board already exists at {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit board.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("could not parse page document {path}: {source}")]
    PageParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize page document: {0}")]
    PageSerializeError(#[from] serde_json::Error),
    #[error("page document rejected: {0}")]
    Inconsistent(#[from] GridError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the board by walking up from the given directory, looking for
/// a `board/` subdirectory with a `board.toml`.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join(BOARD_DIR);
        if board_dir.is_dir() && board_dir.join(CONFIG_FILE).exists() {
            debug!(root = %current.display(), "discovered board");
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load a board (config and page document) from its root directory.
///
/// The page's boundary table is checked against its tasks; an inconsistent
/// document is refused rather than repaired.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }

    let config_path = board_dir.join(CONFIG_FILE);
    let config_text = read_file(&config_path)?;
    let config: BoardConfig = toml::from_str(&config_text)?;

    let page_path = board_dir.join(&config.page.file);
    let page = load_page(&page_path)?;
    grid::ensure_consistent(&page)?;

    Ok(Board {
        root: root.to_path_buf(),
        board_dir,
        config,
        page,
    })
}

/// Read and parse a page document without validating it.
pub fn load_page(path: &Path) -> Result<Page, BoardError> {
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|e| BoardError::PageParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save the board's page document back to disk
pub fn save_page(board: &Board) -> Result<(), BoardError> {
    write_page(&board.page_path(), &board.page)
}

/// Serialize a page document and write it atomically.
pub fn write_page(path: &Path, page: &Page) -> Result<(), BoardError> {
    let mut content = serde_json::to_string_pretty(page)?;
    content.push('\n');
    atomic_write(path, content.as_bytes()).map_err(|e| BoardError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        path = %path.display(),
        tasks = page.tasks.len(),
        "saved page"
    );
    Ok(())
}

/// Create `board/` under `root` with a config and a page document.
pub fn init_board(
    root: &Path,
    name: &str,
    page: &Page,
    force: bool,
) -> Result<Board, BoardError> {
    let board_dir = root.join(BOARD_DIR);
    let config_path = board_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(BoardError::AlreadyExists(board_dir));
    }
    fs::create_dir_all(&board_dir)?;

    let config_text = format!(
        "[board]\nname = {}\n\n[tasks]\nprovisional_prefix = \"pending\"\n\n[page]\nfile = \"page.json\"\n",
        toml_edit::Value::from(name)
    );
    atomic_write(&config_path, config_text.as_bytes()).map_err(|e| BoardError::WriteError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;

    let board = Board {
        root: root.to_path_buf(),
        board_dir,
        config,
        page: page.clone(),
    };
    save_page(&board)?;
    info!(root = %root.display(), name, "initialized board");
    Ok(board)
}

/// Write via a temp file in the same directory, then rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn read_file(path: &Path) -> Result<String, BoardError> {
    fs::read_to_string(path).map_err(|e| BoardError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
