use std::fs;
use std::path::Path;

use crate::io::board_io::{BoardError, CONFIG_FILE, atomic_write};
use crate::model::config::BoardConfig;

/// Read the board config, returning both the parsed config and the raw
/// toml_edit Document for round-trip-safe editing.
pub fn read_config(board_dir: &Path) -> Result<(BoardConfig, toml_edit::DocumentMut), BoardError> {
    let config_path = board_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(board_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), BoardError> {
    let config_path = board_dir.join(CONFIG_FILE);
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| BoardError::WriteError {
        path: config_path,
        source: e,
    })
}

/// Update the board name in the config document
pub fn set_board_name(doc: &mut toml_edit::DocumentMut, name: &str) {
    if !doc.contains_key("board") {
        doc["board"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["board"]["name"] = toml_edit::value(name);
}

/// Update the provisional id prefix in the config document
pub fn set_provisional_prefix(doc: &mut toml_edit::DocumentMut, prefix: &str) {
    if !doc.contains_key("tasks") {
        doc["tasks"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["tasks"]["provisional_prefix"] = toml_edit::value(prefix);
}
