use std::fs;
use std::path::Path;

use crate::io::board_io::StoreError;
use crate::model::config::BoardConfig;

/// Read the board config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(stride_dir: &Path) -> Result<(BoardConfig, toml_edit::DocumentMut), StoreError> {
    let config_path = stride_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse().map_err(|_: toml_edit::TomlError| {
        StoreError::ConfigParseError(toml::from_str::<BoardConfig>("").unwrap_err())
    })?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(stride_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), StoreError> {
    let config_path = stride_dir.join("config.toml");
    fs::write(&config_path, doc.to_string()).map_err(|e| StoreError::ReadError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

/// Update the [user] name field in the config document
pub fn set_user_name(doc: &mut toml_edit::DocumentMut, name: &str) {
    if !doc.contains_key("user") {
        doc["user"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["user"]["name"] = toml_edit::value(name);
}
