use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::activity::Activity;
use crate::model::board::Board;

/// Current on-disk schema version. The browser-era format had no version
/// field; refuse anything we don't recognize rather than guessing.
pub const SCHEMA_VERSION: u32 = 1;

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a stride board: no stride/ directory found")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unsupported board schema version {found} (this build reads version {SCHEMA_VERSION})")]
    SchemaVersion { found: u32 },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// On-disk envelope for board.json
#[derive(Debug, Serialize, Deserialize)]
struct BoardFile {
    schema: u32,
    activities: Vec<Activity>,
}

/// Discover the board by walking up from the given directory, looking for
/// a `stride/` subdirectory holding a board.json.
pub fn discover_board(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        let stride_dir = current.join("stride");
        if stride_dir.is_dir() && stride_dir.join("board.json").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotABoard);
        }
    }
}

pub fn board_path(stride_dir: &Path) -> PathBuf {
    stride_dir.join("board.json")
}

/// Load the board from `stride/board.json`.
pub fn load_board(stride_dir: &Path) -> Result<Board, StoreError> {
    let path = board_path(stride_dir);
    let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let file: BoardFile =
        serde_json::from_str(&content).map_err(|e| StoreError::ParseError { path, source: e })?;
    if file.schema != SCHEMA_VERSION {
        return Err(StoreError::SchemaVersion { found: file.schema });
    }
    Ok(Board {
        activities: file.activities,
    })
}

/// Save the board back to `stride/board.json` atomically.
pub fn save_board(stride_dir: &Path, board: &Board) -> Result<(), StoreError> {
    let file = BoardFile {
        schema: SCHEMA_VERSION,
        activities: board.activities.clone(),
    };
    let content = serde_json::to_string_pretty(&file).map_err(|e| StoreError::ParseError {
        path: board_path(stride_dir),
        source: e,
    })?;
    atomic_write(&board_path(stride_dir), content.as_bytes())?;
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
