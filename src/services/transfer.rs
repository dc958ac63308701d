use std::{
    fs,
    path::{Path, PathBuf},
};

use jiff::Zoned;
use thiserror::Error;

use crate::{
    storage::{Storage, StorageError, tasks::export_file_name},
    store::{ImportError, TaskStore},
};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Writes the task list to `output`, or to `taskflow-export-<date>.json` in
/// `default_dir` when no output is given. Returns the written path.
pub fn export_to_file(
    store: &TaskStore<impl Storage>,
    output: Option<PathBuf>,
    default_dir: &Path,
) -> Result<PathBuf, TransferError> {
    let path = output.unwrap_or_else(|| default_dir.join(export_file_name(Zoned::now().date())));
    let blob = store.export()?;

    fs::write(&path, blob).map_err(|e| TransferError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), count = store.tasks().len(), "exported tasks");
    Ok(path)
}

/// Replaces the whole task list with the contents of `path`.
pub fn import_from_file(
    store: &mut TaskStore<impl Storage>,
    path: &Path,
) -> Result<usize, TransferError> {
    let text = fs::read_to_string(path).map_err(|e| TransferError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(store.import(&text)?)
}
