//! JSON change batch files.
//!
//! A file holds one batch object or an array of them:
//! ```text
//! { "world": "robot", "header": { "seq": 1 }, "changes": { "nodes_to_delete": ["n1"] } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uwds_common::{Header, WorldName};
use uwds_kernel::{Changes, ChangesError, Invalidations, WorldRegistry};

/// A change batch addressed to a named world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFile {
    pub world: WorldName,
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub changes: Changes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<BatchFile>),
    Many(Vec<BatchFile>),
}

/// Errors from loading or applying batch files.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed batch file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("batch for world '{world}' rejected: {source}")]
    Invalid {
        world: WorldName,
        source: ChangesError,
    },
}

/// Read every batch in a JSON file, in file order.
pub fn load_batches(path: impl AsRef<Path>) -> Result<Vec<BatchFile>, BatchError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: OneOrMany = serde_json::from_str(&data).map_err(|source| BatchError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let batches = match parsed {
        OneOrMany::One(batch) => vec![*batch],
        OneOrMany::Many(batches) => batches,
    };
    tracing::debug!(path = %path.display(), batches = batches.len(), "loaded batch file");
    Ok(batches)
}

/// Validate a batch and apply it to its world, creating the world on first use.
pub fn apply_batch(registry: &WorldRegistry, batch: BatchFile) -> Result<Invalidations, BatchError> {
    batch.changes.validate().map_err(|source| BatchError::Invalid {
        world: batch.world.clone(),
        source,
    })?;
    let world = registry.get_or_create(batch.world.as_str());
    Ok(world.apply_changes(&batch.header, batch.changes))
}
