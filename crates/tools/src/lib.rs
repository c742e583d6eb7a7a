//! Developer Tooling: world inspector and change batch files.
//!
//! # Invariants
//! - Tools only read worlds, or write them through `apply_changes`.

mod batch;
mod inspector;

pub use batch::{BatchError, BatchFile, apply_batch, load_batches};
pub use inspector::{NodeInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "uwds-tools v0.1.0"
}
