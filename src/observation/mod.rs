mod accessor;
mod snapshot;

pub use snapshot::{LocationKey, Snapshot, SnapshotBuilder, SymbolGrid};
