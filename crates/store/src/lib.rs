//! In-memory persistence collaborator for Weft.
//!
//! [`InventoryStore`] keeps every record behind one async lock. Each write
//! path takes the lock, recomputes the aggregate it depends on, hands the raw
//! records to `weft-core` and commits the validated result before releasing
//! it, so recompute-validate-commit is atomic.
//!
//! A [`Snapshot`] is the serde form of the whole store; it is what the report
//! binary reads from disk.

pub mod error;
pub mod snapshot;
pub mod store;
pub mod views;

pub use error::StoreError;
pub use snapshot::Snapshot;
pub use store::InventoryStore;
pub use views::{OrderView, StockLevel};
