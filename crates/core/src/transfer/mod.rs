//! Inter-warehouse transfers.
//!
//! A transfer is created in transit with its shipped items already deducted
//! from the source units. Completing it posts receipts at destination units;
//! cancelling it returns the shipped quantities to their source units. Both
//! are terminal.

pub mod error;
pub mod service;
pub mod types;

pub use error::TransferError;
pub use service::TransferLifecycle;
pub use types::{ReceivedItem, Transfer, TransferItem, TransferStatus};
