//! Store manager: owns the inventory and the session registry, and
//! finalizes carts into sales.
//!
//! Construct one [`StoreManager`] at process start ([`StoreManager::init`]),
//! share it as an `Arc`, and call [`StoreManager::teardown`] at shutdown.
//! There is no global state.

pub mod manager;
pub mod receipt;
pub mod registry;

pub use manager::{StoreManager, TeardownSummary};
pub use receipt::{Receipt, ReceiptLine};
pub use registry::{SessionInfo, SessionRegistry};
