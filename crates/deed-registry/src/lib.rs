//! Property registry for the Deed Registry.
//!
//! This crate owns all registry state. It provides:
//! - `RegistryWriter` / `RegistryReader` trait boundaries
//! - `InMemoryRegistry`, gate-checked and all-or-nothing on every call
//! - Fee transfers recorded per registration
//! - TOML configuration
//! - Checksummed JSON snapshots for persistence between runs

pub mod config;
pub mod error;
pub mod memory;
pub mod snapshot;
pub mod state;
pub mod traits;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use memory::InMemoryRegistry;
pub use snapshot::RegistrySnapshot;
pub use state::{FeeTransfer, RegistryState};
pub use traits::{CallContext, RegistryReader, RegistryWriter};
