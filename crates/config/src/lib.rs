//! # Browse Config
//!
//! Per-tenant browse options (`ALL`, `LC`, `DEWEY`, ...) and feature toggles.
//!
//! An option maps to a shelving algorithm and a set of classification type
//! ids. Tenants start from built-in defaults and override them through
//! [`BrowseConfigStore::set`]. Stores hold no read cache, so the next browse
//! after an update already sees it.
//!
//! ## Example
//!
//! ```no_run
//! use browse_config::{BrowseConfig, BrowseConfigStore, FileConfigStore};
//! use browse_protocol::BrowseOptionId;
//! use browse_shelf_key::ShelvingAlgorithm;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), browse_config::ConfigError> {
//!     let store = FileConfigStore::new("/var/lib/catalog-browse/settings");
//!     let dewey = BrowseConfig::new(BrowseOptionId::new("DEWEY"), ShelvingAlgorithm::Dewey)
//!         .with_type_ids(["dewey-type-id"]);
//!     store.set("college", dewey).await?;
//!
//!     let resolved = store.get("college", &BrowseOptionId::new("dewey")).await?;
//!     assert_eq!(resolved.type_ids.len(), 1);
//!     Ok(())
//! }
//! ```

mod error;
mod store;
mod types;

pub use error::{ConfigError, Result};
pub use store::{BrowseConfigStore, FileConfigStore, MemoryConfigStore};
pub use types::{BrowseConfig, FeatureFlag, TenantSettings};
