//! # Browse Engine
//!
//! Anchor-centered, ordered-range pagination ("shelf browse") over any index
//! that can answer directional range queries.
//!
//! ## Pipeline
//!
//! ```text
//! BrowseQuery
//!     │ validate (limit, precedingRecordsCount, anchor)
//!     ▼
//! BrowseConfigStore ── option ─> shelving algorithm + type ids
//!     ▼
//! BrowseWindowMerger ── try_join! ─┬─> port.fetch(< anchor, desc)
//!     │                            ├─> port.fetch(>= anchor, asc)
//!     │                            └─> port.count()
//!     ▼
//! ItemCollapser ─> IrrelevantResultFilter ─> Highlighter ─> BrowseResult
//! ```
//!
//! The merger is generic over a [`BrowseDomain`], which says how a record
//! family is keyed, displayed and collapsed, and over a
//! [`DirectionalQueryPort`], which is the index.
//!
//! ## Example
//!
//! ```no_run
//! use browse_config::MemoryConfigStore;
//! use browse_engine::{BrowseQuery, BrowseService, CallNumberDomain, DirectionalQueryPort,
//!     CallNumberRecord, EngineSettings};
//! use browse_protocol::TenantScope;
//! use std::sync::Arc;
//!
//! async fn page(port: &dyn DirectionalQueryPort<CallNumberRecord>) -> browse_engine::Result<()> {
//!     let service = BrowseService::new(Arc::new(MemoryConfigStore::new()), EngineSettings::default());
//!     let query = BrowseQuery::around("E 3184 S75 1234", 19, TenantScope::member("college"))
//!         .preceding(9);
//!     let result = service.browse(&CallNumberDomain, port, &query).await?;
//!     println!("{} of {}", result.items.len(), result.total_records);
//!     Ok(())
//! }
//! ```

mod collapse;
mod domain;
pub mod domains;
mod error;
mod filter;
mod highlight;
mod port;
mod query;
mod service;
mod settings;
mod window;

#[cfg(test)]
mod test_support;

pub use collapse::ItemCollapser;
pub use domain::{BrowseDomain, CatalogRecord};
pub use domains::{
    AuthRefType, AuthorityDomain, AuthorityRecord, CallNumberDomain, CallNumberRecord,
    ClassificationDomain, ClassificationRecord, ContributorDomain, ContributorRecord,
    SubjectDomain, SubjectRecord,
};
pub use error::{BrowseError, PortError, Result};
pub use filter::IrrelevantResultFilter;
pub use highlight::Highlighter;
pub use port::{
    BrowseEntry, BrowseSlice, Comparator, CountRequest, DirectionalQueryPort, SliceRequest,
    SortOrder,
};
pub use query::{mode_from_range, BrowseQuery, RangeBound};
pub use service::BrowseService;
pub use settings::{EngineSettings, HighlightMarker};
pub use window::BrowseWindowMerger;
