//! # Mesh Cache
//!
//! 網格快取與屬性轉送模組：幾何未變更時重用快取網格，只刷新屬性資料

pub mod correlator;
pub mod dispatcher;
pub mod forwarder;
pub mod id_fields;
pub mod mesh_cache;
pub mod status;

// Re-export 主要類型
pub use correlator::IdCorrelator;
pub use dispatcher::CompositeDispatcher;
pub use forwarder::AttributeForwarder;
pub use id_fields::IdFieldMap;
pub use mesh_cache::MeshCache;
pub use status::Status;
