//! # Mesh Cache Engine
//!
//! 幾何快取引擎：來源只有屬性資料變更時，重用上一次的幾何結果，
//! 並依全域 ID 從來源轉送最新的屬性陣列。
//!
//! ```
//! use std::rc::Rc;
//! use meshcache::{AttributeKind, DataArray, DataObject, DataSet, MeshCache, StageClock};
//!
//! let mut surface = DataSet::from_geometry(vec![[0.0; 3], [1.0, 0.0, 0.0]], Vec::new()).unwrap();
//! surface
//!     .attributes_mut(AttributeKind::Point)
//!     .add_array(DataArray::from_i64("GlobalIds", vec![1, 2]));
//! let source = DataObject::from(surface).shared();
//! let stage = Rc::new(StageClock::new("iso-surface"));
//!
//! let mut cache = MeshCache::new();
//! cache.add_id_field(AttributeKind::Point, "GlobalIds");
//! cache.set_source(Some(&source)).unwrap();
//! cache.set_consumer(Some(stage.clone()));
//! let fresh = source.borrow().clone();
//! cache.capture(&fresh).unwrap();
//!
//! assert!(cache.status().enabled());
//! ```

pub use mesh_cache::{AttributeForwarder, CompositeDispatcher, IdCorrelator, IdFieldMap, MeshCache, Status};
pub use mesh_core::{
    next_mtime, ArrayData, AttributeKind, AttributeSet, BlockPath, CacheConfig, CompositeDataSet,
    Consumer, DataArray, DataObject, DataObjectRef, DataSet, IdKey, MeshError, MeshStamp, Result, StageClock,
    UnsupportedData, GHOST_ARRAY_NAME,
};
