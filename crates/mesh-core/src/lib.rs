//! # Mesh Core
//!
//! 資料集核心模型與類型定義（陣列、屬性集合、資料集、複合資料集）

pub mod array;
pub mod attributes;
pub mod composite;
pub mod config;
pub mod dataset;
pub mod mtime;
pub mod object;

// Re-export 主要類型
pub use array::{ArrayData, DataArray, IdKey};
pub use attributes::{AttributeKind, AttributeSet, GHOST_ARRAY_NAME};
pub use composite::{BlockPath, CompositeDataSet};
pub use config::CacheConfig;
pub use dataset::DataSet;
pub use mtime::{next_mtime, Consumer, StageClock};
pub use object::{DataObject, DataObjectRef, MeshStamp, UnsupportedData};

/// 網格資料錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("陣列型別不一致: {0}")]
    ArrayTypeMismatch(String),

    #[error("陣列分量數不一致：目標 {expected}，來源 {found}")]
    ComponentMismatch { expected: usize, found: usize },

    #[error("tuple 索引超出範圍: {index}（共 {count} 筆）")]
    TupleOutOfRange { index: usize, count: usize },

    #[error("陣列長度 {len} 不是分量數 {components} 的整數倍")]
    InvalidArrayLength { len: usize, components: usize },

    #[error("無效的 cell 連接: {0}")]
    InvalidCell(String),

    #[error("不支援的資料物件類型: {0}")]
    UnsupportedDataObject(String),

    #[error("來源資料物件正在被修改，無法讀取")]
    SourceBusy,

    #[error("區塊索引超出範圍: {0}")]
    BlockIndexOutOfRange(usize),

    #[error("複合資料集結構不一致: {0}")]
    StructureMismatch(String),

    #[error("設定解析錯誤: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MeshError>;
