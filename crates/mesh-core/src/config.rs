//! 網格快取配置模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attributes::AttributeKind;
use crate::Result;

/// 網格快取配置
///
/// ```
/// # use mesh_core::{AttributeKind, CacheConfig};
/// let config = CacheConfig::new()
///     .with_id_field(AttributeKind::Point, "GlobalPointIds")
///     .with_id_field(AttributeKind::Cell, "GlobalCellIds");
/// assert_eq!(config.id_field(AttributeKind::Point), Some("GlobalPointIds"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// 各屬性類別中保存全域 ID 的陣列名稱
    #[serde(default)]
    pub id_fields: BTreeMap<AttributeKind, String>,
}

impl CacheConfig {
    /// 創建空配置（不轉送任何屬性）
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置某屬性類別的 ID 欄位
    pub fn with_id_field(mut self, kind: AttributeKind, name: impl Into<String>) -> Self {
        self.id_fields.insert(kind, name.into());
        self
    }

    /// 取得某屬性類別的 ID 欄位名稱
    pub fn id_field(&self, kind: AttributeKind) -> Option<&str> {
        self.id_fields.get(&kind).map(String::as_str)
    }

    /// 從 JSON 解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 序列化為 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
