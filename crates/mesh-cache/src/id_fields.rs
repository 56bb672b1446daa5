//! ID 欄位對照表

use mesh_core::{AttributeKind, CacheConfig};

/// 屬性類別 → 全域 ID 陣列名稱
///
/// 以固定大小的表格實作，查詢與判斷都不配置記憶體。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdFieldMap {
    names: [Option<String>; AttributeKind::COUNT],
}

impl IdFieldMap {
    /// 創建空對照表
    pub fn new() -> Self {
        Self::default()
    }

    /// 設置 ID 欄位，回傳被取代的名稱
    pub fn insert(&mut self, kind: AttributeKind, name: impl Into<String>) -> Option<String> {
        self.names[kind.index()].replace(name.into())
    }

    /// 移除 ID 欄位
    pub fn remove(&mut self, kind: AttributeKind) -> Option<String> {
        self.names[kind.index()].take()
    }

    /// 清除所有 ID 欄位
    pub fn clear(&mut self) {
        for name in &mut self.names {
            *name = None;
        }
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&str> {
        self.names[kind.index()].as_deref()
    }

    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.names[kind.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.names.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.names.iter().all(Option::is_none)
    }

    /// 已設置的 (類別, 名稱)，依類別索引排序
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &str)> + '_ {
        AttributeKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|name| (kind, name)))
    }
}

impl From<&CacheConfig> for IdFieldMap {
    fn from(config: &CacheConfig) -> Self {
        let mut map = Self::new();
        for (&kind, name) in &config.id_fields {
            map.insert(kind, name.clone());
        }
        map
    }
}
