//! 快取狀態

use serde::{Deserialize, Serialize};
use std::fmt;

/// 快取可用性狀態
///
/// 純值類型，六個獨立判斷全部成立時快取才可重用。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// 來源資料物件存在且為支援的類型
    pub source_defined: bool,

    /// 下游階段存在
    pub consumer_defined: bool,

    /// 已有快取
    pub cache_defined: bool,

    /// 來源幾何時間與快取時記錄的相同
    pub source_mesh_unchanged: bool,

    /// 下游階段時間與快取時記錄的相同
    pub consumer_unchanged: bool,

    /// 所有設置的 ID 欄位都存在於快取的每個非空葉節點
    pub id_fields_satisfied: bool,
}

impl Status {
    /// 快取是否可重用
    pub fn enabled(&self) -> bool {
        self.source_defined
            && self.consumer_defined
            && self.cache_defined
            && self.source_mesh_unchanged
            && self.consumer_unchanged
            && self.id_fields_satisfied
    }

    /// 未通過的檢查名稱
    pub fn failing_checks(&self) -> Vec<&'static str> {
        self.checks()
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }

    fn checks(&self) -> [(&'static str, bool); 6] {
        [
            ("source_defined", self.source_defined),
            ("consumer_defined", self.consumer_defined),
            ("cache_defined", self.cache_defined),
            ("source_mesh_unchanged", self.source_mesh_unchanged),
            ("consumer_unchanged", self.consumer_unchanged),
            ("id_fields_satisfied", self.id_fields_satisfied),
        ]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "enabled: {}", self.enabled())?;
        for (name, ok) in self.checks() {
            writeln!(f, "  {}: {}", name, ok)?;
        }
        Ok(())
    }
}
