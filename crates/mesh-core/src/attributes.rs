//! 屬性集合模型

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::array::DataArray;
use crate::mtime::next_mtime;

/// ghost 標記陣列名稱，變更會計入網格修改時間
pub const GHOST_ARRAY_NAME: &str = "GhostType";

/// 屬性類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// 點資料
    Point,
    /// 單元資料
    Cell,
    /// 頂點資料（圖結構）
    Vertex,
    /// 邊資料（圖結構）
    Edge,
    /// 列資料（表格）
    Row,
}

impl AttributeKind {
    /// 類別數量
    pub const COUNT: usize = 5;

    /// 所有類別，依索引排列
    pub const ALL: [AttributeKind; AttributeKind::COUNT] = [
        AttributeKind::Point,
        AttributeKind::Cell,
        AttributeKind::Vertex,
        AttributeKind::Edge,
        AttributeKind::Row,
    ];

    /// 表格索引
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::Point => "point",
            AttributeKind::Cell => "cell",
            AttributeKind::Vertex => "vertex",
            AttributeKind::Edge => "edge",
            AttributeKind::Row => "row",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 具名陣列集合（也用作整體欄位資料）
///
/// 修改時間只透過方法更新；比較相等時只比較陣列內容。
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    arrays: Vec<DataArray>,

    /// 任何變更
    mtime: u64,

    /// 涉及 ghost 陣列的變更
    ghost_mtime: u64,
}

impl AttributeSet {
    /// 創建空集合
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrays(&self) -> &[DataArray] {
        &self.arrays
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// 依名稱查找陣列
    pub fn array(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name() == name)
    }

    pub fn has_array(&self, name: &str) -> bool {
        self.array(name).is_some()
    }

    /// 依名稱取得可變陣列（視為一次修改）
    pub fn array_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        let position = self.arrays.iter().position(|a| a.name() == name)?;
        self.touch(name);
        Some(&mut self.arrays[position])
    }

    /// 加入陣列，同名陣列會被取代
    pub fn add_array(&mut self, array: DataArray) {
        self.touch(array.name());
        match self.arrays.iter_mut().find(|a| a.name() == array.name()) {
            Some(existing) => *existing = array,
            None => self.arrays.push(array),
        }
    }

    /// 移除陣列
    pub fn remove_array(&mut self, name: &str) -> Option<DataArray> {
        let position = self.arrays.iter().position(|a| a.name() == name)?;
        self.touch(name);
        Some(self.arrays.remove(position))
    }

    /// 清空所有陣列
    pub fn clear(&mut self) {
        if self.has_array(GHOST_ARRAY_NAME) {
            self.touch(GHOST_ARRAY_NAME);
        } else {
            self.mtime = next_mtime();
        }
        self.arrays.clear();
    }

    /// tuple 數量（取第一個陣列，空集合為 0）
    pub fn tuple_count(&self) -> usize {
        self.arrays.first().map_or(0, DataArray::tuple_count)
    }

    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    pub fn ghost_mtime(&self) -> u64 {
        self.ghost_mtime
    }

    fn touch(&mut self, name: &str) {
        let stamp = next_mtime();
        self.mtime = stamp;
        if name == GHOST_ARRAY_NAME {
            self.ghost_mtime = stamp;
        }
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.arrays == other.arrays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_add_and_find() {
        let mut set = AttributeSet::new();
        set.add_array(DataArray::from_f64("Temperature", vec![1.0, 2.0]));
        set.add_array(DataArray::from_i64("GlobalIds", vec![7, 8]));

        assert_eq!(set.len(), 2);
        assert_eq!(set.tuple_count(), 2);
        assert!(set.has_array("GlobalIds"));
        assert!(set.array("Pressure").is_none());
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut set = AttributeSet::new();
        set.add_array(DataArray::from_f64("v", vec![1.0]));
        set.add_array(DataArray::from_f64("v", vec![2.0, 3.0]));

        assert_eq!(set.len(), 1);
        assert_eq!(set.tuple_count(), 2);
    }

    #[test]
    fn test_ghost_mtime_only_for_ghost_array() {
        let mut set = AttributeSet::new();
        set.add_array(DataArray::from_f64("v", vec![1.0]));
        assert_eq!(set.ghost_mtime(), 0);

        set.add_array(DataArray::from_u8(GHOST_ARRAY_NAME, vec![0]));
        let ghost_added = set.ghost_mtime();
        assert!(ghost_added > 0);

        set.array_mut("v");
        assert_eq!(set.ghost_mtime(), ghost_added);
        assert!(set.mtime() > ghost_added);

        set.remove_array(GHOST_ARRAY_NAME);
        assert!(set.ghost_mtime() > ghost_added);
    }

    #[test]
    fn test_equality_ignores_mtime() {
        let mut a = AttributeSet::new();
        a.add_array(DataArray::from_i64("ids", vec![1]));
        let mut b = AttributeSet::new();
        b.add_array(DataArray::from_i64("ids", vec![1]));

        assert_ne!(a.mtime(), b.mtime());
        assert_eq!(a, b);
    }

    #[test]
    fn test_kind_index_table() {
        for (i, kind) in AttributeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[rstest]
    #[case(AttributeKind::Point, "point")]
    #[case(AttributeKind::Cell, "cell")]
    #[case(AttributeKind::Vertex, "vertex")]
    #[case(AttributeKind::Edge, "edge")]
    #[case(AttributeKind::Row, "row")]
    fn test_kind_names(#[case] kind: AttributeKind, #[case] name: &str) {
        assert_eq!(kind.to_string(), name);
        assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", name));
    }
}
