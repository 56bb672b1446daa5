//! 資料物件（封閉變體）

use std::cell::RefCell;
use std::rc::Rc;

use crate::composite::{BlockPath, CompositeDataSet};
use crate::dataset::DataSet;
use crate::mtime::next_mtime;

/// 共享的資料物件，快取只持有其弱引用
pub type DataObjectRef = Rc<RefCell<DataObject>>;

/// 資料物件
#[derive(Debug, Clone)]
pub enum DataObject {
    /// 單一資料集（點 / 單元幾何）
    DataSet(DataSet),
    /// 複合資料集
    Composite(CompositeDataSet),
    /// 其他結構模型（例如樹狀網格），快取不支援
    Unsupported(UnsupportedData),
}

/// 不支援的資料物件，只保留類型名稱與修改時間
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedData {
    type_name: String,
    mtime: u64,
}

impl UnsupportedData {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            mtime: next_mtime(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// 幾何時間快照
///
/// 依區塊路徑記錄每個複合節點的結構時間與每個葉節點的幾何時間，只比較相等。
/// 整塊取代區塊時，即使新區塊的時間戳較舊，快照也會不同。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshStamp {
    entries: Vec<(BlockPath, u64)>,
}

impl MeshStamp {
    pub fn entries(&self) -> &[(BlockPath, u64)] {
        &self.entries
    }

    /// 最新的時間戳（空快照為 0）
    pub fn latest(&self) -> u64 {
        self.entries.iter().map(|(_, stamp)| *stamp).max().unwrap_or(0)
    }
}

impl DataObject {
    /// 包裝為共享引用
    pub fn shared(self) -> DataObjectRef {
        Rc::new(RefCell::new(self))
    }

    /// 是否可被網格快取處理
    ///
    /// 單一資料集，或每個葉節點都是單一資料集的複合資料集。
    pub fn is_supported(&self) -> bool {
        match self {
            DataObject::DataSet(_) => true,
            DataObject::Composite(composite) => composite.is_supported(),
            DataObject::Unsupported(_) => false,
        }
    }

    /// 類型名稱（用於日誌）
    pub fn type_name(&self) -> &str {
        match self {
            DataObject::DataSet(_) => "DataSet",
            DataObject::Composite(_) => "CompositeDataSet",
            DataObject::Unsupported(data) => data.type_name(),
        }
    }

    /// 幾何修改時間
    pub fn mesh_mtime(&self) -> u64 {
        match self {
            DataObject::DataSet(ds) => ds.mesh_mtime(),
            DataObject::Composite(composite) => composite.mesh_mtime(),
            DataObject::Unsupported(data) => data.mtime,
        }
    }

    /// 幾何時間快照
    pub fn mesh_stamp(&self) -> MeshStamp {
        let mut entries = Vec::new();
        match self {
            DataObject::Composite(composite) => {
                composite.collect_mesh_stamps(&mut Vec::new(), &mut entries)
            }
            other => entries.push((Vec::new(), other.mesh_mtime())),
        }
        MeshStamp { entries }
    }

    /// 整體修改時間
    pub fn mtime(&self) -> u64 {
        match self {
            DataObject::DataSet(ds) => ds.mtime(),
            DataObject::Composite(composite) => composite.mtime(),
            DataObject::Unsupported(data) => data.mtime,
        }
    }

    pub fn as_data_set(&self) -> Option<&DataSet> {
        match self {
            DataObject::DataSet(ds) => Some(ds),
            _ => None,
        }
    }

    pub fn as_data_set_mut(&mut self) -> Option<&mut DataSet> {
        match self {
            DataObject::DataSet(ds) => Some(ds),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeDataSet> {
        match self {
            DataObject::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeDataSet> {
        match self {
            DataObject::Composite(composite) => Some(composite),
            _ => None,
        }
    }
}

impl Default for DataObject {
    fn default() -> Self {
        DataObject::DataSet(DataSet::new())
    }
}

impl From<DataSet> for DataObject {
    fn from(ds: DataSet) -> Self {
        DataObject::DataSet(ds)
    }
}

impl From<CompositeDataSet> for DataObject {
    fn from(composite: CompositeDataSet) -> Self {
        DataObject::Composite(composite)
    }
}

impl PartialEq for DataObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataObject::DataSet(a), DataObject::DataSet(b)) => a == b,
            (DataObject::Composite(a), DataObject::Composite(b)) => a == b,
            (DataObject::Unsupported(a), DataObject::Unsupported(b)) => a.type_name == b.type_name,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_variants() {
        let simple = DataObject::from(DataSet::new());
        let composite = DataObject::from(CompositeDataSet::with_blocks(vec![
            Some(DataSet::new().into()),
            None,
        ]));
        let tree = DataObject::Unsupported(UnsupportedData::new("TreeGrid"));

        assert!(simple.is_supported());
        assert!(composite.is_supported());
        assert!(!tree.is_supported());
        assert_eq!(tree.type_name(), "TreeGrid");
    }

    #[test]
    fn test_composite_with_unsupported_leaf() {
        let composite = DataObject::from(CompositeDataSet::with_blocks(vec![Some(
            DataObject::Unsupported(UnsupportedData::new("TreeGrid")),
        )]));

        assert!(!composite.is_supported());
    }

    #[test]
    fn test_shared_reference() {
        let shared = DataObject::default().shared();
        let weak = Rc::downgrade(&shared);

        assert!(weak.upgrade().is_some());
        drop(shared);
        assert!(weak.upgrade().is_none());
    }
}
