//! 複合資料集模型（多區塊樹）

use crate::dataset::DataSet;
use crate::mtime::next_mtime;
use crate::object::DataObject;
use crate::{MeshError, Result};

/// 葉節點在樹中的位置（各層區塊索引）
pub type BlockPath = Vec<usize>;

/// 多區塊複合資料集
///
/// 區塊可以是單一資料集、巢狀複合資料集或空槽（`None`）。
#[derive(Debug, Clone, Default)]
pub struct CompositeDataSet {
    blocks: Vec<Option<DataObject>>,

    /// 區塊新增、取代或移除時前進
    structure_mtime: u64,
}

impl CompositeDataSet {
    /// 創建空的複合資料集
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            structure_mtime: next_mtime(),
        }
    }

    /// 由區塊列表建立
    pub fn with_blocks(blocks: Vec<Option<DataObject>>) -> Self {
        Self {
            blocks,
            structure_mtime: next_mtime(),
        }
    }

    pub fn number_of_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// 調整區塊數量，新增的槽位為空
    pub fn set_number_of_blocks(&mut self, count: usize) {
        self.blocks.resize_with(count, || None);
        self.structure_mtime = next_mtime();
    }

    /// 設置區塊，必要時擴充槽位
    ///
    /// `index` 為 `usize::MAX` 時無法擴充，回傳錯誤。
    pub fn set_block(&mut self, index: usize, block: Option<DataObject>) -> Result<()> {
        if index >= self.blocks.len() {
            let count = index
                .checked_add(1)
                .ok_or(MeshError::BlockIndexOutOfRange(index))?;
            self.blocks.resize_with(count, || None);
        }
        self.blocks[index] = block;
        self.structure_mtime = next_mtime();
        Ok(())
    }

    pub fn block(&self, index: usize) -> Option<&DataObject> {
        self.blocks.get(index)?.as_ref()
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut DataObject> {
        self.blocks.get_mut(index)?.as_mut()
    }

    /// 依位置取得葉資料集
    pub fn leaf(&self, path: &[usize]) -> Option<&DataSet> {
        let (first, rest) = path.split_first()?;
        match (self.block(*first)?, rest.is_empty()) {
            (DataObject::DataSet(ds), true) => Some(ds),
            (DataObject::Composite(child), false) => child.leaf(rest),
            _ => None,
        }
    }

    /// 依位置取得可變葉資料集
    pub fn leaf_mut(&mut self, path: &[usize]) -> Option<&mut DataSet> {
        let (first, rest) = path.split_first()?;
        match (self.block_mut(*first)?, rest.is_empty()) {
            (DataObject::DataSet(ds), true) => Some(ds),
            (DataObject::Composite(child), false) => child.leaf_mut(rest),
            _ => None,
        }
    }

    /// 所有非空葉資料集（深度優先）
    pub fn leaves(&self) -> Vec<(BlockPath, &DataSet)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<usize>, out: &mut Vec<(BlockPath, &'a DataSet)>) {
        for (index, block) in self.blocks.iter().enumerate() {
            prefix.push(index);
            match block {
                Some(DataObject::DataSet(ds)) => out.push((prefix.clone(), ds)),
                Some(DataObject::Composite(child)) => child.collect_leaves(prefix, out),
                Some(DataObject::Unsupported(_)) | None => {}
            }
            prefix.pop();
        }
    }

    /// 依區塊路徑記錄各複合節點的結構時間與各葉節點的幾何時間
    pub(crate) fn collect_mesh_stamps(
        &self,
        prefix: &mut Vec<usize>,
        out: &mut Vec<(BlockPath, u64)>,
    ) {
        out.push((prefix.clone(), self.structure_mtime));
        for (index, block) in self.blocks.iter().enumerate() {
            prefix.push(index);
            match block {
                Some(DataObject::Composite(child)) => child.collect_mesh_stamps(prefix, out),
                Some(other) => out.push((prefix.clone(), other.mesh_mtime())),
                None => {}
            }
            prefix.pop();
        }
    }

    /// 非空葉資料集數量
    pub fn non_empty_leaf_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| match block {
                Some(DataObject::DataSet(_)) => 1,
                Some(DataObject::Composite(child)) => child.non_empty_leaf_count(),
                Some(DataObject::Unsupported(_)) | None => 0,
            })
            .sum()
    }

    /// 所有非空葉資料集都滿足條件（不配置記憶體）
    pub fn all_leaves<F>(&self, predicate: &mut F) -> bool
    where
        F: FnMut(&DataSet) -> bool,
    {
        self.blocks.iter().all(|block| match block {
            Some(DataObject::DataSet(ds)) => predicate(ds),
            Some(DataObject::Composite(child)) => child.all_leaves(predicate),
            Some(DataObject::Unsupported(_)) | None => true,
        })
    }

    /// 每個葉節點都是單一資料集（空槽允許）
    pub fn is_supported(&self) -> bool {
        self.blocks.iter().all(|block| match block {
            Some(DataObject::DataSet(_)) | None => true,
            Some(DataObject::Composite(child)) => child.is_supported(),
            Some(DataObject::Unsupported(_)) => false,
        })
    }

    /// 幾何修改時間：結構變更與所有子區塊幾何時間的最大值
    pub fn mesh_mtime(&self) -> u64 {
        self.blocks
            .iter()
            .flatten()
            .map(DataObject::mesh_mtime)
            .fold(self.structure_mtime, u64::max)
    }

    /// 整體修改時間
    pub fn mtime(&self) -> u64 {
        self.blocks
            .iter()
            .flatten()
            .map(DataObject::mtime)
            .fold(self.structure_mtime, u64::max)
    }
}

impl PartialEq for CompositeDataSet {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}
