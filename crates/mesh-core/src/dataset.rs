//! 單一資料集模型（點 / 單元幾何）

use crate::attributes::{AttributeKind, AttributeSet};
use crate::mtime::next_mtime;
use crate::{MeshError, Result};

/// 以點與單元描述幾何的資料集
///
/// 維護兩個時間戳：
/// - 幾何時間：只在點、單元或 ghost 標記變更時前進
/// - 整體時間：任何變更（包含欄位資料）都會前進
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    /// 點座標
    points: Vec<[f64; 3]>,

    /// 單元連接（每個單元為點索引列表）
    cells: Vec<Vec<usize>>,

    /// 各屬性類別的陣列，依 [`AttributeKind::index`] 排列
    attributes: [AttributeSet; AttributeKind::COUNT],

    /// 整體欄位資料
    field_data: AttributeSet,

    geometry_mtime: u64,
    mtime: u64,
}

impl DataSet {
    /// 創建空資料集
    pub fn new() -> Self {
        Self::default()
    }

    /// 由點與單元建立資料集
    pub fn from_geometry(points: Vec<[f64; 3]>, cells: Vec<Vec<usize>>) -> Result<Self> {
        Self::validate_cells(&cells, points.len())?;
        let stamp = next_mtime();
        Ok(Self {
            points,
            cells,
            geometry_mtime: stamp,
            mtime: stamp,
            ..Self::default()
        })
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// 沒有點也沒有單元
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.cells.is_empty()
    }

    /// 取代點座標（既有單元必須仍然有效）
    pub fn set_points(&mut self, points: Vec<[f64; 3]>) -> Result<()> {
        Self::validate_cells(&self.cells, points.len())?;
        self.points = points;
        self.geometry_modified();
        Ok(())
    }

    /// 取代所有單元
    pub fn set_cells(&mut self, cells: Vec<Vec<usize>>) -> Result<()> {
        Self::validate_cells(&cells, self.points.len())?;
        self.cells = cells;
        self.geometry_modified();
        Ok(())
    }

    /// 新增單元，回傳其索引
    pub fn insert_cell(&mut self, connectivity: Vec<usize>) -> Result<usize> {
        Self::validate_cells(std::slice::from_ref(&connectivity), self.points.len())?;
        self.cells.push(connectivity);
        self.geometry_modified();
        Ok(self.cells.len() - 1)
    }

    pub fn attributes(&self, kind: AttributeKind) -> &AttributeSet {
        &self.attributes[kind.index()]
    }

    pub fn attributes_mut(&mut self, kind: AttributeKind) -> &mut AttributeSet {
        &mut self.attributes[kind.index()]
    }

    pub fn point_data(&self) -> &AttributeSet {
        self.attributes(AttributeKind::Point)
    }

    pub fn cell_data(&self) -> &AttributeSet {
        self.attributes(AttributeKind::Cell)
    }

    pub fn field_data(&self) -> &AttributeSet {
        &self.field_data
    }

    pub fn field_data_mut(&mut self) -> &mut AttributeSet {
        &mut self.field_data
    }

    /// 取代整體欄位資料
    pub fn set_field_data(&mut self, field_data: AttributeSet) {
        self.field_data = field_data;
        self.modified();
    }

    /// 只複製幾何（點與單元），不含任何屬性
    pub fn copy_structure(&self) -> DataSet {
        let stamp = next_mtime();
        DataSet {
            points: self.points.clone(),
            cells: self.cells.clone(),
            geometry_mtime: stamp,
            mtime: stamp,
            ..DataSet::default()
        }
    }

    /// 指定屬性類別預期的 tuple 數
    pub fn tuple_count(&self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Point => self.points.len(),
            AttributeKind::Cell => self.cells.len(),
            _ => self.attributes(kind).tuple_count(),
        }
    }

    /// 幾何（網格）修改時間，包含 ghost 標記的變更
    pub fn mesh_mtime(&self) -> u64 {
        self.geometry_mtime
            .max(self.point_data().ghost_mtime())
            .max(self.cell_data().ghost_mtime())
    }

    /// 整體修改時間
    pub fn mtime(&self) -> u64 {
        self.attributes
            .iter()
            .map(AttributeSet::mtime)
            .fold(self.mtime.max(self.geometry_mtime), u64::max)
            .max(self.field_data.mtime())
    }

    /// 標記一般修改
    pub fn modified(&mut self) {
        self.mtime = next_mtime();
    }

    /// 標記幾何修改
    pub fn geometry_modified(&mut self) {
        let stamp = next_mtime();
        self.geometry_mtime = stamp;
        self.mtime = stamp;
    }

    fn validate_cells(cells: &[Vec<usize>], point_count: usize) -> Result<()> {
        for (cell_id, connectivity) in cells.iter().enumerate() {
            if let Some(&bad) = connectivity.iter().find(|&&p| p >= point_count) {
                return Err(MeshError::InvalidCell(format!(
                    "單元 {} 引用點 {}，但只有 {} 個點",
                    cell_id, bad, point_count
                )));
            }
        }
        Ok(())
    }
}

impl PartialEq for DataSet {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
            && self.cells == other.cells
            && self.attributes == other.attributes
            && self.field_data == other.field_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DataArray;
    use crate::attributes::GHOST_ARRAY_NAME;

    fn triangle() -> DataSet {
        DataSet::from_geometry(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![vec![0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_create_dataset() {
        let ds = triangle();

        assert_eq!(ds.number_of_points(), 3);
        assert_eq!(ds.number_of_cells(), 1);
        assert_eq!(ds.tuple_count(AttributeKind::Point), 3);
        assert_eq!(ds.tuple_count(AttributeKind::Cell), 1);
        assert!(ds.mesh_mtime() > 0);
    }

    #[test]
    fn test_invalid_cell_rejected() {
        let result = DataSet::from_geometry(vec![[0.0; 3]], vec![vec![0, 3]]);
        assert!(matches!(result, Err(MeshError::InvalidCell(_))));

        let mut ds = triangle();
        assert!(ds.insert_cell(vec![0, 9]).is_err());
        assert_eq!(ds.number_of_cells(), 1);
    }

    #[test]
    fn test_field_change_keeps_mesh_mtime() {
        let mut ds = triangle();
        let mesh = ds.mesh_mtime();
        let overall = ds.mtime();

        ds.attributes_mut(AttributeKind::Point)
            .add_array(DataArray::from_f64("Temperature", vec![1.0, 2.0, 3.0]));
        ds.field_data_mut()
            .add_array(DataArray::from_f64("TimeValue", vec![0.5]));

        assert_eq!(ds.mesh_mtime(), mesh);
        assert!(ds.mtime() > overall);
    }

    #[test]
    fn test_geometry_change_bumps_mesh_mtime() {
        let mut ds = triangle();
        let mesh = ds.mesh_mtime();

        ds.insert_cell(vec![2, 1, 0]).unwrap();

        assert!(ds.mesh_mtime() > mesh);
    }

    #[test]
    fn test_ghost_array_bumps_mesh_mtime() {
        let mut ds = triangle();
        let mesh = ds.mesh_mtime();

        ds.attributes_mut(AttributeKind::Cell)
            .add_array(DataArray::from_u8(GHOST_ARRAY_NAME, vec![1]));

        assert!(ds.mesh_mtime() > mesh);
    }

    #[test]
    fn test_copy_structure_drops_attributes() {
        let mut ds = triangle();
        ds.attributes_mut(AttributeKind::Point)
            .add_array(DataArray::from_i64("GlobalIds", vec![1, 2, 3]));

        let copy = ds.copy_structure();

        assert_eq!(copy.points(), ds.points());
        assert_eq!(copy.cells(), ds.cells());
        assert!(copy.point_data().is_empty());
    }
}
