//! 複合資料集的逐葉轉送

use mesh_core::{CompositeDataSet, MeshError};

use crate::forwarder::AttributeForwarder;
use crate::id_fields::IdFieldMap;

/// 複合資料集分派器
pub struct CompositeDispatcher;

impl CompositeDispatcher {
    /// 將快取的每個非空葉節點與來源相同位置的葉節點配對並轉送
    ///
    /// 全有或全無：非空葉節點數不同，或來源在某個位置為空 / 不存在時，
    /// 回傳 [`MeshError::StructureMismatch`]，不產生任何部分輸出。
    pub fn dispatch(
        cached: &CompositeDataSet,
        source: &CompositeDataSet,
        id_fields: &IdFieldMap,
    ) -> mesh_core::Result<CompositeDataSet> {
        let cached_leaves = cached.leaves();
        let source_count = source.non_empty_leaf_count();
        if cached_leaves.len() != source_count {
            return Err(MeshError::StructureMismatch(format!(
                "快取有 {} 個非空葉節點，來源有 {} 個",
                cached_leaves.len(),
                source_count
            )));
        }

        let mut forwarded = Vec::with_capacity(cached_leaves.len());
        for (path, cached_leaf) in cached_leaves {
            let source_leaf = source.leaf(&path).ok_or_else(|| {
                MeshError::StructureMismatch(format!("來源在位置 {:?} 沒有資料集", path))
            })?;
            let leaf = AttributeForwarder::forward(cached_leaf, source_leaf, id_fields)?;
            forwarded.push((path, leaf));
        }

        // 以快取的結構重組輸出
        let mut output = cached.clone();
        for (path, leaf) in forwarded {
            let slot = output.leaf_mut(&path).ok_or_else(|| {
                MeshError::StructureMismatch(format!("輸出在位置 {:?} 沒有資料集", path))
            })?;
            *slot = leaf;
        }

        tracing::debug!("複合資料集轉送完成：{} 個葉節點", output.non_empty_leaf_count());

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_core::{ArrayData, AttributeKind, DataArray, DataObject, DataSet};

    fn partition(ids: Vec<i64>, values: Option<Vec<f64>>) -> DataObject {
        let points = (0..ids.len()).map(|i| [i as f64, 1.0, 0.0]).collect();
        let mut ds = DataSet::from_geometry(points, Vec::new()).unwrap();
        ds.attributes_mut(AttributeKind::Point)
            .add_array(DataArray::from_i64("GlobalIds", ids));
        if let Some(values) = values {
            ds.attributes_mut(AttributeKind::Point)
                .add_array(DataArray::from_f64("v", values));
        }
        DataObject::DataSet(ds)
    }

    fn point_ids() -> IdFieldMap {
        let mut map = IdFieldMap::new();
        map.insert(AttributeKind::Point, "GlobalIds");
        map
    }

    #[test]
    fn test_dispatch_per_leaf() {
        let cached = CompositeDataSet::with_blocks(vec![
            Some(partition(vec![1, 2], None)),
            None,
            Some(partition(vec![3], None)),
        ]);
        let source = CompositeDataSet::with_blocks(vec![
            Some(partition(vec![2, 1], Some(vec![20.0, 10.0]))),
            None,
            Some(partition(vec![3], Some(vec![30.0]))),
        ]);

        let output = CompositeDispatcher::dispatch(&cached, &source, &point_ids()).unwrap();

        assert_eq!(output.number_of_blocks(), 3);
        assert!(output.block(1).is_none());
        let first = output.leaf(&[0]).unwrap().point_data().array("v").unwrap();
        assert_eq!(first.data(), &ArrayData::Float64(vec![10.0, 20.0]));
        let last = output.leaf(&[2]).unwrap().point_data().array("v").unwrap();
        assert_eq!(last.data(), &ArrayData::Float64(vec![30.0]));
    }

    #[test]
    fn test_leaf_count_mismatch_aborts() {
        let cached = CompositeDataSet::with_blocks(vec![
            Some(partition(vec![1], None)),
            Some(partition(vec![2], None)),
        ]);
        let source = CompositeDataSet::with_blocks(vec![Some(partition(vec![1], Some(vec![1.0])))]);

        let result = CompositeDispatcher::dispatch(&cached, &source, &point_ids());

        assert!(matches!(result, Err(MeshError::StructureMismatch(_))));
    }

    #[test]
    fn test_position_mismatch_aborts() {
        // 葉節點數相同但位置不同
        let cached = CompositeDataSet::with_blocks(vec![Some(partition(vec![1], None)), None]);
        let source = CompositeDataSet::with_blocks(vec![None, Some(partition(vec![1], Some(vec![1.0])))]);

        let result = CompositeDispatcher::dispatch(&cached, &source, &point_ids());

        assert!(matches!(result, Err(MeshError::StructureMismatch(_))));
    }

    #[test]
    fn test_nested_composite() {
        let inner_cached = CompositeDataSet::with_blocks(vec![Some(partition(vec![7, 8], None))]);
        let inner_source =
            CompositeDataSet::with_blocks(vec![Some(partition(vec![8, 7], Some(vec![8.0, 7.0])))]);
        let cached = CompositeDataSet::with_blocks(vec![Some(DataObject::Composite(inner_cached))]);
        let source = CompositeDataSet::with_blocks(vec![Some(DataObject::Composite(inner_source))]);

        let output = CompositeDispatcher::dispatch(&cached, &source, &point_ids()).unwrap();

        let v = output.leaf(&[0, 0]).unwrap().point_data().array("v").unwrap();
        assert_eq!(v.data(), &ArrayData::Float64(vec![7.0, 8.0]));
    }
}
