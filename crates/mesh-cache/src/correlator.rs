//! 全域 ID 關聯（gather）

use mesh_core::{AttributeSet, DataArray, IdKey};
use std::collections::HashMap;

/// 依全域 ID 關聯兩組 tuple
///
/// 以來源 ID 建立 ID → tuple 索引的雜湊表，再用快取端的 ID 逐一查詢，
/// 把來源的值收集到與快取相同順序、相同數量的輸出陣列。
/// 來源中重複的 ID 以最後出現者為準。
#[derive(Debug, Clone, Default)]
pub struct IdCorrelator {
    index: HashMap<IdKey, usize>,
}

impl IdCorrelator {
    /// 由來源 ID 陣列建立，O(|來源 tuple|)
    pub fn build(source_ids: &DataArray) -> Self {
        let count = source_ids.tuple_count();
        let mut index = HashMap::with_capacity(count);
        for tuple in 0..count {
            if let Some(key) = source_ids.id_key(tuple) {
                index.insert(key, tuple);
            }
        }
        Self { index }
    }

    /// 查詢 ID 對應的來源 tuple 索引
    pub fn lookup(&self, key: IdKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// 不重複的來源 ID 數量
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 每個快取 tuple 對應的來源 tuple（找不到為 `None`）
    pub fn mapping(&self, cache_ids: &DataArray) -> Vec<Option<usize>> {
        (0..cache_ids.tuple_count())
            .map(|tuple| cache_ids.id_key(tuple).and_then(|key| self.lookup(key)))
            .collect()
    }

    /// 將來源屬性集合中的每個陣列依快取 ID 順序收集到目標集合
    ///
    /// 目標陣列的 tuple 數與 `cache_ids` 相同；找不到的 ID 保持預設值。
    /// 回傳成功對應的 tuple 數。
    pub fn gather(
        &self,
        cache_ids: &DataArray,
        source: &AttributeSet,
        target: &mut AttributeSet,
    ) -> mesh_core::Result<usize> {
        let mapping = self.mapping(cache_ids);
        let matched = mapping.iter().flatten().count();

        for array in source.arrays() {
            target.add_array(Self::gather_array(array, &mapping)?);
        }

        tracing::debug!(
            "ID 關聯完成：{}/{} 筆 tuple 對應成功，{} 個陣列",
            matched,
            mapping.len(),
            source.len()
        );

        Ok(matched)
    }

    /// 依對應表收集單一陣列
    fn gather_array(array: &DataArray, mapping: &[Option<usize>]) -> mesh_core::Result<DataArray> {
        let mut gathered = array.zeroed_like(mapping.len());
        for (dst, src) in mapping.iter().enumerate() {
            if let Some(src) = *src {
                gathered.copy_tuple_from(dst, array, src)?;
            }
        }
        Ok(gathered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_core::{ArrayData, MeshError};
    use proptest::prelude::*;

    #[test]
    fn test_gather_reordered_and_missing() {
        // 快取 [10, 20, 30]，來源 [30, 10, 99]，v = [3, 1, 9]
        let cache_ids = DataArray::from_i64("GlobalIds", vec![10, 20, 30]);
        let mut source = AttributeSet::new();
        source.add_array(DataArray::from_i64("GlobalIds", vec![30, 10, 99]));
        source.add_array(DataArray::from_f64("v", vec![3.0, 1.0, 9.0]));

        let correlator = IdCorrelator::build(source.array("GlobalIds").unwrap());
        let mut target = AttributeSet::new();
        let matched = correlator.gather(&cache_ids, &source, &mut target).unwrap();

        assert_eq!(matched, 2);
        let v = target.array("v").unwrap();
        assert_eq!(v.data(), &ArrayData::Float64(vec![1.0, 0.0, 3.0]));
        // ID 陣列本身也被收集
        let ids = target.array("GlobalIds").unwrap();
        assert_eq!(ids.data(), &ArrayData::Int64(vec![10, 0, 30]));
    }

    #[test]
    fn test_duplicate_source_ids_last_wins() {
        let source_ids = DataArray::from_i64("ids", vec![5, 5, 6]);
        let correlator = IdCorrelator::build(&source_ids);

        assert_eq!(correlator.len(), 2);
        assert_eq!(correlator.lookup(IdKey::Int(5)), Some(1));
        assert_eq!(correlator.lookup(IdKey::Int(7)), None);
    }

    #[test]
    fn test_gather_multi_component() {
        let cache_ids = DataArray::from_i64("ids", vec![2, 1]);
        let mut source = AttributeSet::new();
        source.add_array(DataArray::from_i64("ids", vec![1, 2]));
        source.add_array(
            DataArray::new("Normals", 3, ArrayData::Float64(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]))
                .unwrap(),
        );

        let correlator = IdCorrelator::build(source.array("ids").unwrap());
        let mut target = AttributeSet::new();
        correlator.gather(&cache_ids, &source, &mut target).unwrap();

        let normals = target.array("Normals").unwrap();
        assert_eq!(normals.tuple_f64(0), Some(vec![0.0, 1.0, 0.0]));
        assert_eq!(normals.tuple_f64(1), Some(vec![1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_gather_surfaces_array_errors() {
        // 來源陣列長度短於來源 ID 數量
        let cache_ids = DataArray::from_i64("ids", vec![1]);
        let mut source = AttributeSet::new();
        source.add_array(DataArray::from_i64("ids", vec![0, 1]));
        source.add_array(DataArray::from_f64("short", vec![4.0]));

        let correlator = IdCorrelator::build(source.array("ids").unwrap());
        let mut target = AttributeSet::new();
        let result = correlator.gather(&cache_ids, &source, &mut target);

        assert!(matches!(result, Err(MeshError::TupleOutOfRange { index: 1, count: 1 })));
    }

    proptest! {
        #[test]
        fn prop_gather_matches_by_id(
            ids in proptest::collection::hash_set(0i64..10_000, 1..64),
            keep_every in 1usize..4,
        ) {
            let source_ids: Vec<i64> = ids.into_iter().collect();
            let values: Vec<f64> = source_ids.iter().map(|&id| id as f64 * 0.5).collect();

            // 快取只保留部分 ID，並反轉順序
            let mut cache: Vec<i64> = source_ids.iter().copied().step_by(keep_every).collect();
            cache.reverse();
            cache.push(-1);

            let mut source = AttributeSet::new();
            source.add_array(DataArray::from_i64("ids", source_ids.clone()));
            source.add_array(DataArray::from_f64("v", values));

            let correlator = IdCorrelator::build(source.array("ids").unwrap());
            let mut target = AttributeSet::new();
            let cache_ids = DataArray::from_i64("ids", cache.clone());
            let matched = correlator.gather(&cache_ids, &source, &mut target).unwrap();

            prop_assert_eq!(matched, cache.len() - 1);
            let v = target.array("v").unwrap();
            prop_assert_eq!(v.tuple_count(), cache.len());
            for (i, id) in cache.iter().enumerate() {
                let expected = if *id < 0 { 0.0 } else { *id as f64 * 0.5 };
                prop_assert_eq!(v.tuple_f64(i), Some(vec![expected]));
            }
        }
    }
}
