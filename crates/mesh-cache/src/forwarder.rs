//! 單一資料集的屬性轉送

use mesh_core::DataSet;

use crate::correlator::IdCorrelator;
use crate::id_fields::IdFieldMap;

/// 屬性轉送器
pub struct AttributeForwarder;

impl AttributeForwarder {
    /// 以快取幾何加上來源的最新屬性建立輸出
    ///
    /// 步驟：
    /// 1. 輸出 = 快取的幾何（不含任何屬性）
    /// 2. 整體欄位資料一律從來源複製
    /// 3. 每個設置了 ID 欄位的屬性類別，依 ID 從來源收集所有陣列
    ///
    /// 快取或來源缺少 ID 陣列的類別會被略過，輸出中該類別為空。
    pub fn forward(
        cached: &DataSet,
        source: &DataSet,
        id_fields: &IdFieldMap,
    ) -> mesh_core::Result<DataSet> {
        let mut output = cached.copy_structure();
        output.set_field_data(source.field_data().clone());

        for (kind, field) in id_fields.iter() {
            let Some(cache_ids) = cached.attributes(kind).array(field) else {
                tracing::debug!("快取缺少 {} ID 陣列 {}，跳過", kind, field);
                continue;
            };
            let Some(source_ids) = source.attributes(kind).array(field) else {
                tracing::debug!("來源缺少 {} ID 陣列 {}，跳過", kind, field);
                continue;
            };

            let correlator = IdCorrelator::build(source_ids);
            let matched = correlator.gather(
                cache_ids,
                source.attributes(kind),
                output.attributes_mut(kind),
            )?;

            tracing::debug!(
                "轉送 {} 屬性：{}/{} 筆 tuple",
                kind,
                matched,
                cache_ids.tuple_count()
            );
        }

        Ok(output)
    }
}
