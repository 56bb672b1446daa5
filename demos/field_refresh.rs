//! 網格快取示例：只有屬性變更時重用幾何

use meshcache::{
    AttributeKind, CompositeDataSet, DataArray, DataObject, DataSet, MeshCache, StageClock,
};
use std::rc::Rc;

/// 模擬「昂貴」的幾何計算：產生一個帶全域 ID 的三角形網格分區
fn build_partition(first_id: i64, temperature: f64) -> anyhow::Result<DataSet> {
    let mut ds = DataSet::from_geometry(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        vec![vec![0, 1, 2], vec![1, 3, 2]],
    )?;
    ds.attributes_mut(AttributeKind::Point).add_array(DataArray::from_i64(
        "GlobalIds",
        (first_id..first_id + 4).collect(),
    ));
    ds.attributes_mut(AttributeKind::Point)
        .add_array(DataArray::from_f64("Temperature", vec![temperature; 4]));
    Ok(ds)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 網格快取示例 ===\n");

    let source = DataObject::from(CompositeDataSet::with_blocks(vec![
        Some(build_partition(0, 20.0)?.into()),
        None,
        Some(build_partition(100, 25.0)?.into()),
    ]))
    .shared();
    let stage = Rc::new(StageClock::new("iso-surface"));

    let mut cache = MeshCache::new();
    cache.add_id_field(AttributeKind::Point, "GlobalIds");
    cache.set_source(Some(&source))?;
    cache.set_consumer(Some(stage.clone()));

    // 第一次執行：完整計算後 capture
    let fresh = source.borrow().clone();
    cache.capture(&fresh)?;
    println!("capture 後狀態:\n{}", cache.status());

    // 只更新溫度，幾何不變
    source
        .borrow_mut()
        .as_composite_mut()
        .and_then(|c| c.leaf_mut(&[2]))
        .ok_or_else(|| anyhow::anyhow!("找不到分區 2"))?
        .attributes_mut(AttributeKind::Point)
        .add_array(DataArray::from_f64("Temperature", vec![30.0, 31.0, 32.0, 33.0]));

    let status = cache.status();
    println!("屬性變更後狀態:\n{}", status);

    if status.enabled() {
        let mut output = DataObject::default();
        cache.materialize(&mut output)?;

        if let Some(composite) = output.as_composite() {
            for (path, leaf) in composite.leaves() {
                let temperature = leaf
                    .point_data()
                    .array("Temperature")
                    .and_then(|a| a.tuple_f64(0));
                println!(
                    "  - 分區 {:?}: {} 個點, 溫度[0] = {:?}",
                    path,
                    leaf.number_of_points(),
                    temperature
                );
            }
        }
    }

    // 下游階段設定變更：快取不可用，需要重新計算
    stage.modified();
    println!("\n下游階段變更後可用: {}", cache.status().enabled());

    Ok(())
}
