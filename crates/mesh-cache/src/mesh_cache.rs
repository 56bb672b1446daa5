//! 網格快取狀態機

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mesh_core::{
    AttributeKind, CacheConfig, CompositeDataSet, Consumer, DataObject, DataObjectRef, DataSet,
    MeshError, MeshStamp,
};

use crate::dispatcher::CompositeDispatcher;
use crate::forwarder::AttributeForwarder;
use crate::id_fields::IdFieldMap;
use crate::status::Status;

/// 網格快取
///
/// 保存上一次正確結果的幾何，當來源只有屬性改變時，
/// 以快取幾何加上來源的最新屬性產生輸出，跳過幾何重算。
///
/// 典型流程：設置來源與下游階段 → [`capture`](Self::capture) →
/// 每次執行前檢查 [`status`](Self::status)`.enabled()`，成立時呼叫
/// [`materialize`](Self::materialize)，否則重新計算後再次 capture。
///
/// 來源與下游階段只以弱引用持有；單執行緒使用，不做內部同步。
#[derive(Debug, Default)]
pub struct MeshCache {
    /// 來源資料物件
    source: Option<Weak<RefCell<DataObject>>>,

    /// 下游階段
    consumer: Option<Weak<dyn Consumer>>,

    /// 快取的幾何（含 ID 陣列）
    cache: Option<DataObject>,

    /// 各屬性類別的 ID 欄位
    id_fields: IdFieldMap,

    /// capture 時的來源幾何時間快照
    cached_source_mesh: Option<MeshStamp>,

    /// capture 時的下游階段時間
    cached_consumer_time: u64,
}

impl MeshCache {
    /// 「從未記錄」的哨兵時間戳
    pub const NEVER_CAPTURED: u64 = 0;

    /// 創建空的網格快取
    pub fn new() -> Self {
        Self::default()
    }

    /// 依配置建立
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            id_fields: IdFieldMap::from(config),
            ..Self::default()
        }
    }

    /// 設置來源資料物件
    ///
    /// `None` 表示解除連接。不支援或正在被修改的來源會清除既有來源並回傳錯誤。
    /// 不會影響快取內容。
    pub fn set_source(&mut self, source: Option<&DataObjectRef>) -> mesh_core::Result<()> {
        let Some(source) = source else {
            tracing::debug!("解除來源資料物件");
            self.source = None;
            return Ok(());
        };

        let supported = match source.try_borrow() {
            Ok(object) if object.is_supported() => Ok(()),
            Ok(object) => Err(MeshError::UnsupportedDataObject(object.type_name().to_string())),
            Err(_) => Err(MeshError::SourceBusy),
        };

        match supported {
            Ok(()) => {
                self.source = Some(Rc::downgrade(source));
                Ok(())
            }
            Err(err) => {
                tracing::warn!("無法設置來源：{}", err);
                self.source = None;
                Err(err)
            }
        }
    }

    /// 取得來源（若仍存在）
    pub fn source(&self) -> Option<DataObjectRef> {
        self.source.as_ref()?.upgrade()
    }

    /// 設置下游階段，`None` 表示解除連接
    pub fn set_consumer(&mut self, consumer: Option<Rc<dyn Consumer>>) {
        self.consumer = consumer.as_ref().map(Rc::downgrade);
    }

    /// 取得下游階段（若仍存在）
    pub fn consumer(&self) -> Option<Rc<dyn Consumer>> {
        self.consumer.as_ref()?.upgrade()
    }

    /// 設置某屬性類別的 ID 欄位
    pub fn add_id_field(&mut self, kind: AttributeKind, name: impl Into<String>) {
        self.id_fields.insert(kind, name);
    }

    /// 移除某屬性類別的 ID 欄位
    pub fn remove_id_field(&mut self, kind: AttributeKind) -> Option<String> {
        self.id_fields.remove(kind)
    }

    /// 清除所有 ID 欄位
    pub fn clear_id_fields(&mut self) {
        self.id_fields.clear();
    }

    pub fn id_fields(&self) -> &IdFieldMap {
        &self.id_fields
    }

    /// 目前的快取內容
    pub fn cache(&self) -> Option<&DataObject> {
        self.cache.as_ref()
    }

    /// capture 時記錄的最新來源幾何時間
    pub fn cached_source_mesh_time(&self) -> u64 {
        self.cached_source_mesh
            .as_ref()
            .map_or(Self::NEVER_CAPTURED, MeshStamp::latest)
    }

    pub fn cached_source_mesh(&self) -> Option<&MeshStamp> {
        self.cached_source_mesh.as_ref()
    }

    pub fn cached_consumer_time(&self) -> u64 {
        self.cached_consumer_time
    }

    /// 以剛產生的正確結果更新快取
    ///
    /// 只保留幾何與已設置的 ID 陣列，並記錄來源幾何時間與下游階段時間。
    /// 不支援的類型不會改變任何狀態。
    pub fn capture(&mut self, fresh: &DataObject) -> mesh_core::Result<()> {
        if !fresh.is_supported() {
            let err = MeshError::UnsupportedDataObject(fresh.type_name().to_string());
            tracing::warn!("無法更新快取：{}", err);
            return Err(err);
        }

        let source_mesh = self.source_mesh_stamp();
        let consumer_time = self.consumer().map(|c| c.mtime());
        if source_mesh.is_none() {
            tracing::warn!("capture 時來源不存在或正在被修改，快取在重新 capture 前不可用");
        }
        if consumer_time.is_none() {
            tracing::warn!("capture 時下游階段不存在，快取在重新 capture 前不可用");
        }

        let cache = Self::mesh_copy(fresh, &self.id_fields);
        let leaves = match &cache {
            DataObject::Composite(composite) => composite.non_empty_leaf_count(),
            _ => 1,
        };
        self.cache = Some(cache);
        self.cached_source_mesh = source_mesh;
        self.cached_consumer_time = consumer_time.unwrap_or(Self::NEVER_CAPTURED);

        tracing::info!(
            "快取已更新：{} 個葉節點，來源幾何時間 {}，下游階段時間 {}",
            leaves,
            self.cached_source_mesh_time(),
            self.cached_consumer_time
        );
        Ok(())
    }

    /// 清空快取並重置時間戳
    pub fn invalidate(&mut self) {
        self.cache = None;
        self.cached_source_mesh = None;
        self.cached_consumer_time = Self::NEVER_CAPTURED;
        tracing::info!("快取已失效");
    }

    /// 計算目前狀態
    ///
    /// 來源正在被可變借用時視為未設置。來源幾何以快照比較：
    /// 任何葉節點或區塊結構的時間戳與 capture 時不同即視為已變更。
    pub fn status(&self) -> Status {
        let source_mesh = self.source_mesh_stamp();
        let consumer_time = self.consumer().map(|c| c.mtime());
        let cache_defined = self.cache.is_some();

        let status = Status {
            source_defined: source_mesh.is_some(),
            consumer_defined: consumer_time.is_some(),
            cache_defined,
            source_mesh_unchanged: cache_defined
                && source_mesh.is_some()
                && source_mesh == self.cached_source_mesh,
            consumer_unchanged: cache_defined && consumer_time == Some(self.cached_consumer_time),
            id_fields_satisfied: self.id_fields_satisfied(),
        };

        if !status.enabled() {
            tracing::debug!("快取不可用：{:?}", status.failing_checks());
        }
        status
    }

    /// 以快取幾何加上來源的最新屬性產生輸出
    ///
    /// 不檢查狀態：呼叫前應確認 `status().enabled()`，否則輸出的是過期幾何。
    /// - 沒有快取：輸出為空資料集
    /// - 來源已不存在：只輸出快取幾何
    /// - 快取與來源結構不一致：回傳錯誤，輸出不變
    pub fn materialize(&self, output: &mut DataObject) -> mesh_core::Result<()> {
        let Some(cache) = &self.cache else {
            tracing::debug!("沒有快取，輸出空資料集");
            *output = DataObject::DataSet(DataSet::new());
            return Ok(());
        };

        let source = self.source();
        let live = source
            .as_ref()
            .map(|s| s.try_borrow())
            .transpose()
            .map_err(|_| MeshError::SourceBusy)?;

        let result = match (cache, live.as_deref()) {
            (DataObject::DataSet(cached), Some(DataObject::DataSet(live))) => {
                AttributeForwarder::forward(cached, live, &self.id_fields).map(DataObject::DataSet)
            }
            (DataObject::Composite(cached), Some(DataObject::Composite(live))) => {
                CompositeDispatcher::dispatch(cached, live, &self.id_fields)
                    .map(DataObject::Composite)
            }
            (cached, None) => {
                tracing::warn!("來源已不存在，只輸出快取幾何");
                Ok(Self::mesh_copy(cached, &IdFieldMap::new()))
            }
            (cached, Some(live)) => Err(MeshError::StructureMismatch(format!(
                "快取為 {}，來源為 {}",
                cached.type_name(),
                live.type_name()
            ))),
        };

        match result {
            Ok(materialized) => {
                *output = materialized;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("無法輸出快取：{}", err);
                Err(err)
            }
        }
    }

    /// 來源幾何時間快照；來源不存在、被借用或不支援時為 `None`
    fn source_mesh_stamp(&self) -> Option<MeshStamp> {
        let source = self.source()?;
        let object = source.try_borrow().ok()?;
        if object.is_supported() {
            Some(object.mesh_stamp())
        } else {
            None
        }
    }

    fn id_fields_satisfied(&self) -> bool {
        if self.id_fields.is_empty() {
            return true;
        }
        let id_fields = &self.id_fields;
        let mut has_ids = |ds: &DataSet| {
            id_fields
                .iter()
                .all(|(kind, name)| ds.attributes(kind).has_array(name))
        };
        match &self.cache {
            Some(DataObject::DataSet(ds)) => has_ids(ds),
            Some(DataObject::Composite(composite)) => composite.all_leaves(&mut has_ids),
            Some(DataObject::Unsupported(_)) | None => false,
        }
    }

    /// 複製幾何，只保留指定的 ID 陣列
    fn mesh_copy(object: &DataObject, id_fields: &IdFieldMap) -> DataObject {
        match object {
            DataObject::DataSet(ds) => DataObject::DataSet(Self::mesh_copy_leaf(ds, id_fields)),
            DataObject::Composite(composite) => {
                let mut copy: CompositeDataSet = composite.clone();
                for (path, original) in composite.leaves() {
                    if let Some(leaf) = copy.leaf_mut(&path) {
                        *leaf = Self::mesh_copy_leaf(original, id_fields);
                    }
                }
                DataObject::Composite(copy)
            }
            DataObject::Unsupported(data) => DataObject::Unsupported(data.clone()),
        }
    }

    fn mesh_copy_leaf(ds: &DataSet, id_fields: &IdFieldMap) -> DataSet {
        let mut copy = ds.copy_structure();
        for (kind, name) in id_fields.iter() {
            if let Some(ids) = ds.attributes(kind).array(name) {
                copy.attributes_mut(kind).add_array(ids.clone());
            }
        }
        copy
    }
}
