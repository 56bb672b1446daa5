//! 資料陣列模型

use crate::{MeshError, Result};

/// 陣列儲存內容
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// 64 位元整數（常用於全域 ID）
    Int64(Vec<i64>),
    /// 64 位元浮點數
    Float64(Vec<f64>),
    /// 8 位元無號整數（常用於 ghost 標記）
    UInt8(Vec<u8>),
}

impl ArrayData {
    /// 數值總數（tuple 數 × 分量數）
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Int64(values) => values.len(),
            ArrayData::Float64(values) => values.len(),
            ArrayData::UInt8(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 型別名稱
    pub fn type_name(&self) -> &'static str {
        match self {
            ArrayData::Int64(_) => "i64",
            ArrayData::Float64(_) => "f64",
            ArrayData::UInt8(_) => "u8",
        }
    }

    /// 建立同型別、全為預設值的儲存
    fn zeroed(&self, len: usize) -> Self {
        match self {
            ArrayData::Int64(_) => ArrayData::Int64(vec![0; len]),
            ArrayData::Float64(_) => ArrayData::Float64(vec![0.0; len]),
            ArrayData::UInt8(_) => ArrayData::UInt8(vec![0; len]),
        }
    }
}

/// 用於關聯 tuple 的識別鍵
///
/// 只比較相等性，不假設順序。浮點數以位元模式比較。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKey {
    Int(i64),
    Float(u64),
}

/// 具名資料陣列
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    /// 陣列名稱
    name: String,

    /// 每個 tuple 的分量數
    components: usize,

    /// 扁平化儲存
    data: ArrayData,
}

impl DataArray {
    /// 創建新的資料陣列
    pub fn new(name: impl Into<String>, components: usize, data: ArrayData) -> Result<Self> {
        if components == 0 || data.len() % components != 0 {
            return Err(MeshError::InvalidArrayLength {
                len: data.len(),
                components,
            });
        }
        Ok(Self {
            name: name.into(),
            components,
            data,
        })
    }

    /// 單分量整數陣列
    pub fn from_i64(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            components: 1,
            data: ArrayData::Int64(values),
        }
    }

    /// 單分量浮點陣列
    pub fn from_f64(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            components: 1,
            data: ArrayData::Float64(values),
        }
    }

    /// 單分量 u8 陣列
    pub fn from_u8(name: impl Into<String>, values: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            components: 1,
            data: ArrayData::UInt8(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ArrayData {
        &mut self.data
    }

    /// tuple 數量
    pub fn tuple_count(&self) -> usize {
        self.data.len() / self.components
    }

    /// 建立同名、同型別、同分量數的陣列，所有 tuple 為預設值
    pub fn zeroed_like(&self, tuples: usize) -> Self {
        Self {
            name: self.name.clone(),
            components: self.components,
            data: self.data.zeroed(tuples * self.components),
        }
    }

    /// 取得指定 tuple 的識別鍵（取第一個分量）
    pub fn id_key(&self, tuple: usize) -> Option<IdKey> {
        let index = tuple.checked_mul(self.components)?;
        match &self.data {
            ArrayData::Int64(values) => values.get(index).map(|&v| IdKey::Int(v)),
            ArrayData::UInt8(values) => values.get(index).map(|&v| IdKey::Int(i64::from(v))),
            ArrayData::Float64(values) => values.get(index).map(|v| IdKey::Float(v.to_bits())),
        }
    }

    /// 以 f64 讀取指定 tuple
    pub fn tuple_f64(&self, tuple: usize) -> Option<Vec<f64>> {
        if tuple >= self.tuple_count() {
            return None;
        }
        let range = tuple * self.components..(tuple + 1) * self.components;
        let values = match &self.data {
            ArrayData::Int64(values) => values[range].iter().map(|&v| v as f64).collect(),
            ArrayData::Float64(values) => values[range].to_vec(),
            ArrayData::UInt8(values) => values[range].iter().map(|&v| f64::from(v)).collect(),
        };
        Some(values)
    }

    /// 從另一個陣列複製單一 tuple
    ///
    /// 兩個陣列必須同型別且分量數相同。
    pub fn copy_tuple_from(&mut self, dst: usize, src: &DataArray, src_tuple: usize) -> Result<()> {
        if self.components != src.components {
            return Err(MeshError::ComponentMismatch {
                expected: self.components,
                found: src.components,
            });
        }
        if dst >= self.tuple_count() {
            return Err(MeshError::TupleOutOfRange {
                index: dst,
                count: self.tuple_count(),
            });
        }
        if src_tuple >= src.tuple_count() {
            return Err(MeshError::TupleOutOfRange {
                index: src_tuple,
                count: src.tuple_count(),
            });
        }

        let n = self.components;
        let to = dst * n..(dst + 1) * n;
        let from = src_tuple * n..(src_tuple + 1) * n;
        match (&mut self.data, &src.data) {
            (ArrayData::Int64(d), ArrayData::Int64(s)) => d[to].copy_from_slice(&s[from]),
            (ArrayData::Float64(d), ArrayData::Float64(s)) => d[to].copy_from_slice(&s[from]),
            (ArrayData::UInt8(d), ArrayData::UInt8(s)) => d[to].copy_from_slice(&s[from]),
            (d, s) => {
                return Err(MeshError::ArrayTypeMismatch(format!(
                    "{}: {} <- {}",
                    self.name,
                    d.type_name(),
                    s.type_name()
                )))
            }
        }
        Ok(())
    }
}
