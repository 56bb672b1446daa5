//! 修改時間（modification time）時鐘

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL_MTIME: AtomicU64 = AtomicU64::new(0);

/// 取得下一個修改時間戳
///
/// 全程序單調遞增，第一個值為 1，因此 0 可以作為「從未記錄」的哨兵值。
pub fn next_mtime() -> u64 {
    GLOBAL_MTIME.fetch_add(1, Ordering::Relaxed) + 1
}

/// 使用快取的下游階段
///
/// 只需要暴露最後一次設定變更的時間戳。
pub trait Consumer {
    /// 最後修改時間（單調不減）
    fn mtime(&self) -> u64;
}

/// 簡單的階段時鐘，實作 [`Consumer`]
#[derive(Debug)]
pub struct StageClock {
    /// 階段名稱
    name: String,
    mtime: Cell<u64>,
}

impl StageClock {
    /// 創建新的階段時鐘
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mtime: Cell::new(next_mtime()),
        }
    }

    /// 階段名稱
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 標記階段設定已變更
    pub fn modified(&self) {
        self.mtime.set(next_mtime());
    }
}

impl Consumer for StageClock {
    fn mtime(&self) -> u64 {
        self.mtime.get()
    }
}
