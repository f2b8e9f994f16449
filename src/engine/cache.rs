// ==========================================
// 教室占用控制 - 展开结果缓存
// ==========================================
// 职责: 按源文件指纹缓存展开结果,避免每次交互重读表格
// 失效: 路径 / 大小 / 修改时间 任一变化,或显式 invalidate
// 红线: 加载失败不写入缓存
// ==========================================

use crate::domain::Expansion;
use crate::importer::{ImportError, ImportResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

/// 源文件指纹
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    /// 读取文件元数据生成指纹
    pub fn of(path: &Path) -> ImportResult<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| ImportError::FileNotFound(path.display().to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

struct CacheEntry {
    fingerprint: SourceFingerprint,
    expansion: Arc<Expansion>,
}

// ==========================================
// ExpansionCache - 展开结果缓存
// ==========================================
#[derive(Default)]
pub struct ExpansionCache {
    entry: Mutex<Option<CacheEntry>>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ImportResult<MutexGuard<'_, Option<CacheEntry>>> {
        self.entry
            .lock()
            .map_err(|e| ImportError::InternalError(format!("缓存锁获取失败: {}", e)))
    }

    /// 命中则返回缓存,否则调用 loader 并写入
    ///
    /// 持锁期间执行加载,并发请求只触发一次读取
    pub fn get_or_load<F>(&self, path: &Path, loader: F) -> ImportResult<Arc<Expansion>>
    where
        F: FnOnce(&Path) -> ImportResult<Expansion>,
    {
        let fingerprint = SourceFingerprint::of(path)?;
        let mut guard = self.lock()?;

        if let Some(entry) = guard.as_ref() {
            if entry.fingerprint == fingerprint {
                tracing::debug!("展开缓存命中: {}", path.display());
                return Ok(Arc::clone(&entry.expansion));
            }
            tracing::info!("源文件已变化,缓存失效: {}", path.display());
        }

        tracing::debug!("展开缓存未命中,开始加载: {}", path.display());
        let expansion = Arc::new(loader(path)?);
        *guard = Some(CacheEntry {
            fingerprint,
            expansion: Arc::clone(&expansion),
        });
        Ok(expansion)
    }

    /// 清空缓存（下一次访问强制重读）
    pub fn invalidate(&self) -> ImportResult<()> {
        let mut guard = self.lock()?;
        if guard.take().is_some() {
            tracing::info!("展开缓存已清空");
        }
        Ok(())
    }

    /// 指定路径当前是否命中
    pub fn is_cached(&self, path: &Path) -> bool {
        let Ok(fingerprint) = SourceFingerprint::of(path) else {
            return false;
        };
        match self.lock() {
            Ok(guard) => guard
                .as_ref()
                .map_or(false, |entry| entry.fingerprint == fingerprint),
            Err(_) => false,
        }
    }
}
