//! JSON 文档存储
//!
//! 整个系统的持久化状态是单个 JSON 文档：启动时加载（不存在则播种），
//! 每次写操作是全文档的 read-modify-write。写锁内先在工作副本上执行业务
//! 闭包，只有闭包成功才落盘并替换内存文档——前置条件失败不会留下任何
//! 半完成的修改。落盘采用临时文件 + rename，避免写一半的文档损坏数据。

use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// 存储层错误类型
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document io error: {0}")]
    Io(#[from] io::Error),

    #[error("document codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// 单文档 JSON 存储
///
/// 并发模型：读操作共享读锁互不阻塞；所有写操作持有写锁串行执行，
/// 覆盖完整的「检查前置条件 → 修改 → 落盘」序列。
pub struct JsonStore<T> {
    path: PathBuf,
    doc: RwLock<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// 打开存储：文件存在则加载，否则用 seed 闭包播种并立即落盘
    pub fn open(path: impl Into<PathBuf>, seed: impl FnOnce() -> T) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = if path.exists() {
            let raw = fs::read(&path)?;
            serde_json::from_slice(&raw)?
        } else {
            let doc = seed();
            persist(&path, &doc)?;
            doc
        };

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    /// 只读访问文档
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.doc.read())
    }

    /// 原子修改文档
    ///
    /// 闭包在文档的工作副本上执行；返回 Err 时副本被丢弃，
    /// 内存文档与磁盘文件均保持不变。
    pub fn mutate<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.doc.write();
        let mut working = guard.clone();
        let out = f(&mut working)?;
        persist(&self.path, &working).map_err(E::from)?;
        debug!(path = %self.path.display(), "document persisted");
        *guard = working;
        Ok(out)
    }

    /// 文档路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 落盘：写临时文件后 rename 到目标路径
fn persist<T: Serialize>(path: &Path, doc: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(doc)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestDoc {
        counter: i64,
        entries: Vec<String>,
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("bingo-store-{}.json", uuid::Uuid::new_v4()))
    }

    fn seed_doc() -> TestDoc {
        TestDoc {
            counter: 0,
            entries: vec![],
        }
    }

    #[test]
    fn test_open_seeds_missing_file() {
        let path = temp_path();
        let store = JsonStore::open(&path, seed_doc).unwrap();
        assert!(path.exists());
        assert_eq!(store.read(|d| d.counter), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_mutate_persists_and_reloads() {
        let path = temp_path();
        {
            let store = JsonStore::open(&path, seed_doc).unwrap();
            store
                .mutate(|d| {
                    d.counter = 7;
                    d.entries.push("report".to_string());
                    Ok::<_, StoreError>(())
                })
                .unwrap();
        }

        // 重新打开后应读到已持久化的状态
        let store = JsonStore::open(&path, seed_doc).unwrap();
        assert_eq!(store.read(|d| d.counter), 7);
        assert_eq!(store.read(|d| d.entries.clone()), vec!["report".to_string()]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_mutation_leaves_document_untouched() {
        let path = temp_path();
        let store = JsonStore::open(&path, seed_doc).unwrap();
        store
            .mutate(|d| {
                d.counter = 1;
                Ok::<_, StoreError>(())
            })
            .unwrap();

        // 闭包先修改再失败：内存与磁盘都不应观察到部分修改
        let result = store.mutate(|d| {
            d.counter = 999;
            d.entries.push("orphan".to_string());
            Err::<(), _>(StoreError::Io(io::Error::other("precondition failed")))
        });
        assert!(result.is_err());
        assert_eq!(store.read(|d| d.counter), 1);
        assert!(store.read(|d| d.entries.is_empty()));

        let reloaded = JsonStore::open(&path, seed_doc).unwrap();
        assert_eq!(reloaded.read(|d| d.counter), 1);
        let _ = fs::remove_file(&path);
    }
}
