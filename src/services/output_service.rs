//! 输出服务 - 业务能力层
//!
//! 只负责"把 DOCX 写到磁盘"，不关心文档内容

use crate::document::{to_docx_bytes, Document};
use crate::error::{AppError, AppResult};
use crate::models::resolve_output_path;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// DOCX 输出服务
pub struct OutputService {
    output_dir: PathBuf,
}

impl OutputService {
    /// 创建新的输出服务
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 计算输出路径
    ///
    /// # 参数
    /// - `file_name`: 自定义文件名（绝对路径或相对输出目录）
    /// - `base_name`: 自动生成的文件名（不含扩展名）
    pub fn target_path(&self, file_name: Option<&Path>, base_name: &str) -> PathBuf {
        resolve_output_path(&self.output_dir, file_name, base_name)
    }

    /// 递归创建输出目录
    pub async fn prepare(&self) -> AppResult<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::create_dir_failed(&self.output_dir, e))
    }

    /// 序列化文档并写入指定路径
    ///
    /// # 返回
    /// 返回写入的路径
    pub async fn write(&self, doc: &Document, path: &Path) -> AppResult<PathBuf> {
        let bytes = to_docx_bytes(doc)?;
        self.write_bytes(&bytes, path).await
    }

    /// 写入已序列化的 DOCX 数据
    pub async fn write_bytes(&self, bytes: &[u8], path: &Path) -> AppResult<PathBuf> {
        self.prepare().await?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::create_dir_failed(parent, e))?;
        }

        debug!("写入 {} 字节到 {}", bytes.len(), path.display());
        fs::write(path, bytes)
            .await
            .map_err(|e| AppError::write_failed(path, e))?;

        Ok(path.to_path_buf())
    }
}
