//! 表单提交处理
//!
//! 表单界面收集字段后调用 [`submit_form`]：
//! 先得到可直接下载的 DOCX 字节，再尝试按标准文件名保存到输出目录（可选导出 PDF）。
//! 保存失败只给出警告，下载内容不受影响。

use crate::config::Config;
use crate::document::{to_docx_bytes, DocumentAssembler, DOCX_MIME_TYPE};
use crate::models::{base_filename, ChecklistRecord};
use crate::orchestrator::app::{export_pdf, PdfOutcome};
use crate::services::{OutputService, PdfConverter};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use tracing::{info, warn};

/// 下载时使用的固定文件名
pub const DOWNLOAD_FILE_NAME: &str = "CHECKLIST_MOVIMENTACAO.docx";

/// 表单字段
#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub id: String,
    pub dock: String,
    /// 为空时使用今天
    pub date: String,
    pub checker_name: String,
    pub shift: String,
    pub driver_name: String,
    pub plate: String,
    pub destination: String,
    /// 多行文本，每行一张票据（扫码枪输入后自动回车）
    pub notes_text: String,
    /// 是否在页眉使用配置中的 logo
    pub include_logo: bool,
    pub output_dir: PathBuf,
    pub export_pdf: bool,
    pub qr_text: String,
}

impl Default for FormSubmission {
    /// 与表单初始状态一致：默认使用 logo，输出到当前目录
    fn default() -> Self {
        Self {
            id: String::new(),
            dock: String::new(),
            date: String::new(),
            checker_name: String::new(),
            shift: String::new(),
            driver_name: String::new(),
            plate: String::new(),
            destination: String::new(),
            notes_text: String::new(),
            include_logo: true,
            output_dir: PathBuf::from("."),
            export_pdf: false,
            qr_text: String::new(),
        }
    }
}

impl FormSubmission {
    /// 转换为核对单记录
    pub fn to_record(&self) -> ChecklistRecord {
        ChecklistRecord::builder()
            .id(self.id.as_str())
            .dock(self.dock.as_str())
            .date(self.date.as_str())
            .checker_name(self.checker_name.as_str())
            .shift(self.shift.as_str())
            .driver_name(self.driver_name.as_str())
            .plate(self.plate.as_str())
            .destination(self.destination.as_str())
            .notes(self.notes_text.lines())
            .build()
    }
}

/// 保存到磁盘的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// 保存失败，附带给用户的警告信息
    Failed(String),
}

/// 表单提交结果
#[derive(Debug, Clone)]
pub struct FormOutcome {
    /// 供立即下载的 DOCX 内容
    pub download: Vec<u8>,
    pub download_name: &'static str,
    pub mime_type: &'static str,
    pub save: SaveOutcome,
    pub pdf: PdfOutcome,
}

/// 处理一次表单提交
///
/// # 参数
/// - `submission`: 表单字段
/// - `config`: 配置（标题、logo 路径）
/// - `converter`: PDF 转换器
///
/// # 返回
/// 只有 DOCX 序列化失败时返回错误
pub async fn submit_form<C: PdfConverter>(
    submission: &FormSubmission,
    config: &Config,
    converter: &C,
) -> Result<FormOutcome> {
    let assembler = DocumentAssembler::new(config.title.clone());
    submit_form_with(submission, config, &assembler, converter).await
}

/// 使用指定的组装器处理表单提交
pub async fn submit_form_with<C: PdfConverter>(
    submission: &FormSubmission,
    config: &Config,
    assembler: &DocumentAssembler,
    converter: &C,
) -> Result<FormOutcome> {
    let record = submission.to_record();
    let logo = submission.include_logo.then(|| config.logo_path.as_path());
    let qr = Some(submission.qr_text.as_str()).filter(|t| !t.is_empty());

    let doc = assembler.assemble(&record, logo, qr);
    let download = to_docx_bytes(&doc).context("无法生成DOCX")?;
    info!("✓ 文档已生成 ({} 字节)", download.len());

    let output = OutputService::new(&submission.output_dir);
    let base_name = base_filename(&record, Local::now().naive_local());
    let docx_path = output.target_path(None, &base_name);

    let (save, pdf) = match output.write_bytes(&download, &docx_path).await {
        Ok(path) => {
            info!("✓ 文件已保存: {}", path.display());
            let pdf = if submission.export_pdf {
                export_pdf(converter, &path).await
            } else {
                PdfOutcome::NotRequested
            };
            (SaveOutcome::Saved(path), pdf)
        }
        Err(e) => {
            warn!("⚠️ 无法自动保存: {}", e);
            (SaveOutcome::Failed(e.to_string()), PdfOutcome::NotRequested)
        }
    };

    Ok(FormOutcome {
        download,
        download_name: DOWNLOAD_FILE_NAME,
        mime_type: DOCX_MIME_TYPE,
        save,
        pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_text_is_split_by_line() {
        let submission = FormSubmission {
            id: "42".to_string(),
            destination: "Rota 3".to_string(),
            notes_text: "NFe1\r\n\r\n  NFe2  \nNFe3\n".to_string(),
            ..FormSubmission::default()
        };

        let record = submission.to_record();
        assert_eq!(record.notes(), ["NFe1", "NFe2", "NFe3"]);
        assert_eq!(record.id(), "42");
        assert!(!record.date().is_empty());
    }

    #[test]
    fn test_logo_is_on_by_default() {
        let submission = FormSubmission::default();

        assert!(submission.include_logo);
        assert!(!submission.export_pdf);
        assert_eq!(submission.output_dir, PathBuf::from("."));
    }
}
