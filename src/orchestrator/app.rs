use crate::config::Config;
use crate::document::DocumentAssembler;
use crate::error::ConverterError;
use crate::models::{base_filename, pdf_sibling, ChecklistRecord};
use crate::services::{OutputService, PdfConverter, SofficeConverter};
use crate::utils::logging::{log_document_summary, log_finished, log_startup};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 一次生成请求
#[derive(Debug, Clone)]
pub struct ChecklistRequest {
    pub record: ChecklistRecord,
    /// logo 文件（可选）
    pub logo: Option<PathBuf>,
    /// 页脚二维码内容（可选）
    pub qr_payload: Option<String>,
    /// 自定义输出文件名（绝对路径或相对输出目录）
    pub file_name: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub export_pdf: bool,
}

/// PDF 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutcome {
    /// 未请求导出
    NotRequested,
    /// 导出成功
    Exported(PathBuf),
    /// 转换程序不可用
    Unavailable { program: String },
    /// 转换失败（DOCX 已保留）
    Failed(String),
}

/// 生成结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub docx_path: PathBuf,
    pub pdf: PdfOutcome,
}

/// 应用主结构
pub struct App<C = SofficeConverter> {
    assembler: DocumentAssembler,
    converter: C,
}

impl App<SofficeConverter> {
    /// 使用配置中的转换程序初始化应用
    pub fn new(config: &Config) -> Self {
        Self::with_converter(config, SofficeConverter::new(config.pdf_converter.clone()))
    }
}

impl<C: PdfConverter> App<C> {
    pub fn with_converter(config: &Config, converter: C) -> Self {
        Self {
            assembler: DocumentAssembler::new(config.title.clone()),
            converter,
        }
    }

    /// 替换文档组装器（例如不使用二维码）
    pub fn with_assembler(mut self, assembler: DocumentAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// 运行：组装 -> 写入 DOCX -> 导出 PDF（可选）
    pub async fn run(&self, request: ChecklistRequest) -> Result<RunReport> {
        log_startup(&request.output_dir, request.export_pdf);

        let record = &request.record;
        log_document_summary(record.id(), record.destination(), record.total_notes());

        let doc = self.assembler.assemble(
            record,
            request.logo.as_deref(),
            request.qr_payload.as_deref(),
        );

        let output = OutputService::new(&request.output_dir);

        let base_name = base_filename(record, Local::now().naive_local());
        let docx_path = output.target_path(request.file_name.as_deref(), &base_name);
        let docx_path = output
            .write(&doc, &docx_path)
            .await
            .with_context(|| format!("无法生成DOCX: {}", docx_path.display()))?;
        info!("✓ DOCX 已生成: {}", docx_path.display());

        let pdf = if request.export_pdf {
            export_pdf(&self.converter, &docx_path).await
        } else {
            PdfOutcome::NotRequested
        };

        let pdf_path = match &pdf {
            PdfOutcome::Exported(path) => Some(path.as_path()),
            _ => None,
        };
        log_finished(&docx_path, pdf_path);

        Ok(RunReport { docx_path, pdf })
    }
}

/// 导出 PDF；所有失败都转换为结果而不是错误
pub async fn export_pdf<C: PdfConverter>(converter: &C, docx_path: &Path) -> PdfOutcome {
    let pdf_path = pdf_sibling(docx_path);

    if !converter.is_available() {
        warn!("⚠️ PDF 转换程序不可用，跳过PDF导出");
        return PdfOutcome::Unavailable {
            program: converter.name().to_string(),
        };
    }

    match converter.convert(docx_path, &pdf_path).await {
        Ok(path) => {
            info!("✓ PDF 已生成: {}", path.display());
            PdfOutcome::Exported(path)
        }
        Err(ConverterError::Unavailable { program }) => {
            warn!("⚠️ PDF 转换程序不可用: {}", program);
            PdfOutcome::Unavailable { program }
        }
        Err(e) => {
            warn!("❌ PDF 导出失败: {}", e);
            PdfOutcome::Failed(e.to_string())
        }
    }
}
