//! 日志工具模块
//!
//! 初始化 tracing 订阅器，并提供日志格式化和输出的辅助函数

use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时为 `info`，`verbose` 为真时为 `debug`。
/// 日志输出到 stderr，stdout 只留给结果行。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `output_dir`: 输出目录
/// - `pdf`: 是否导出 PDF
pub fn log_startup(output_dir: &Path, pdf: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 核对单生成 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("📂 输出目录: {}", output_dir.display());
    info!("📄 导出PDF: {}", if pdf { "是" } else { "否" });
    info!("{}", "=".repeat(60));
}

/// 记录文档摘要
///
/// # 参数
/// - `id`: 核对单 ID
/// - `destination`: 目的地/路线
/// - `total_notes`: 票据数量
pub fn log_document_summary(id: &str, destination: &str, total_notes: usize) {
    info!(
        "📋 核对单 ID: {} | 路线: {} | 票据: {} 张",
        if id.is_empty() { "(未填写)" } else { id },
        truncate_text(destination, 40),
        total_notes
    );
}

/// 记录最终结果
///
/// # 参数
/// - `docx_path`: 生成的 DOCX 路径
/// - `pdf_path`: 生成的 PDF 路径（如有）
pub fn log_finished(docx_path: &Path, pdf_path: Option<&Path>) {
    info!("{}", "─".repeat(60));
    info!("✅ DOCX: {}", docx_path.display());
    if let Some(pdf) = pdf_path {
        info!("✅ PDF: {}", pdf.display());
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
