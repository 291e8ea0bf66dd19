//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 把一次提交串成完整流程：收集输入 → 组装文档 → 写入 DOCX → 导出 PDF（可选）。
//! 全部顺序执行，不持有跨次调用的状态。
//!
//! ## 模块划分
//!
//! ### `app` - 命令行流程
//! - 接收 `ChecklistRequest`
//! - 写入 DOCX 失败为致命错误
//! - PDF 失败只体现在 `PdfOutcome` 中
//!
//! ### `form` - 表单提交
//! - 返回可直接下载的 DOCX 字节
//! - 保存到磁盘失败只给出警告
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (app / form)
//!     ↓
//! services (output / pdf)
//!     ↓
//! document (assembler → package)
//!     ↓
//! media + models
//! ```

pub mod app;
pub mod form;

// 重新导出主要类型
pub use app::{export_pdf, App, ChecklistRequest, PdfOutcome, RunReport};
pub use form::{submit_form, submit_form_with, FormOutcome, FormSubmission, SaveOutcome};
