//! # Checklist DOCX
//!
//! 仓库货物移动核对单（Check-list de movimentação）生成器：
//! 收集操作信息和票据编号，生成固定版面的 DOCX 文件，可选导出 PDF
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - `ChecklistRecord` 以及输出文件命名规则
//!
//! ### ② 文档层（Document）
//! - `document/` - 内存文档模型、固定版面组装（`DocumentAssembler`）、OOXML 打包
//! - `media/` - logo 解码、二维码渲染（可降级）
//!
//! ### ③ 能力层（Services）
//! - `OutputService` - 写 DOCX 到磁盘
//! - `SofficeConverter` - 调用外部程序导出 PDF
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 命令行流程
//! - `orchestrator/form` - 表单提交处理
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod media;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use document::{Document, DocumentAssembler};
pub use error::{AppError, AppResult};
pub use models::ChecklistRecord;
pub use orchestrator::{submit_form, App, ChecklistRequest, FormSubmission, PdfOutcome};
pub use utils::logging;
