//! 文档层
//!
//! - `model` - 内存文档模型
//! - `assembler` - 按固定版面组装核对单
//! - `package` - 序列化为 DOCX（OOXML 包）

pub mod assembler;
pub mod model;
pub mod package;

pub use assembler::{column_major_cell, notes_table, DocumentAssembler};
pub use model::{Block, Document, EmbeddedImage, Paragraph, PictureFormat, Table, TableStyle};
pub use package::{to_docx_bytes, DOCX_MIME_TYPE};
