//! 核对单文档组装
//!
//! 版面固定：页眉 -> 基本信息表 -> 票据列表 -> 合计 -> 签名 -> 页脚 -> 二维码（可选）。
//! 所有可选输入（logo、二维码）失败时只降级，不返回错误。

use crate::config::DEFAULT_TITLE;
use crate::document::model::{
    inches_to_emu, inches_to_twips, points_to_half_points, Alignment, Document,
    DocumentProperties, PageSetup, Paragraph, Picture, Table, TableStyle, TextRun,
};
use crate::media::{self, QrRenderer};
use crate::models::ChecklistRecord;
use crate::utils::logging::truncate_text;
use chrono::Utc;
use std::path::Path;
use tracing::{debug, warn};

/// logo 宽度（英寸）
const LOGO_WIDTH_INCHES: f64 = 1.2;
/// 二维码宽度（英寸）
const QR_WIDTH_INCHES: f64 = 0.9;
const TITLE_SIZE_PT: u32 = 14;
const FOOTER_SIZE_PT: u32 = 8;

/// 票据列表的列数
pub const NOTE_COLUMNS: usize = 2;

pub const NOTES_HEADING: &str = "Notas Fiscais / Chaves (bipar ou digitar):";
pub const NO_NOTES_PLACEHOLDER: &str = "—";
pub const TOTAL_RECEIVED_LABEL: &str = "Total de Notas Recebidas:";
pub const TOTAL_DISPATCHED_LABEL: &str = "Total de Notas Expedidas:";
pub const DISCREPANCIES_LABEL: &str = "Divergencias:";
pub const CHECKER_SIGNATURE_LABEL: &str = "\n\nAssinatura Conferente:";
pub const DRIVER_SIGNATURE_LABEL: &str = "\n\nAssinatura Motorista:";
pub const LEGIBLE_NAME_LABEL: &str = "Nome legivel:";
pub const FOOTER_TEXT: &str =
    "Documento gerado automaticamente para controle interno de movimentacao.";

/// 文档组装器
pub struct DocumentAssembler {
    title: String,
    qr_renderer: Option<Box<dyn QrRenderer>>,
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl DocumentAssembler {
    /// 使用当前构建可用的二维码渲染器
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            qr_renderer: media::default_renderer(),
        }
    }

    /// 替换二维码渲染器
    pub fn with_qr_renderer(mut self, renderer: impl QrRenderer + 'static) -> Self {
        self.qr_renderer = Some(Box::new(renderer));
        self
    }

    /// 不使用二维码渲染器
    pub fn without_qr(mut self) -> Self {
        self.qr_renderer = None;
        self
    }

    /// 组装核对单文档
    ///
    /// # 参数
    /// - `record`: 核对单记录
    /// - `logo_path`: logo 文件路径，不存在或无法解码时改用无 logo 页眉
    /// - `qr_payload`: 页脚二维码内容，为空时不生成
    pub fn assemble(
        &self,
        record: &ChecklistRecord,
        logo_path: Option<&Path>,
        qr_payload: Option<&str>,
    ) -> Document {
        let mut doc = Document::new(
            checklist_page(),
            DocumentProperties {
                title: self.title.clone(),
                created: Utc::now(),
            },
        );

        self.add_header(&mut doc, logo_path);
        doc.push_table(metadata_table(record));

        doc.push_paragraph(Paragraph::new());
        doc.push_paragraph(Paragraph::bold(NOTES_HEADING));
        match notes_table(record.notes()) {
            Some(table) => doc.push_table(table),
            None => doc.push_paragraph(Paragraph::text(NO_NOTES_PLACEHOLDER)),
        }

        doc.push_paragraph(Paragraph::new());
        doc.push_table(totals_table(record.total_notes()));

        doc.push_paragraph(Paragraph::new());
        doc.push_table(signature_table());

        doc.push_paragraph(Paragraph::new());
        doc.push_paragraph(
            Paragraph::new()
                .with_run(TextRun {
                    text: FOOTER_TEXT.to_string(),
                    bold: false,
                    size_half_points: Some(points_to_half_points(FOOTER_SIZE_PT)),
                })
                .aligned(Alignment::Center),
        );

        if let Some(payload) = qr_payload {
            self.add_qr_footer(&mut doc, payload);
        }

        debug!(
            "文档组装完成: {} 个块, {} 张票据",
            doc.blocks().len(),
            record.total_notes()
        );
        doc
    }

    fn add_header(&self, doc: &mut Document, logo_path: Option<&Path>) {
        let logo = match logo_path {
            Some(path) => match media::load_logo(path) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("⚠️ logo 无法使用，改用无 logo 页眉: {}", e);
                    None
                }
            },
            None => None,
        };

        match logo {
            Some(image) => {
                let mut header = Table::new(1, 2, TableStyle::Plain);
                let logo = Picture::with_width(image, inches_to_emu(LOGO_WIDTH_INCHES));
                if let Some(cell) = header.cell_mut(0, 0) {
                    cell.set_paragraph(Paragraph::new().with_picture(logo));
                }
                if let Some(cell) = header.cell_mut(0, 1) {
                    cell.set_paragraph(self.title_paragraph(Alignment::Right));
                }
                doc.push_table(header);
            }
            None => {
                doc.push_paragraph(self.title_paragraph(Alignment::Center));
                doc.push_paragraph(
                    Paragraph::new()
                        .aligned(Alignment::Center)
                        .with_bottom_rule(),
                );
            }
        }
    }

    fn title_paragraph(&self, alignment: Alignment) -> Paragraph {
        Paragraph::new()
            .with_run(TextRun {
                text: self.title.clone(),
                bold: true,
                size_half_points: Some(points_to_half_points(TITLE_SIZE_PT)),
            })
            .aligned(alignment)
    }

    fn add_qr_footer(&self, doc: &mut Document, payload: &str) {
        if payload.is_empty() {
            return;
        }
        let Some(renderer) = &self.qr_renderer else {
            warn!("⚠️ 二维码渲染器不可用，跳过二维码");
            return;
        };

        match renderer.render_png(payload) {
            Ok(image) => {
                doc.push_paragraph(
                    Paragraph::new()
                        .with_picture(Picture::with_width(image, inches_to_emu(QR_WIDTH_INCHES)))
                        .aligned(Alignment::Right),
                );
            }
            Err(e) => {
                warn!(
                    "⚠️ 二维码生成失败 ({}): {}",
                    truncate_text(payload, 40),
                    e
                );
            }
        }
    }
}

/// 页面：Letter，上下 0.5 英寸，左右 0.6 英寸
fn checklist_page() -> PageSetup {
    PageSetup {
        margin_top: inches_to_twips(0.5),
        margin_bottom: inches_to_twips(0.5),
        margin_left: inches_to_twips(0.6),
        margin_right: inches_to_twips(0.6),
        ..PageSetup::default()
    }
}

/// 基本信息表：4 行 4 列，每行两组“标签 / 值”
fn metadata_table(record: &ChecklistRecord) -> Table {
    let rows: [[(&str, &str); 2]; 4] = [
        [("ID:", record.id()), ("Data:", record.date())],
        [("Doca:", record.dock()), ("Turno:", record.shift())],
        [
            ("Conferente:", record.checker_name()),
            ("Motorista:", record.driver_name()),
        ],
        [
            ("Placa:", record.plate()),
            ("Destino/Rota:", record.destination()),
        ],
    ];

    let mut table = Table::new(4, 4, TableStyle::Grid);
    for (r, pairs) in rows.iter().enumerate() {
        for (i, (label, value)) in pairs.iter().enumerate() {
            if let Some(cell) = table.cell_mut(r, i * 2) {
                cell.set_paragraph(Paragraph::bold(*label));
            }
            if let Some(cell) = table.cell_mut(r, i * 2 + 1) {
                cell.set_text(*value);
            }
        }
    }
    table
}

/// 第 `index` 张票据所在的单元格 `(行, 列)`，按列优先排布
pub fn column_major_cell(index: usize, rows: usize) -> (usize, usize) {
    (index % rows, index / rows)
}

/// 票据列表表格；没有票据时返回 `None`
pub fn notes_table(notes: &[String]) -> Option<Table> {
    if notes.is_empty() {
        return None;
    }

    let rows = notes.len().div_ceil(NOTE_COLUMNS);
    let mut table = Table::new(rows, NOTE_COLUMNS, TableStyle::LightGrid);
    for (index, note) in notes.iter().enumerate() {
        let (r, c) = column_major_cell(index, rows);
        if let Some(cell) = table.cell_mut(r, c) {
            cell.set_text(note.as_str());
        }
    }
    Some(table)
}

/// 合计表：收到数量自动填写，其余留空手填
fn totals_table(total_notes: usize) -> Table {
    let mut table = Table::new(3, 2, TableStyle::Grid);
    let rows = [
        (TOTAL_RECEIVED_LABEL, total_notes.to_string()),
        (TOTAL_DISPATCHED_LABEL, String::new()),
        (DISCREPANCIES_LABEL, String::new()),
    ];
    for (r, (label, value)) in rows.into_iter().enumerate() {
        if let Some(cell) = table.cell_mut(r, 0) {
            cell.set_text(label);
        }
        if let Some(cell) = table.cell_mut(r, 1) {
            cell.set_text(value);
        }
    }
    table
}

fn signature_table() -> Table {
    let mut table = Table::new(2, 2, TableStyle::Grid);
    let cells = [
        (0, 0, CHECKER_SIGNATURE_LABEL),
        (0, 1, DRIVER_SIGNATURE_LABEL),
        (1, 0, LEGIBLE_NAME_LABEL),
        (1, 1, LEGIBLE_NAME_LABEL),
    ];
    for (r, c, text) in cells {
        if let Some(cell) = table.cell_mut(r, c) {
            cell.set_text(text);
        }
    }
    table
}
