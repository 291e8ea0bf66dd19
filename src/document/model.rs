//! 内存中的文档模型
//!
//! 只覆盖核对单需要的 Word 元素：段落、文字、内嵌图片、表格

use chrono::{DateTime, Utc};

/// 每英寸 EMU（DrawingML 单位）
pub const EMU_PER_INCH: u64 = 914_400;
/// 每英寸 twip（WordprocessingML 页面单位）
pub const TWIPS_PER_INCH: u32 = 1_440;

/// 英寸 -> EMU
pub fn inches_to_emu(inches: f64) -> u64 {
    (inches * EMU_PER_INCH as f64).round() as u64
}

/// 英寸 -> twip
pub fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH as f64).round() as u32
}

/// 磅 -> 半磅（`w:sz` 的单位）
pub fn points_to_half_points(points: u32) -> u32 {
    points * 2
}

/// 段落对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// `w:jc` 的取值
    pub fn as_ooxml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// 内嵌图片格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureFormat {
    Png,
    Jpeg,
}

impl PictureFormat {
    /// 包内文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            PictureFormat::Png => "png",
            PictureFormat::Jpeg => "jpeg",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            PictureFormat::Png => "image/png",
            PictureFormat::Jpeg => "image/jpeg",
        }
    }
}

/// 已解码校验过的图片数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    data: Vec<u8>,
    format: PictureFormat,
    width_px: u32,
    height_px: u32,
}

impl EmbeddedImage {
    pub fn new(data: Vec<u8>, format: PictureFormat, width_px: u32, height_px: u32) -> Self {
        Self {
            data,
            format,
            width_px,
            height_px,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> PictureFormat {
        self.format
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// 按固定宽度等比缩放后的尺寸（EMU）
    pub fn extent_for_width(&self, width_emu: u64) -> (u64, u64) {
        if self.width_px == 0 {
            return (width_emu, width_emu);
        }
        let height_emu = width_emu * u64::from(self.height_px) / u64::from(self.width_px);
        (width_emu, height_emu)
    }
}

/// 放置在文字流中的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub image: EmbeddedImage,
    pub width_emu: u64,
    pub height_emu: u64,
}

impl Picture {
    /// 以固定宽度放置图片
    pub fn with_width(image: EmbeddedImage, width_emu: u64) -> Self {
        let (width_emu, height_emu) = image.extent_for_width(width_emu);
        Self {
            image,
            width_emu,
            height_emu,
        }
    }
}

/// 一段格式相同的文字；`\n` 输出为换行
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    /// 字号（半磅），`None` 表示默认字号
    pub size_half_points: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Text(TextRun),
    Picture(Picture),
}

/// 段落
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    /// 段落下边框（水平分隔线）
    pub bottom_rule: bool,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 普通文字段落
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    /// 加粗文字段落
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new().with_run(TextRun {
            text: text.into(),
            bold: true,
            size_half_points: None,
        })
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        self.with_run(TextRun {
            text,
            ..TextRun::default()
        })
    }

    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(Run::Text(run));
        self
    }

    pub fn with_picture(mut self, picture: Picture) -> Self {
        self.runs.push(Run::Picture(picture));
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_bottom_rule(mut self) -> Self {
        self.bottom_rule = true;
        self
    }

    /// 所有文字拼接后的内容
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|run| match run {
                Run::Text(t) => Some(t.text.as_str()),
                Run::Picture(_) => None,
            })
            .collect()
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.runs.iter().filter_map(|run| match run {
            Run::Picture(p) => Some(p),
            Run::Text(_) => None,
        })
    }

    /// 是否所有文字都加粗（无文字时为 false）
    pub fn is_bold(&self) -> bool {
        let mut texts = self
            .runs
            .iter()
            .filter_map(|run| match run {
                Run::Text(t) => Some(t),
                Run::Picture(_) => None,
            })
            .peekable();
        texts.peek().is_some() && texts.all(|t| t.bold)
    }
}

/// 表格单元格，至少包含一个段落
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
        }
    }
}

impl Cell {
    /// 用单个段落替换单元格内容
    pub fn set_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs = vec![paragraph];
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_paragraph(Paragraph::text(text));
    }

    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.runs.is_empty())
    }
}

/// 表格边框样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// 无边框（页眉布局用）
    Plain,
    /// 全部单线边框
    Grid,
    /// 浅色细线边框（票据列表用）
    LightGrid,
}

/// 固定行列数的表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub style: TableStyle,
    rows: Vec<Vec<Cell>>,
    columns: usize,
}

impl Table {
    pub fn new(rows: usize, columns: usize, style: TableStyle) -> Self {
        Self {
            style,
            rows: vec![vec![Cell::default(); columns]; rows],
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    /// 单元格文字；越界时返回 `None`
    pub fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        self.cell(row, column).map(Cell::plain_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// 页面尺寸与页边距（twip）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
}

impl Default for PageSetup {
    /// Letter 纸张，1 英寸边距
    fn default() -> Self {
        Self {
            width: inches_to_twips(8.5),
            height: inches_to_twips(11.0),
            margin_top: TWIPS_PER_INCH,
            margin_bottom: TWIPS_PER_INCH,
            margin_left: TWIPS_PER_INCH,
            margin_right: TWIPS_PER_INCH,
        }
    }
}

impl PageSetup {
    /// 页边距之间的可用宽度
    pub fn text_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }
}

/// 文档属性（写入 docProps/core.xml）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentProperties {
    pub title: String,
    pub created: DateTime<Utc>,
}

/// 完整文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub page: PageSetup,
    pub properties: DocumentProperties,
    blocks: Vec<Block>,
}

impl Document {
    pub fn new(page: PageSetup, properties: DocumentProperties) -> Self {
        Self {
            page,
            properties,
            blocks: Vec::new(),
        }
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn push_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// 文档中所有图片，按出现顺序
    pub fn pictures(&self) -> Vec<&Picture> {
        let mut pictures = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => pictures.extend(p.pictures()),
                Block::Table(t) => {
                    for cell in t.rows().iter().flatten() {
                        for p in &cell.paragraphs {
                            pictures.extend(p.pictures());
                        }
                    }
                }
            }
        }
        pictures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(inches_to_emu(1.2), 1_097_280);
        assert_eq!(inches_to_emu(0.9), 822_960);
        assert_eq!(inches_to_twips(0.5), 720);
        assert_eq!(inches_to_twips(0.6), 864);
        assert_eq!(points_to_half_points(14), 28);
    }

    #[test]
    fn test_extent_keeps_aspect_ratio() {
        let image = EmbeddedImage::new(vec![], PictureFormat::Png, 400, 200);
        assert_eq!(image.extent_for_width(1_000_000), (1_000_000, 500_000));
    }

    #[test]
    fn test_new_table_cells_are_empty() {
        let table = Table::new(2, 3, TableStyle::Grid);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert!(table.rows().iter().flatten().all(Cell::is_empty));
        assert!(table.cell(2, 0).is_none());
    }

    #[test]
    fn test_paragraph_bold_detection() {
        assert!(Paragraph::bold("ID:").is_bold());
        assert!(!Paragraph::text("123").is_bold());
        assert!(!Paragraph::new().is_bold());
    }

    #[test]
    fn test_empty_text_adds_no_run() {
        assert!(Paragraph::text("").runs.is_empty());
    }
}
