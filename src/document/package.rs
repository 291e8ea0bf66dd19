//! DOCX 打包
//!
//! 生成最小但完整的 WordprocessingML 包：
//! `[Content_Types].xml`、`_rels/.rels`、`docProps/*`、`word/document.xml`、
//! `word/_rels/document.xml.rels` 以及 `word/media/` 下的图片

use crate::document::model::{
    Block, Cell, Document, Paragraph, Picture, Run, Table, TableStyle, TextRun,
};
use crate::error::DocumentError;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// DOCX 的 MIME 类型
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const APPLICATION_NAME: &str = "checklist_docx";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// 将文档序列化为 DOCX 字节
pub fn to_docx_bytes(doc: &Document) -> Result<Vec<u8>, DocumentError> {
    let mut media = MediaRegistry::default();
    let document_xml = document_xml(doc, &mut media);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    write_part(&mut zip, "[Content_Types].xml", content_types_xml().as_bytes())?;
    write_part(&mut zip, "_rels/.rels", package_rels_xml().as_bytes())?;
    write_part(&mut zip, "docProps/core.xml", core_xml(doc).as_bytes())?;
    write_part(&mut zip, "docProps/app.xml", app_xml().as_bytes())?;
    write_part(&mut zip, "word/document.xml", document_xml.as_bytes())?;
    write_part(
        &mut zip,
        "word/_rels/document.xml.rels",
        media.relationships_xml().as_bytes(),
    )?;
    for entry in &media.entries {
        let part = format!("word/{}", entry.target);
        write_part(&mut zip, &part, &entry.data)?;
    }

    let cursor = zip.finish().map_err(|source| DocumentError::PackageFailed {
        part: "central directory".to_string(),
        source,
    })?;
    Ok(cursor.into_inner())
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    part: &str,
    data: &[u8],
) -> Result<(), DocumentError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(part, options)
        .map_err(|source| DocumentError::PackageFailed {
            part: part.to_string(),
            source,
        })?;
    zip.write_all(data)
        .map_err(|source| DocumentError::PartWriteFailed {
            part: part.to_string(),
            source,
        })
}

/// 转义文字内容，并丢弃 XML 1.0 不允许的字符（例如扫码枪输出的 GS 分隔符 U+001D）
fn xml_text(text: &str) -> String {
    let legal: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    escape(legal.as_str()).into_owned()
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || c >= '\u{10000}'
}

// ========== 图片关系 ==========

struct MediaEntry {
    rel_id: String,
    target: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct MediaRegistry {
    entries: Vec<MediaEntry>,
}

impl MediaRegistry {
    /// 登记图片，返回 (关系 ID, 图片序号)
    fn register(&mut self, picture: &Picture) -> (String, usize) {
        let number = self.entries.len() + 1;
        let rel_id = format!("rIdImage{}", number);
        self.entries.push(MediaEntry {
            rel_id: rel_id.clone(),
            target: format!("media/image{}.{}", number, picture.image.format().extension()),
            data: picture.image.data().to_vec(),
        });
        (rel_id, number)
    }

    fn relationships_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, NS_RELS));
        for entry in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                entry.rel_id, REL_IMAGE, entry.target
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

// ========== 包级部件 ==========

fn content_types_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);
    xml.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn package_rels_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, NS_RELS));
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#);
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
    xml.push_str(r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

fn core_xml(doc: &Document) -> String {
    let created = doc.properties.created.format("%Y-%m-%dT%H:%M:%SZ");
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    xml.push_str(&format!("<dc:title>{}</dc:title>", xml_text(&doc.properties.title)));
    xml.push_str(&format!("<dc:creator>{}</dc:creator>", APPLICATION_NAME));
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        created
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        created
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

fn app_xml() -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application></Properties>"#,
        XML_DECLARATION, APPLICATION_NAME
    )
}

// ========== word/document.xml ==========

fn document_xml(doc: &Document, media: &mut MediaRegistry) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}"><w:body>"#,
        NS_W, NS_R, NS_WP, NS_A, NS_PIC
    ));

    let text_width = doc.page.text_width();
    for block in doc.blocks() {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut xml, p, media),
            Block::Table(t) => write_table(&mut xml, t, text_width, media),
        }
    }

    let page = &doc.page;
    xml.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        page.width,
        page.height,
        page.margin_top,
        page.margin_right,
        page.margin_bottom,
        page.margin_left
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph, media: &mut MediaRegistry) {
    xml.push_str("<w:p><w:pPr>");
    if paragraph.bottom_rule {
        xml.push_str(r#"<w:pBdr><w:bottom w:val="single" w:sz="8" w:space="1" w:color="auto"/></w:pBdr>"#);
    }
    xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, paragraph.alignment.as_ooxml()));
    xml.push_str("</w:pPr>");

    for run in &paragraph.runs {
        match run {
            Run::Text(text) => write_text_run(xml, text),
            Run::Picture(picture) => write_picture_run(xml, picture, media),
        }
    }
    xml.push_str("</w:p>");
}

fn write_text_run(xml: &mut String, run: &TextRun) {
    xml.push_str("<w:r>");
    if run.bold || run.size_half_points.is_some() {
        xml.push_str("<w:rPr>");
        if run.bold {
            xml.push_str("<w:b/>");
        }
        if let Some(size) = run.size_half_points {
            xml.push_str(&format!(r#"<w:sz w:val="{}"/>"#, size));
        }
        xml.push_str("</w:rPr>");
    }

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        if !line.is_empty() {
            xml.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, xml_text(line)));
        }
    }
    xml.push_str("</w:r>");
}

fn write_picture_run(xml: &mut String, picture: &Picture, media: &mut MediaRegistry) {
    let (rel_id, number) = media.register(picture);
    let name = format!("image{}.{}", number, picture.image.format().extension());
    let (cx, cy) = (picture.width_emu, picture.height_emu);

    xml.push_str(&format!(
        concat!(
            r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{id}" name="Picture {id}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="{uri}"><pic:pic>"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#
        ),
        cx = cx,
        cy = cy,
        id = number,
        uri = NS_PIC,
        name = name,
        rel = rel_id,
    ));
}

fn write_table(xml: &mut String, table: &Table, text_width: u32, media: &mut MediaRegistry) {
    let columns = table.column_count().max(1);
    let column_width = text_width / columns as u32;

    xml.push_str(r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/>"#);
    if let Some(border) = table_border(table.style) {
        xml.push_str("<w:tblBorders>");
        for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            xml.push_str(&format!("<w:{}{}/>", side, border));
        }
        xml.push_str("</w:tblBorders>");
    }
    xml.push_str(r#"<w:tblLook w:val="04A0"/></w:tblPr><w:tblGrid>"#);
    for _ in 0..columns {
        xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, column_width));
    }
    xml.push_str("</w:tblGrid>");

    for row in table.rows() {
        xml.push_str("<w:tr>");
        for cell in row {
            write_cell(xml, cell, column_width, media);
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

fn write_cell(xml: &mut String, cell: &Cell, width: u32, media: &mut MediaRegistry) {
    xml.push_str(&format!(r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#, width));
    if cell.paragraphs.is_empty() {
        // 单元格至少需要一个段落
        xml.push_str("<w:p/>");
    }
    for paragraph in &cell.paragraphs {
        write_paragraph(xml, paragraph, media);
    }
    xml.push_str("</w:tc>");
}

/// 边框属性（不含元素名）
fn table_border(style: TableStyle) -> Option<&'static str> {
    match style {
        TableStyle::Plain => None,
        TableStyle::Grid => Some(r#" w:val="single" w:sz="4" w:space="0" w:color="000000""#),
        TableStyle::LightGrid => Some(r#" w:val="single" w:sz="8" w:space="0" w:color="A6A6A6""#),
    }
}
