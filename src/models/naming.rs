//! 输出文件命名
//!
//! `CHECKLIST_{日期}_{路线}_{ID}`，日期取生成当天而不是记录中的日期字段

use crate::models::ChecklistRecord;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// 文件名前缀
pub const FILENAME_PREFIX: &str = "CHECKLIST";

/// 路线部分的最大字符数
pub const DESTINATION_SLUG_MAX_CHARS: usize = 40;

/// 路线 slug：去首尾空白，空格替换为下划线，截断到 40 个字符
pub fn destination_slug(destination: &str) -> String {
    destination
        .trim()
        .replace(' ', "_")
        .chars()
        .take(DESTINATION_SLUG_MAX_CHARS)
        .collect()
}

/// ID slug：ID 为空时使用当前时间 `HHMMSS`
pub fn id_slug(id: &str, now: NaiveDateTime) -> String {
    if id.is_empty() {
        now.format("%H%M%S").to_string()
    } else {
        id.to_string()
    }
}

/// 生成不含扩展名的文件名
pub fn base_filename(record: &ChecklistRecord, now: NaiveDateTime) -> String {
    let name = format!(
        "{}_{}_{}_{}",
        FILENAME_PREFIX,
        now.format("%Y-%m-%d"),
        destination_slug(record.destination()),
        id_slug(record.id(), now)
    );
    name.trim_matches('_').to_string()
}

/// 计算 DOCX 输出路径
///
/// 指定了文件名时：绝对路径直接使用，相对路径拼接到输出目录下
pub fn resolve_output_path(
    output_dir: &Path,
    file_name: Option<&Path>,
    base_name: &str,
) -> PathBuf {
    match file_name {
        Some(name) if name.is_absolute() => name.to_path_buf(),
        Some(name) => output_dir.join(name),
        None => output_dir.join(format!("{}.docx", base_name)),
    }
}

/// PDF 与 DOCX 同目录同名
pub fn pdf_sibling(docx_path: &Path) -> PathBuf {
    docx_path.with_extension("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 30)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_base_filename() {
        let record = ChecklistRecord::builder()
            .id("123")
            .destination("Rota 12")
            .build();

        assert_eq!(
            base_filename(&record, at(8, 15, 0)),
            "CHECKLIST_2025-09-30_Rota_12_123"
        );
    }

    #[test]
    fn test_filename_uses_today_not_record_date() {
        let record = ChecklistRecord::builder()
            .id("7")
            .date("01/01/2020")
            .destination("Centro")
            .build();

        assert_eq!(
            base_filename(&record, at(9, 0, 0)),
            "CHECKLIST_2025-09-30_Centro_7"
        );
    }

    #[test]
    fn test_empty_id_falls_back_to_time() {
        let record = ChecklistRecord::builder().destination("Rota 1").build();

        assert_eq!(
            base_filename(&record, at(14, 5, 9)),
            "CHECKLIST_2025-09-30_Rota_1_140509"
        );
    }

    #[test]
    fn test_destination_is_truncated_after_replacing_spaces() {
        let destination = "Rota muito longa que passa de quarenta caracteres com folga";
        let slug = destination_slug(destination);

        assert_eq!(slug.chars().count(), DESTINATION_SLUG_MAX_CHARS);
        assert_eq!(slug, "Rota_muito_longa_que_passa_de_quarenta_c");
        assert!(!slug.contains(' '));
    }

    #[test]
    fn test_destination_truncation_counts_chars() {
        let slug = destination_slug(&"ã".repeat(50));
        assert_eq!(slug.chars().count(), DESTINATION_SLUG_MAX_CHARS);
    }

    #[test]
    fn test_underscores_are_stripped_at_the_edges() {
        let record = ChecklistRecord::builder().id("99__").build();

        assert_eq!(base_filename(&record, at(0, 0, 0)), "CHECKLIST_2025-09-30__99");
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = Path::new("saidas");

        assert_eq!(
            resolve_output_path(dir, None, "CHECKLIST_X"),
            PathBuf::from("saidas/CHECKLIST_X.docx")
        );
        assert_eq!(
            resolve_output_path(dir, Some(Path::new("manual.docx")), "CHECKLIST_X"),
            PathBuf::from("saidas/manual.docx")
        );

        let absolute = std::env::temp_dir().join("abs.docx");
        assert_eq!(
            resolve_output_path(dir, Some(&absolute), "CHECKLIST_X"),
            absolute
        );
    }

    #[test]
    fn test_pdf_sibling() {
        assert_eq!(
            pdf_sibling(Path::new("saidas/CHECKLIST_X.docx")),
            PathBuf::from("saidas/CHECKLIST_X.pdf")
        );
    }
}
