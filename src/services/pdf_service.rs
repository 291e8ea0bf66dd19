//! PDF 导出服务 - 业务能力层
//!
//! 通过外部转换程序（默认 LibreOffice `soffice`）把 DOCX 转成 PDF。
//! 转换失败只报告，不影响已经写好的 DOCX。

use crate::error::ConverterError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// DOCX -> PDF 转换能力
pub trait PdfConverter: Send + Sync {
    /// 转换程序名称（用于提示信息）
    fn name(&self) -> &str;

    /// 转换程序是否可用
    fn is_available(&self) -> bool;

    /// 将 `docx` 转换为 `pdf`，返回生成的 PDF 路径
    fn convert(
        &self,
        docx: &Path,
        pdf: &Path,
    ) -> impl Future<Output = Result<PathBuf, ConverterError>> + Send;
}

/// 调用 `soffice --headless --convert-to pdf` 的转换器
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: String,
}

impl SofficeConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl PdfConverter for SofficeConverter {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        find_program(&self.program).is_some()
    }

    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<PathBuf, ConverterError> {
        let program = find_program(&self.program).ok_or_else(|| ConverterError::Unavailable {
            program: self.program.clone(),
        })?;
        let out_dir = pdf
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        info!("📄 导出PDF: {} -> {}", docx.display(), pdf.display());
        let output = Command::new(&program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(docx)
            .output()
            .await
            .map_err(|source| ConverterError::SpawnFailed {
                program: program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConverterError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // 转换程序按 DOCX 文件名在输出目录生成 PDF
        let mut file_name = docx.file_stem().unwrap_or_default().to_os_string();
        file_name.push(".pdf");
        let produced = out_dir.join(file_name);
        if !produced.is_file() {
            return Err(ConverterError::MissingOutput { path: produced });
        }
        if produced != pdf {
            debug!("移动 {} -> {}", produced.display(), pdf.display());
            tokio::fs::rename(&produced, pdf)
                .await
                .map_err(|source| ConverterError::MoveFailed {
                    path: pdf.to_path_buf(),
                    source,
                })?;
        }

        Ok(pdf.to_path_buf())
    }
}

/// 在 `PATH` 中查找程序；包含路径分隔符时直接检查该路径
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = full.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let converter = SofficeConverter::new("/nonexistent/bin/soffice");
        assert!(!converter.is_available());

        let err = tokio_test::block_on(
            converter.convert(Path::new("a.docx"), Path::new("a.pdf")),
        )
        .unwrap_err();
        assert!(matches!(err, ConverterError::Unavailable { .. }));
    }

    #[test]
    fn test_unknown_program_not_in_path() {
        assert!(find_program("conversor-que-nao-existe-123").is_none());
    }

    #[cfg(unix)]
    fn fake_converter(dir: &Path, body: &str) -> SofficeConverter {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-soffice");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        SofficeConverter::new(script.display().to_string())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_converts_next_to_docx() {
        let dir = tempfile::tempdir().unwrap();
        // 参数: --headless --convert-to pdf --outdir DIR FILE
        let converter = fake_converter(
            dir.path(),
            r#"name=$(basename "$6" .docx); echo pdf > "$5/$name.pdf""#,
        );
        let docx = dir.path().join("CHECKLIST_X.docx");
        std::fs::write(&docx, b"docx").unwrap();
        let pdf = dir.path().join("CHECKLIST_X.pdf");

        let produced = converter.convert(&docx, &pdf).await.unwrap();

        assert_eq!(produced, pdf);
        assert!(pdf.is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_conversion_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let converter = fake_converter(dir.path(), "echo 'sem suporte' >&2; exit 3");

        let err = converter
            .convert(&dir.path().join("x.docx"), &dir.path().join("x.pdf"))
            .await
            .unwrap_err();

        match err {
            ConverterError::Failed { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "sem suporte");
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_without_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let converter = fake_converter(dir.path(), "exit 0");

        let err = converter
            .convert(&dir.path().join("x.docx"), &dir.path().join("x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConverterError::MissingOutput { .. }));
    }
}
