use checklist_docx::error::ConverterError;
use checklist_docx::orchestrator::{submit_form, submit_form_with, FormSubmission, SaveOutcome};
use checklist_docx::services::PdfConverter;
use checklist_docx::{App, ChecklistRecord, ChecklistRequest, Config, DocumentAssembler, PdfOutcome};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// 测试用转换器
struct FakeConverter {
    available: bool,
    fail: bool,
}

impl FakeConverter {
    fn working() -> Self {
        Self {
            available: true,
            fail: false,
        }
    }
}

impl PdfConverter for FakeConverter {
    fn name(&self) -> &str {
        "fake-soffice"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn convert(&self, _docx: &Path, pdf: &Path) -> Result<PathBuf, ConverterError> {
        if self.fail {
            return Err(ConverterError::Failed {
                code: Some(1),
                stderr: "Word nao encontrado".to_string(),
            });
        }
        tokio::fs::write(pdf, b"%PDF-1.4").await.expect("写入PDF失败");
        Ok(pdf.to_path_buf())
    }
}

fn app(converter: FakeConverter) -> App<FakeConverter> {
    App::with_converter(&Config::default(), converter)
        .with_assembler(DocumentAssembler::default().without_qr())
}

fn request(output_dir: &Path, notes: &[&str]) -> ChecklistRequest {
    ChecklistRequest {
        record: ChecklistRecord::builder()
            .id("123")
            .destination("Rota 12")
            .notes(notes.iter().copied())
            .build(),
        logo: None,
        qr_payload: None,
        file_name: None,
        output_dir: output_dir.to_path_buf(),
        export_pdf: false,
    }
}

fn read_part(docx: &Path, name: &str) -> String {
    let file = std::fs::File::open(docx).expect("打开DOCX失败");
    let mut archive = zip::ZipArchive::new(file).expect("DOCX不是有效的ZIP");
    let mut part = archive.by_name(name).expect("缺少部件");
    let mut content = String::new();
    part.read_to_string(&mut content).unwrap();
    content
}

fn part_names(docx: &Path) -> Vec<String> {
    let file = std::fs::File::open(docx).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn test_end_to_end_checklist() {
    let dir = tempfile::tempdir().unwrap();
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let report = app(FakeConverter::working())
        .run(request(dir.path(), &["NFe1", "NFe2", "NFe3"]))
        .await
        .unwrap();

    assert_eq!(
        report.docx_path,
        dir.path().join(format!("CHECKLIST_{}_Rota_12_123.docx", today))
    );
    assert_eq!(report.pdf, PdfOutcome::NotRequested);

    let xml = read_part(&report.docx_path, "word/document.xml");
    // 列优先：第一行为 NFe1 | NFe3，第二行为 NFe2 | (空)
    let nfe1 = xml.find(">NFe1<").unwrap();
    let nfe2 = xml.find(">NFe2<").unwrap();
    let nfe3 = xml.find(">NFe3<").unwrap();
    assert!(nfe1 < nfe3 && nfe3 < nfe2);

    let received = xml.find("Total de Notas Recebidas:").unwrap();
    assert!(xml[received..].contains(r#"<w:t xml:space="preserve">3</w:t>"#));
    assert!(xml.contains("CHECK-LIST DE MOVIMENTACAO"));
}

#[tokio::test]
async fn test_custom_file_name() {
    let dir = tempfile::tempdir().unwrap();

    let mut relative = request(&dir.path().join("saidas"), &["NFe1"]);
    relative.file_name = Some(PathBuf::from("manual.docx"));
    let report = app(FakeConverter::working()).run(relative).await.unwrap();
    assert_eq!(report.docx_path, dir.path().join("saidas").join("manual.docx"));
    assert!(report.docx_path.is_file());

    let absolute_path = dir.path().join("outro").join("absoluto.docx");
    let mut absolute = request(&dir.path().join("saidas"), &[]);
    absolute.file_name = Some(absolute_path.clone());
    let report = app(FakeConverter::working()).run(absolute).await.unwrap();
    assert_eq!(report.docx_path, absolute_path);
    assert!(absolute_path.is_file());
}

#[tokio::test]
async fn test_pdf_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut req = request(dir.path(), &["NFe1"]);
    req.export_pdf = true;

    let report = app(FakeConverter::working()).run(req).await.unwrap();

    let expected = report.docx_path.with_extension("pdf");
    assert_eq!(report.pdf, PdfOutcome::Exported(expected.clone()));
    assert!(expected.is_file());
}

#[tokio::test]
async fn test_pdf_failures_keep_docx() {
    let dir = tempfile::tempdir().unwrap();

    let mut req = request(dir.path(), &["NFe1"]);
    req.export_pdf = true;
    let report = app(FakeConverter {
        available: false,
        fail: false,
    })
    .run(req.clone())
    .await
    .unwrap();
    assert_eq!(
        report.pdf,
        PdfOutcome::Unavailable {
            program: "fake-soffice".to_string()
        }
    );
    assert!(report.docx_path.is_file());

    let report = app(FakeConverter {
        available: true,
        fail: true,
    })
    .run(req)
    .await
    .unwrap();
    match &report.pdf {
        PdfOutcome::Failed(message) => assert!(message.contains("Word nao encontrado")),
        other => panic!("esperado falha de PDF, obtido {:?}", other),
    }
    assert!(report.docx_path.is_file());
}

#[tokio::test]
async fn test_logo_fallbacks() {
    let dir = tempfile::tempdir().unwrap();

    // 不存在的 logo
    let mut missing = request(&dir.path().join("a"), &["NFe1"]);
    missing.logo = Some(dir.path().join("nao-existe.png"));
    let report = app(FakeConverter::working()).run(missing).await.unwrap();
    assert!(!part_names(&report.docx_path).iter().any(|n| n.starts_with("word/media/")));
    assert!(read_part(&report.docx_path, "word/document.xml").contains("<w:pBdr>"));

    // 损坏的 logo
    let broken_logo = dir.path().join("quebrado.png");
    std::fs::write(&broken_logo, b"\x89PNG\r\n\x1a\nlixo").unwrap();
    let mut broken = request(&dir.path().join("b"), &["NFe1"]);
    broken.logo = Some(broken_logo);
    let report = app(FakeConverter::working()).run(broken).await.unwrap();
    assert!(!part_names(&report.docx_path).iter().any(|n| n.starts_with("word/media/")));

    // 正常的 logo
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, png_bytes(120, 60)).unwrap();
    let mut with_logo = request(&dir.path().join("c"), &["NFe1"]);
    with_logo.logo = Some(logo);
    let report = app(FakeConverter::working()).run(with_logo).await.unwrap();
    assert!(part_names(&report.docx_path).contains(&"word/media/image1.png".to_string()));
    let rels = read_part(&report.docx_path, "word/_rels/document.xml.rels");
    assert!(rels.contains("media/image1.png"));
}

#[tokio::test]
async fn test_empty_notes_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let report = app(FakeConverter::working())
        .run(request(dir.path(), &["  ", ""]))
        .await
        .unwrap();

    let xml = read_part(&report.docx_path, "word/document.xml");
    assert!(xml.contains(r#"<w:t xml:space="preserve">—</w:t>"#));
    // 基本信息、合计、签名
    assert_eq!(xml.matches("<w:tbl>").count(), 3);
    let received = xml.find("Total de Notas Recebidas:").unwrap();
    assert!(xml[received..].contains(r#"<w:t xml:space="preserve">0</w:t>"#));
}

#[tokio::test]
async fn test_form_submission() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        logo_path: dir.path().join("sem-logo.png"),
        ..Config::default()
    };
    let submission = FormSubmission {
        id: "77".to_string(),
        destination: "Rota Norte".to_string(),
        notes_text: "NFe1\nNFe2\n".to_string(),
        include_logo: true,
        output_dir: dir.path().join("form"),
        export_pdf: true,
        ..FormSubmission::default()
    };

    let outcome = submit_form_with(
        &submission,
        &config,
        &DocumentAssembler::default().without_qr(),
        &FakeConverter::working(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.download_name, "CHECKLIST_MOVIMENTACAO.docx");
    assert!(outcome.download.starts_with(b"PK"));
    let saved = match &outcome.save {
        SaveOutcome::Saved(path) => path.clone(),
        other => panic!("esperado arquivo salvo, obtido {:?}", other),
    };
    assert!(saved.file_name().unwrap().to_string_lossy().ends_with("_Rota_Norte_77.docx"));
    assert_eq!(std::fs::read(&saved).unwrap(), outcome.download);
    assert_eq!(outcome.pdf, PdfOutcome::Exported(saved.with_extension("pdf")));
}

#[tokio::test]
async fn test_form_save_failure_is_soft() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("arquivo");
    std::fs::write(&blocker, b"x").unwrap();

    let submission = FormSubmission {
        notes_text: "NFe1".to_string(),
        output_dir: blocker,
        export_pdf: true,
        ..FormSubmission::default()
    };

    let outcome = submit_form_with(
        &submission,
        &Config::default(),
        &DocumentAssembler::default().without_qr(),
        &FakeConverter::working(),
    )
    .await
    .unwrap();

    assert!(matches!(outcome.save, SaveOutcome::Failed(_)));
    assert_eq!(outcome.pdf, PdfOutcome::NotRequested);
    assert!(!outcome.download.is_empty());
}

#[tokio::test]
async fn test_submit_form_uses_config_title() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        title: "CHECK-LIST DOCA 5".to_string(),
        logo_path: dir.path().join("sem-logo.png"),
        ..Config::default()
    };
    let submission = FormSubmission {
        id: "8".to_string(),
        notes_text: "NFe1".to_string(),
        output_dir: dir.path().to_path_buf(),
        ..FormSubmission::default()
    };

    let outcome = submit_form(&submission, &config, &FakeConverter::working())
        .await
        .unwrap();

    assert_eq!(
        outcome.mime_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(outcome.pdf, PdfOutcome::NotRequested);
    let saved = match &outcome.save {
        SaveOutcome::Saved(path) => path.clone(),
        other => panic!("esperado arquivo salvo, obtido {:?}", other),
    };
    let xml = read_part(&saved, "word/document.xml");
    assert!(xml.contains("CHECK-LIST DOCA 5"));
}

#[tokio::test]
async fn test_scanner_separators_keep_document_valid() {
    let dir = tempfile::tempdir().unwrap();
    let report = app(FakeConverter::working())
        .run(request(dir.path(), &["0102\u{1d}10ABC", "NFe\u{0b}2"]))
        .await
        .unwrap();

    let xml = read_part(&report.docx_path, "word/document.xml");
    assert!(!xml.contains('\u{1d}'));
    assert!(!xml.contains('\u{0b}'));
    assert!(xml.contains(">010210ABC<"));
    assert!(xml.contains(">NFe2<"));
}
