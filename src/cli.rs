//! 命令行参数
//!
//! 参数名沿用仓库操作员熟悉的葡萄牙语名称（`--doca`、`--saida_dir` 等）

use crate::config::Config;
use crate::models::ChecklistRecord;
use crate::orchestrator::{ChecklistRequest, PdfOutcome};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// 读取标准输入前的提示
pub const STDIN_PROMPT: &str =
    "Digite/bipe as notas (uma por linha). Finalize com Ctrl+D (Linux/Mac) ou Ctrl+Z (Windows) e Enter.";

/// Gerador de Check-list (DOCX/PDF)
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gerar_checklist",
    about = "Gerador de Check-list de movimentacao (DOCX/PDF)",
    long_about = None
)]
pub struct Cli {
    #[arg(long, default_value = "")]
    pub id: String,

    #[arg(long, default_value = "")]
    pub doca: String,

    /// Data (dd/mm/aaaa); padrao: hoje
    #[arg(long)]
    pub data: Option<String>,

    #[arg(long, default_value = "")]
    pub conferente: String,

    #[arg(long, default_value = "")]
    pub turno: String,

    #[arg(long, default_value = "")]
    pub motorista: String,

    #[arg(long, default_value = "")]
    pub placa: String,

    #[arg(long, default_value = "")]
    pub destino: String,

    /// Lista separada por virgulas; se vazio, le do STDIN (uma por linha)
    #[arg(long, default_value = "")]
    pub notas: String,

    /// Caminho do arquivo de logo (png/jpg) opcional
    #[arg(long, default_value = "")]
    pub logo: String,

    /// Nome do arquivo (opcional)
    #[arg(long, default_value = "")]
    pub saida: String,

    /// Pasta de saida; padrao: configuracao
    #[arg(long = "saida_dir")]
    pub saida_dir: Option<PathBuf>,

    /// Tambem exporta PDF via conversor externo (LibreOffice)
    #[arg(long)]
    pub pdf: bool,

    /// Texto/URL para QR Code no rodape
    #[arg(long, default_value = "")]
    pub qrcode: String,

    /// Arquivo de configuracao TOML
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// 票据来源：`--notas` 非空时按逗号分隔，否则从标准输入逐行读取
    pub async fn collect_notes(&self) -> Result<Vec<String>> {
        if !self.notas.trim().is_empty() {
            return Ok(split_note_list(&self.notas));
        }

        eprintln!("{}", STDIN_PROMPT);
        read_note_lines(BufReader::new(tokio::io::stdin()))
            .await
            .context("无法从标准输入读取票据")
    }

    /// 构造核对单记录
    pub fn to_record(&self, notes: Vec<String>) -> ChecklistRecord {
        let mut builder = ChecklistRecord::builder()
            .id(self.id.as_str())
            .dock(self.doca.as_str())
            .checker_name(self.conferente.as_str())
            .shift(self.turno.as_str())
            .driver_name(self.motorista.as_str())
            .plate(self.placa.as_str())
            .destination(self.destino.as_str())
            .notes(notes);
        if let Some(date) = &self.data {
            builder = builder.date(date.as_str());
        }
        builder.build()
    }

    /// 结合配置构造生成请求
    pub fn into_request(self, notes: Vec<String>, config: &Config) -> ChecklistRequest {
        let record = self.to_record(notes);
        ChecklistRequest {
            record,
            logo: non_empty(&self.logo).map(PathBuf::from),
            qr_payload: non_empty(&self.qrcode).map(str::to_string),
            file_name: non_empty(&self.saida).map(PathBuf::from),
            output_dir: self.saida_dir.unwrap_or_else(|| config.output_dir.clone()),
            export_pdf: self.pdf,
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

/// DOCX 生成成功后输出的结果行
pub fn docx_message(path: &Path) -> String {
    format!("OK! Arquivo gerado: {}", path.display())
}

/// PDF 步骤的结果行；未请求导出时为 `None`
pub fn pdf_message(outcome: &PdfOutcome) -> Option<String> {
    match outcome {
        PdfOutcome::NotRequested => None,
        PdfOutcome::Exported(path) => Some(format!("OK! PDF gerado: {}", path.display())),
        PdfOutcome::Unavailable { program } => Some(format!(
            "[AVISO] Conversor de PDF indisponivel ({}). \
             Instale o LibreOffice ou defina CHECKLIST_PDF_CONVERTER.",
            program
        )),
        PdfOutcome::Failed(e) => Some(format!("[ERRO] Falha ao exportar PDF: {}", e)),
    }
}

/// 逗号分隔的票据列表
pub fn split_note_list(list: &str) -> Vec<String> {
    list.split(',').map(|n| n.trim().to_string()).collect()
}

/// 逐行读取直到 EOF
pub async fn read_note_lines<R: AsyncBufRead + Unpin>(reader: R) -> std::io::Result<Vec<String>> {
    let mut lines = reader.lines();
    let mut notes = Vec::new();
    while let Some(line) = lines.next_line().await? {
        notes.push(line.trim().to_string());
    }
    Ok(notes)
}
