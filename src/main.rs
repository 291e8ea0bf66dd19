use anyhow::Result;
use checklist_docx::cli::{docx_message, pdf_message, Cli};
use checklist_docx::{logging, App, Config};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref())?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let notes = cli.collect_notes().await?;
    let request = cli.into_request(notes, &config);

    // 初始化并运行应用
    let report = App::new(&config).run(request).await?;
    println!("{}", docx_message(&report.docx_path));
    if let Some(line) = pdf_message(&report.pdf) {
        println!("{}", line);
    }

    Ok(())
}
