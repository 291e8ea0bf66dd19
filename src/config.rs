use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认文档标题
pub const DEFAULT_TITLE: &str = "CHECK-LIST DE MOVIMENTACAO – RODOPENHA TRANSPORTES";

/// 表单默认使用的 logo 文件（位于当前工作目录）
pub const DEFAULT_LOGO_FILE: &str = "LogoWebRodoPenha-removebg-preview.png";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 输出目录
    pub output_dir: PathBuf,
    /// 表单界面使用的 logo 路径
    pub logo_path: PathBuf,
    /// 文档标题
    pub title: String,
    /// DOCX -> PDF 转换程序
    pub pdf_converter: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            logo_path: PathBuf::from(DEFAULT_LOGO_FILE),
            title: DEFAULT_TITLE.to_string(),
            pdf_converter: "soffice".to_string(),
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件内容，所有字段均可省略
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    logo_path: Option<PathBuf>,
    title: Option<String>,
    pdf_converter: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 在默认值之上读取环境变量
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 加载配置：默认值 -> TOML 文件（可选）-> 环境变量
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        match config_file {
            Some(path) => Ok(Self::from_toml_file(path)?.with_env()),
            None => Ok(Self::from_env()),
        }
    }

    /// 从 TOML 文件读取配置，未提供的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            output_dir: file.output_dir.unwrap_or(default.output_dir),
            logo_path: file.logo_path.unwrap_or(default.logo_path),
            title: file.title.unwrap_or(default.title),
            pdf_converter: file.pdf_converter.unwrap_or(default.pdf_converter),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    fn with_env(self) -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            output_dir: var("CHECKLIST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.output_dir),
            logo_path: var("CHECKLIST_LOGO")
                .map(PathBuf::from)
                .unwrap_or(self.logo_path),
            title: var("CHECKLIST_TITLE").unwrap_or(self.title),
            pdf_converter: var("CHECKLIST_PDF_CONVERTER").unwrap_or(self.pdf_converter),
            verbose_logging: var("VERBOSE_LOGGING")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(self.verbose_logging),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
