use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档构建/序列化错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 输出文件错误
    #[error("输出错误: {0}")]
    Output(#[from] OutputError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档序列化错误
///
/// 只有 DOCX 打包本身失败才会出现，属于不可恢复的错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// ZIP 容器写入失败
    #[error("DOCX打包失败 ({part}): {source}")]
    PackageFailed {
        part: String,
        #[source]
        source: zip::result::ZipError,
    },
    /// 写入部件内容失败
    #[error("写入DOCX部件失败 ({part}): {source}")]
    PartWriteFailed {
        part: String,
        #[source]
        source: std::io::Error,
    },
}

/// 图片相关错误（均为可降级错误，由组装器记录警告，不进入 `AppError`）
#[derive(Debug, Error)]
pub enum MediaError {
    /// 文件不存在
    #[error("图片文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    /// 读取失败
    #[error("读取图片失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 解码失败（损坏或不支持的格式）
    #[error("图片解码失败: {source}")]
    DecodeFailed {
        #[source]
        source: image::ImageError,
    },
    /// 重新编码为 PNG 失败
    #[error("图片编码失败: {source}")]
    EncodeFailed {
        #[source]
        source: image::ImageError,
    },
    /// 二维码内容无法编码
    #[error("二维码生成失败: {message}")]
    QrFailed { message: String },
}

/// 输出文件错误
#[derive(Debug, Error)]
pub enum OutputError {
    /// 创建输出目录失败
    #[error("无法创建输出目录 ({}): {source}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// PDF 转换错误（可恢复，转换为 `PdfOutcome` 报告给用户）
#[derive(Debug, Error)]
pub enum ConverterError {
    /// 转换程序不可用
    #[error("转换程序不可用: {program}")]
    Unavailable { program: String },
    /// 启动转换进程失败
    #[error("无法启动转换程序 {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 转换进程返回失败
    #[error("转换失败 (退出码: {code:?}): {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    /// 移动生成的 PDF 失败
    #[error("移动PDF失败 ({}): {source}", .path.display())]
    MoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 进程执行成功但没有生成文件
    #[error("转换完成但未找到输出文件: {}", .path.display())]
    MissingOutput { path: PathBuf },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Output(OutputError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建目录创建错误
    pub fn create_dir_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Output(OutputError::CreateDirFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
