//! 图片能力：logo 加载与二维码生成
//!
//! 这里的所有错误都是可降级的，由调用方记录警告后继续生成文档

pub mod logo;
pub mod qr;

pub use logo::{decode_image, load_logo};
pub use qr::{default_renderer, QrRenderer};
#[cfg(feature = "qr")]
pub use qr::QrCodeRenderer;
