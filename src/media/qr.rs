use crate::document::model::EmbeddedImage;
use crate::error::MediaError;

/// 二维码渲染能力
///
/// 渲染器不可用时（未启用 `qr` feature）文档中不出现二维码
pub trait QrRenderer: Send + Sync {
    /// 将任意文字渲染为 PNG 图片
    fn render_png(&self, payload: &str) -> Result<EmbeddedImage, MediaError>;
}

/// 基于 `qrcode` crate 的渲染器
#[cfg(feature = "qr")]
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeRenderer;

#[cfg(feature = "qr")]
impl QrRenderer for QrCodeRenderer {
    fn render_png(&self, payload: &str) -> Result<EmbeddedImage, MediaError> {
        use crate::document::model::PictureFormat;
        use image::{DynamicImage, ImageFormat, Luma};
        use qrcode::QrCode;
        use std::io::Cursor;

        let code = QrCode::new(payload.as_bytes()).map_err(|e| MediaError::QrFailed {
            message: e.to_string(),
        })?;
        let bitmap = code.render::<Luma<u8>>().min_dimensions(256, 256).build();
        let (width, height) = bitmap.dimensions();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(bitmap)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|source| MediaError::EncodeFailed { source })?;

        Ok(EmbeddedImage::new(png, PictureFormat::Png, width, height))
    }
}

/// 当前构建可用的默认渲染器
pub fn default_renderer() -> Option<Box<dyn QrRenderer>> {
    #[cfg(feature = "qr")]
    {
        Some(Box::new(QrCodeRenderer))
    }
    #[cfg(not(feature = "qr"))]
    {
        None
    }
}
