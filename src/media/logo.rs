use crate::document::model::{EmbeddedImage, PictureFormat};
use crate::error::MediaError;
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 读取并校验 logo 文件
///
/// PNG / JPEG 原样嵌入，其他可解码的格式（GIF、BMP）转换为 PNG
pub fn load_logo(path: &Path) -> Result<EmbeddedImage, MediaError> {
    if !path.exists() {
        return Err(MediaError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| MediaError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("读取 logo: {} ({} 字节)", path.display(), bytes.len());
    decode_image(bytes)
}

/// 解码图片数据，得到可嵌入文档的图片
pub fn decode_image(bytes: Vec<u8>) -> Result<EmbeddedImage, MediaError> {
    let format = image::guess_format(&bytes).map_err(|source| MediaError::DecodeFailed { source })?;
    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|source| MediaError::DecodeFailed { source })?;
    let (width, height) = decoded.dimensions();

    match format {
        ImageFormat::Png => Ok(EmbeddedImage::new(bytes, PictureFormat::Png, width, height)),
        ImageFormat::Jpeg => Ok(EmbeddedImage::new(bytes, PictureFormat::Jpeg, width, height)),
        other => {
            debug!("logo 格式 {:?} 转换为 PNG", other);
            let mut png = Vec::new();
            decoded
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|source| MediaError::EncodeFailed { source })?;
            Ok(EmbeddedImage::new(png, PictureFormat::Png, width, height))
        }
    }
}
