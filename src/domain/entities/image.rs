use crate::domain::value_objects::PixelSize;
use crate::shared::{AppError, Result};
use bytes::Bytes;

/// デコード済み（ヘッダ検証済み）の画像
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub name: String,
    pub data: Bytes,
    pub size: PixelSize,
    pub format: String,
}

impl LoadedImage {
    /// バイト列を画像として解釈する。画像として読めない場合は Decode エラー
    pub fn decode(name: &str, data: Bytes) -> Result<Self> {
        let format = imagesize::image_type(&data)
            .map_err(|err| AppError::Decode(format!("Failed to load image {name}: {err}")))?;
        let dimensions = imagesize::blob_size(&data)
            .map_err(|err| AppError::Decode(format!("Failed to load image {name}: {err}")))?;

        Ok(Self {
            name: name.to_string(),
            size: PixelSize::new(dimensions.width as f64, dimensions.height as f64),
            format: format!("{format:?}").to_lowercase(),
            data,
        })
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}
