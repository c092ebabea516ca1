use serde::{Deserialize, Serialize};

/// 画像のピクセルサイズ。フィクスチャでは `[width, height]` の配列として表現される
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

impl From<[f64; 2]> for PixelSize {
    fn from([width, height]: [f64; 2]) -> Self {
        Self { width, height }
    }
}

impl From<PixelSize> for [f64; 2] {
    fn from(size: PixelSize) -> Self {
        [size.width, size.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_from_array() {
        let size: PixelSize = serde_json::from_str("[640, 480]").unwrap();
        assert_eq!(size, PixelSize::new(640.0, 480.0));
        assert_eq!(serde_json::to_string(&size).unwrap(), "[640.0,480.0]");
    }

    #[test]
    fn test_aspect_ratio_of_empty_size() {
        assert_eq!(PixelSize::new(10.0, 0.0).aspect_ratio(), None);
        assert_eq!(PixelSize::new(640.0, 320.0).aspect_ratio(), Some(2.0));
    }
}
