use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::Url;

/// 投稿画像の種類。サムネイルはフルサイズより軽い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    Thumbnail,
    Full,
}

impl ImageVariant {
    /// URL の末尾コンポーネントから種類を判定する
    pub fn from_url(url: &Url) -> Self {
        match last_path_component(url) {
            Some(name) if name.contains("thumbnail") => ImageVariant::Thumbnail,
            _ => ImageVariant::Full,
        }
    }
}

/// URL の末尾コンポーネントをデコードして返す。UTF-8 でない場合は None
pub fn last_path_component(url: &Url) -> Option<Cow<'_, str>> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .and_then(|segment| percent_decode_str(segment).decode_utf8().ok())
}
