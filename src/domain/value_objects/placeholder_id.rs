use rand::Rng;
use rand::distributions::Alphanumeric;
use std::ops::RangeInclusive;

const PLACEHOLDER_ID_PREFIX: &str = "__PLACEHOLDER-";

/// 読み込み中表示用のダミーID
pub fn placeholder_id() -> String {
    format!("{PLACEHOLDER_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

pub fn is_placeholder_id(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_ID_PREFIX)
}

/// 指定範囲の長さのランダムな英数字列
pub(crate) fn random_text(length: RangeInclusive<usize>) -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(length);
    (&mut rng)
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
