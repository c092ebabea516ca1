use std::collections::HashSet;

/// ユーザーが「いいね」した投稿IDの集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedSet(HashSet<String>);

impl LikedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.0.contains(post_id)
    }

    /// 状態が変化した場合のみ true を返す
    pub fn set(&mut self, post_id: &str, liked: bool) -> bool {
        if liked {
            self.0.insert(post_id.to_string())
        } else {
            self.0.remove(post_id)
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_set(&self) -> &HashSet<String> {
        &self.0
    }
}

impl From<HashSet<String>> for LikedSet {
    fn from(ids: HashSet<String>) -> Self {
        Self(ids)
    }
}

impl From<LikedSet> for HashSet<String> {
    fn from(set: LikedSet) -> Self {
        set.0
    }
}
