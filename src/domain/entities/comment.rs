use crate::domain::value_objects::placeholder_id::{is_placeholder_id, placeholder_id, random_text};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub username: String,
    pub text: String,
}

impl Comment {
    pub fn new(id: impl Into<String>, username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            text: text.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            id: placeholder_id(),
            username: random_text(4..=12),
            text: random_text(8..=120),
        }
    }

    pub fn placeholders(count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::placeholder()).collect()
    }

    pub fn is_placeholder(&self) -> bool {
        is_placeholder_id(&self.id)
    }
}
