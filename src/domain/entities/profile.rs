use crate::domain::value_objects::placeholder_id::{is_placeholder_id, placeholder_id, random_text};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: username.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            id: placeholder_id(),
            name: random_text(4..=12),
            username: random_text(4..=12),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        is_placeholder_id(&self.id)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new("yoshi", "Yoshi", "yoshi")
    }
}

pub fn avatar_file_name(username: &str) -> String {
    format!("{username}.heic")
}
