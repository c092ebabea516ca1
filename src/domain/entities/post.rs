use super::comment::Comment;
use super::profile::Profile;
use crate::domain::value_objects::placeholder_id::{is_placeholder_id, placeholder_id, random_text};
use crate::domain::value_objects::{ImageVariant, PixelSize};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub image_name: String,
    pub thumbnail_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_hash: Option<String>,
    pub image_size: PixelSize,
    pub thumbnail_size: PixelSize,
    pub author: Profile,
    #[serde(default)]
    pub number_of_comments: u32,
    #[serde(default)]
    pub is_liked: bool,
    /// 詳細取得前は None。取得後は完全なリストで以後変化しない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    pub fn has_details(&self) -> bool {
        self.comments.is_some()
    }

    /// 詳細を反映する。既に詳細を持つ場合は何もせず false を返す
    pub fn apply_comments(&mut self, comments: Vec<Comment>) -> bool {
        if self.comments.is_some() {
            return false;
        }
        self.number_of_comments = comments.len() as u32;
        self.comments = Some(comments);
        true
    }

    pub fn image_name_for(&self, variant: ImageVariant) -> &str {
        match variant {
            ImageVariant::Thumbnail => &self.thumbnail_name,
            ImageVariant::Full => &self.image_name,
        }
    }

    pub fn size_for(&self, variant: ImageVariant) -> PixelSize {
        match variant {
            ImageVariant::Thumbnail => self.thumbnail_size,
            ImageVariant::Full => self.image_size,
        }
    }

    pub fn placeholder() -> Self {
        let number_of_comments = rand::thread_rng().gen_range(0..=500);
        Self {
            id: placeholder_id(),
            created_at: Utc::now(),
            image_name: "placeholder".to_string(),
            thumbnail_name: "placeholder".to_string(),
            description: Some(random_text(10..=80)),
            blur_hash: None,
            image_size: PixelSize::new(640.0, 640.0),
            thumbnail_size: PixelSize::new(320.0, 320.0),
            author: Profile::placeholder(),
            number_of_comments,
            is_liked: false,
            comments: None,
        }
    }

    pub fn placeholders(count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::placeholder()).collect()
    }

    pub fn is_placeholder(&self) -> bool {
        is_placeholder_id(&self.id)
    }

    /// 詳細取得中に表示するダミーコメント
    pub fn comment_placeholders(&self) -> Vec<Comment> {
        Comment::placeholders(self.number_of_comments as usize)
    }
}

/// `posts.json` の形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

/// `details-<id>.json` の形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailsResponse {
    pub comments: Vec<Comment>,
}

pub fn details_file_name(post_id: &str) -> String {
    format!("details-{post_id}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{
        "id": "IMG_2826",
        "createdAt": "2023-07-31T12:00:00Z",
        "imageName": "IMG_2826.jpg",
        "thumbnailName": "IMG_2826-thumbnail.jpg",
        "description": "Nap time",
        "blurHash": "LEHV6nWB2yk8pyo0adR*.7kCMdnj",
        "imageSize": [1280, 960],
        "thumbnailSize": [320, 240],
        "author": { "id": "yoshi", "name": "Yoshi", "username": "yoshi" }
    }"#;

    #[test]
    fn test_decode_applies_defaults() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.id, "IMG_2826");
        assert_eq!(post.number_of_comments, 0);
        assert!(!post.is_liked);
        assert!(post.comments.is_none());
        assert_eq!(post.image_size, PixelSize::new(1280.0, 960.0));
        assert_eq!(post.author.username, "yoshi");
    }

    #[test]
    fn test_apply_comments_only_once() {
        let mut post: Post = serde_json::from_str(POST_JSON).unwrap();
        let first = vec![Comment::new("c1", "yoshi", "cute")];
        let second = vec![
            Comment::new("c2", "mario", "wow"),
            Comment::new("c3", "luigi", "nice"),
        ];

        assert!(post.apply_comments(first.clone()));
        assert!(!post.apply_comments(second));
        assert_eq!(post.comments, Some(first));
        assert_eq!(post.number_of_comments, 1);
    }

    #[test]
    fn test_variant_accessors() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.image_name_for(ImageVariant::Thumbnail), "IMG_2826-thumbnail.jpg");
        assert_eq!(post.image_name_for(ImageVariant::Full), "IMG_2826.jpg");
        assert_eq!(post.size_for(ImageVariant::Thumbnail).width, 320.0);
    }

    #[test]
    fn test_placeholders() {
        let post = Post::placeholder();
        assert!(post.is_placeholder());
        assert!(post.author.is_placeholder());
        assert!(post.number_of_comments <= 500);
        let comments = post.comment_placeholders();
        assert_eq!(comments.len(), post.number_of_comments as usize);
        assert!(comments.iter().all(Comment::is_placeholder));
        assert_eq!(Post::placeholders(10).len(), 10);
    }

    #[test]
    fn test_details_file_name() {
        assert_eq!(details_file_name("p1"), "details-p1.json");
    }
}
