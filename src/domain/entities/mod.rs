pub mod comment;
pub mod image;
pub mod post;
pub mod profile;

pub use comment::Comment;
pub use image::LoadedImage;
pub use post::{Post, PostDetailsResponse, PostsResponse, details_file_name};
pub use profile::{Profile, avatar_file_name};
