pub mod entities;
pub mod value_objects;

pub use entities::{Comment, LoadedImage, Post, Profile};
pub use value_objects::{ImageVariant, LikedSet, PixelSize};
