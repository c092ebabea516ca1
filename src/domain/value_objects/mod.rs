pub mod image_variant;
pub mod liked_set;
pub mod pixel_size;
pub mod placeholder_id;

pub use image_variant::{ImageVariant, last_path_component};
pub use liked_set::LikedSet;
pub use pixel_size::PixelSize;
pub use placeholder_id::{is_placeholder_id, placeholder_id};
