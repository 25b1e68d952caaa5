mod point;
mod rect;
pub mod transform;

pub use point::Point;
pub use rect::Rect;
pub use transform::{AffineTransform, Decomposed};
