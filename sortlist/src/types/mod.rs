mod color;
mod enums;
mod style;
mod vec2;

pub use color::Rgb;
pub use enums::{Axis, Border, Orientation, TextStyle};
pub use style::Style;
pub use vec2::{Extent, Vec2};
