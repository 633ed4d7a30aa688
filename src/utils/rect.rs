/// An axis-aligned rectangle, with top-left corner at (`x`, `y`).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at origin with the given dimensions.
    #[inline]
    pub fn with_size(width: u32, height: u32) -> Self {
        Rect::new(0, 0, width, height)
    }
}
