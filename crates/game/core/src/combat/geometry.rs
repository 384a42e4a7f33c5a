use crate::state::{Facing, Vec2};

/// Axis-aligned rectangle. `x`/`y` is the top-left corner (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test; rectangles that only touch along an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Width of the horizontal overlap with `other`, zero when disjoint.
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        if !self.intersects(other) {
            return 0.0;
        }
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Places an owner-relative shape in stage space.
    ///
    /// `x` is measured along the facing direction, so a shape authored for a
    /// combatant looking right is mirrored around `origin.x` when it looks
    /// left.
    pub fn placed(&self, origin: Vec2, facing: Facing) -> Rect {
        let left = match facing {
            Facing::Right => origin.x + self.x,
            Facing::Left => origin.x - (self.x + self.width),
        };
        Rect::new(left, origin.y + self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_contact_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }

    #[test]
    fn shapes_mirror_with_facing() {
        let shape = Rect::new(10.0, -50.0, 60.0, 40.0);
        let origin = Vec2::new(400.0, 620.0);

        let right = shape.placed(origin, Facing::Right);
        assert_eq!(right, Rect::new(410.0, 570.0, 60.0, 40.0));

        let left = shape.placed(origin, Facing::Left);
        assert_eq!(left, Rect::new(330.0, 570.0, 60.0, 40.0));
    }

    #[test]
    fn horizontal_overlap_width() {
        let a = Rect::new(0.0, 0.0, 60.0, 120.0);
        let b = Rect::new(40.0, 0.0, 60.0, 120.0);
        assert_eq!(a.horizontal_overlap(&b), 20.0);
        assert_eq!(a.horizontal_overlap(&Rect::new(100.0, 0.0, 1.0, 1.0)), 0.0);
    }
}
