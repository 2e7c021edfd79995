use serde::{Deserialize, Serialize};

/// 2D vector in screen space. Y grows downward, matching mobile render
/// coordinates: gravity is a positive y acceleration, jumps are negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box stored as center + half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Build a box from its center and full width/height.
    pub fn from_size(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            half: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    /// Top edge. Y-down: top is the smaller y coordinate.
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    /// Bottom edge. Y-down: bottom is the larger y coordinate.
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Strict overlap test. Boxes that merely touch along an edge do not
    /// overlap, so a player resting exactly on a platform top is not
    /// "inside" it.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_from_center_and_half_extents() {
        let b = Aabb::from_size(Vec2::new(10.0, 5.0), 4.0, 2.0);
        assert_eq!(b.left(), 8.0);
        assert_eq!(b.right(), 12.0);
        assert_eq!(b.top(), 4.0);
        assert_eq!(b.bottom(), 6.0);
    }

    #[test]
    fn overlapping_boxes_overlap() {
        let a = Aabb::from_size(Vec2::new(0.0, 0.0), 2.0, 2.0);
        let b = Aabb::from_size(Vec2::new(1.0, 1.0), 2.0, 2.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = Aabb::from_size(Vec2::new(0.0, 0.0), 2.0, 2.0);
        let b = Aabb::from_size(Vec2::new(5.0, 0.0), 2.0, 2.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        // b's left edge exactly at a's right edge
        let a = Aabb::from_size(Vec2::new(0.0, 0.0), 2.0, 2.0);
        let b = Aabb::from_size(Vec2::new(2.0, 0.0), 2.0, 2.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = Aabb::from_size(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let inner = Aabb::from_size(Vec2::new(1.0, -1.0), 1.0, 1.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
