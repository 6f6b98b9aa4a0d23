//! Axis-aligned rectangles and the hitbox overlap test.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap test where touching edges count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// True when `inner` lies entirely inside `self`.
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.left() >= self.left()
            && inner.top() >= self.top()
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }
}

/// Collision rectangle, relative to the owning entity's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(offset_x: f32, offset_y: f32, width: f32, height: f32) -> Self {
        Hitbox { offset_x, offset_y, width, height }
    }

    /// A hitbox covering the whole visual rect of a `width` x `height` sprite.
    pub fn full(width: f32, height: f32) -> Self {
        Hitbox::new(0.0, 0.0, width, height)
    }

    /// Whether this hitbox stays within a `width` x `height` visual rect.
    pub fn fits_within(&self, width: f32, height: f32) -> bool {
        Rect::new(0.0, 0.0, width, height)
            .contains(&Rect::new(self.offset_x, self.offset_y, self.width, self.height))
    }
}

/// Anything that can take part in a hit test.
pub trait Collidable {
    /// The hitbox in world coordinates.
    fn hitbox_rect(&self) -> Rect;
}

/// Returns true if the hitboxes of `a` and `b` overlap or touch.
pub fn is_colliding<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.hitbox_rect().overlaps(&b.hitbox_rect())
}
