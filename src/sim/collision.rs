//! Silhouette collision tests
//!
//! Sprites carry wide transparent margins, so bounding boxes alone would
//! report hits that never touch. Every test here is cell-exact: opaque
//! bounds are only used to skip work early.

use glam::IVec2;

use super::mask::Silhouette;
use super::sprites::SpriteSet;

/// Anything whose collision shape is read through a sprite set
pub trait Silhouetted {
    /// Current collision shape (may change every tick, e.g. with animation)
    fn silhouette<'s>(&self, sprites: &'s SpriteSet) -> Silhouette<'s>;

    /// Integer top-left corner of the shape in world space
    fn origin(&self) -> IVec2;
}

/// True iff an opaque cell of `a` at `pos_a` coincides with an opaque cell
/// of `b` at `pos_b`
pub fn overlap(a: Silhouette<'_>, pos_a: IVec2, b: Silhouette<'_>, pos_b: IVec2) -> bool {
    let (Some(bounds_a), Some(bounds_b)) = (a.opaque_bounds(), b.opaque_bounds()) else {
        return false;
    };
    let Some(region) = bounds_a.translate(pos_a).intersect(&bounds_b.translate(pos_b)) else {
        return false;
    };

    for y in region.min.y..region.max.y {
        for x in region.min.x..region.max.x {
            if a.get(x - pos_a.x, y - pos_a.y) && b.get(x - pos_b.x, y - pos_b.y) {
                return true;
            }
        }
    }
    false
}

/// Test an entity against a placed silhouette
pub fn collides<E: Silhouetted>(entity: &E, sprites: &SpriteSet, other: Silhouette<'_>, pos: IVec2) -> bool {
    overlap(entity.silhouette(sprites), entity.origin(), other, pos)
}

/// Which boundary an entity crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Floor,
    Ceiling,
}

/// Floor/ceiling test on the unrounded y of a frame `frame_height` tall
pub fn out_of_bounds(y: f64, frame_height: u32, floor: i32) -> Option<Boundary> {
    if y + frame_height as f64 >= floor as f64 {
        Some(Boundary::Floor)
    } else if y < 0.0 {
        Some(Boundary::Ceiling)
    } else {
        None
    }
}
