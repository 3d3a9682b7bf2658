//! Collision categories and masks
//!
//! Every body belongs to exactly one category bit and carries a mask of the
//! categories it is willing to touch. Two bodies interact only when each one's
//! mask accepts the other's category.

use serde::{Deserialize, Serialize};

/// A set of collision category bits.
///
/// A body's own category is normally a single bit; masks are unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionCategory(pub u32);

impl CollisionCategory {
    /// Matches nothing. A body with this mask stops producing contacts.
    pub const NONE: Self = Self(0);

    /// Engine default category, never handed out to playfield bodies.
    pub const DEFAULT: Self = Self(1 << 0);

    /// Check if any bit is shared.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// True when exactly one bit is set.
    #[inline]
    pub fn is_single(self) -> bool {
        self.0.is_power_of_two()
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for CollisionCategory {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Category plus mask for one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: CollisionCategory,
    pub mask: CollisionCategory,
}

impl CollisionFilter {
    pub fn new(category: CollisionCategory, mask: CollisionCategory) -> Self {
        Self { category, mask }
    }

    /// Whether two filtered bodies may touch (checked in both directions)
    #[inline]
    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        self.mask.intersects(other.category) && other.mask.intersects(self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIN: CollisionCategory = CollisionCategory(1 << 1);
    const TOKEN: CollisionCategory = CollisionCategory(1 << 2);
    const BUCKET: CollisionCategory = CollisionCategory(1 << 3);

    #[test]
    fn test_filter_both_directions() {
        let token = CollisionFilter::new(TOKEN, TOKEN | PIN | BUCKET);
        // Pegs accept anything that names them, but only list tokens
        let peg = CollisionFilter::new(PIN, TOKEN);
        let other_peg = CollisionFilter::new(PIN, TOKEN);

        assert!(token.can_collide(&peg));
        assert!(peg.can_collide(&token));
        assert!(!peg.can_collide(&other_peg));
    }

    #[test]
    fn test_cleared_mask_stops_contacts() {
        let settled = CollisionFilter::new(TOKEN, CollisionCategory::NONE);
        let bucket = CollisionFilter::new(BUCKET, TOKEN);
        assert!(!settled.can_collide(&bucket));
        assert!(!bucket.can_collide(&settled));
    }

    #[test]
    fn test_single_bit() {
        assert!(PIN.is_single());
        assert!(!(PIN | TOKEN).is_single());
        assert!(!CollisionCategory::NONE.is_single());
        assert!((PIN | TOKEN).intersects(TOKEN));
        assert!(!(PIN | TOKEN).intersects(BUCKET));
    }
}
