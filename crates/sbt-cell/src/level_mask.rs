//! Cell level mask.
//!
//! Only exotic cells coming from a decoded BoC can carry a non-zero mask.
//! Cells built locally are ordinary and inherit the OR of their children.

/// Three-bit mask of the levels a cell has distinct hashes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelMask(u8);

impl LevelMask {
    /// Create a mask, keeping the low three bits.
    #[inline]
    pub fn new(mask: u8) -> Self {
        LevelMask(mask & 0x07)
    }

    /// Raw mask value.
    #[inline]
    pub fn mask(&self) -> u8 {
        self.0
    }

    /// Position of the highest set bit plus one, or 0 for an empty mask.
    #[inline]
    pub fn level(&self) -> u8 {
        8 - self.0.leading_zeros() as u8
    }

    #[inline]
    pub fn union(self, other: LevelMask) -> Self {
        LevelMask(self.0 | other.0)
    }

    /// Drop the lowest level. Merkle cells hide one level of their children.
    #[inline]
    pub fn shift_right(self) -> Self {
        LevelMask(self.0 >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(LevelMask::new(0).level(), 0);
        assert_eq!(LevelMask::new(0b001).level(), 1);
        assert_eq!(LevelMask::new(0b010).level(), 2);
        assert_eq!(LevelMask::new(0b101).level(), 3);
    }

    #[test]
    fn test_new_truncates() {
        assert_eq!(LevelMask::new(0xff).mask(), 0b111);
    }

    #[test]
    fn test_union_and_shift() {
        let mask = LevelMask::new(0b001).union(LevelMask::new(0b100));
        assert_eq!(mask.mask(), 0b101);
        assert_eq!(mask.shift_right().mask(), 0b010);
    }
}
