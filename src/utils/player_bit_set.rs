use std::fmt;
use std::ops::{BitAnd, BitOr};

/// A set of seat indices packed into a u16.
/// A table never has more than nine seats so this is plenty.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerBitSet {
    set: u16,
}

impl PlayerBitSet {
    /// Create a set with seats `0..players` enabled.
    pub fn new(players: usize) -> Self {
        let set = ((1u32 << players) - 1) as u16;
        Self { set }
    }
    pub fn count(&self) -> usize {
        self.set.count_ones() as usize
    }
    pub fn empty(&self) -> bool {
        self.set == 0
    }
    pub fn enable(&mut self, idx: usize) {
        self.set |= 1 << idx;
    }
    pub fn disable(&mut self, idx: usize) {
        self.set &= !(1 << idx);
    }
    pub fn get(&self, idx: usize) -> bool {
        (self.set & (1 << idx)) != 0
    }
    /// Is every seat in this set also in `other`?
    pub fn is_subset(&self, other: &PlayerBitSet) -> bool {
        self.set & other.set == self.set
    }
    pub fn ones(self) -> ActivePlayerBitSetIter {
        ActivePlayerBitSetIter { set: self.set }
    }
}

impl FromIterator<usize> for PlayerBitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut s = PlayerBitSet::default();
        for idx in iter {
            s.enable(idx);
        }
        s
    }
}

impl BitOr for PlayerBitSet {
    type Output = PlayerBitSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            set: self.set | rhs.set,
        }
    }
}

impl BitAnd for PlayerBitSet {
    type Output = PlayerBitSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            set: self.set & rhs.set,
        }
    }
}

impl fmt::Debug for PlayerBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}

pub struct ActivePlayerBitSetIter {
    set: u16,
}

impl Iterator for ActivePlayerBitSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.set == 0 {
            None
        } else {
            // Find the index of the first non-zero
            let idx = self.set.trailing_zeros() as usize;
            // Then set the first non-zero to zero
            self.set &= !(1 << idx);
            // Then emit the next one
            Some(idx)
        }
    }
}
