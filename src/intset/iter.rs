use std::iter::FusedIterator;

use crate::intset::intset::IntSet;

pub struct IntSetIter<'a> {
    front: usize,
    back: usize,
    intset: &'a IntSet,
}

impl IntSet {
    /// Iterates the elements in ascending order.
    pub fn iter(&self) -> IntSetIter<'_> {
        IntSetIter {
            front: 0,
            back: self.len(),
            intset: self,
        }
    }
}

impl Iterator for IntSetIter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let value = self.intset.get(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for IntSetIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.intset.get(self.back))
    }
}

impl ExactSizeIterator for IntSetIter<'_> {}

impl FusedIterator for IntSetIter<'_> {}

impl<'a> IntoIterator for &'a IntSet {
    type Item = i64;
    type IntoIter = IntSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
