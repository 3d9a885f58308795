use crate::cursor::{Accessor, NdCursor};
use crate::grid::Indices;
use crate::space::Shape;
use std::iter::FusedIterator;
use tracing::trace;

/// Half-open `[front, back)` walk between two cursors over the same shape.
#[derive(Derivative, Clone)]
#[derivative(Debug(bound = ""))]
pub struct NdRange<A, const D: usize> {
    front: NdCursor<A, D>,
    back: NdCursor<A, D>,
}

impl<A, const D: usize> NdRange<A, D> {
    pub fn new(front: NdCursor<A, D>, back: NdCursor<A, D>) -> Self {
        trace!(
            shape = %front.shape(),
            from = front.absolute_pos(),
            to = back.absolute_pos(),
            "new range"
        );
        NdRange { front, back }
    }

    pub fn front(&self) -> &NdCursor<A, D> {
        &self.front
    }

    pub fn back(&self) -> &NdCursor<A, D> {
        &self.back
    }

    fn remaining(&self) -> usize {
        self.back
            .absolute_pos()
            .saturating_sub(self.front.absolute_pos())
    }
}

impl<A: Accessor<D>, const D: usize> Iterator for NdRange<A, D> {
    type Item = A::Output;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        let val = self.front.get();
        self.front.inc();
        Some(val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let skip = n.min(self.remaining());
        self.front.advance(skip as isize);
        self.next()
    }
}

impl<A: Accessor<D>, const D: usize> DoubleEndedIterator for NdRange<A, D> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        self.back.dec();
        Some(self.back.get())
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        let skip = n.min(self.remaining());
        self.back.retreat(skip as isize);
        self.next_back()
    }
}

impl<A: Accessor<D>, const D: usize> ExactSizeIterator for NdRange<A, D> {}

impl<A: Accessor<D>, const D: usize> FusedIterator for NdRange<A, D> {}

impl<const D: usize> Shape<D> {
    /// Every coordinate of the shape, in row-major order.
    pub fn indices(&self) -> NdRange<Indices, D> {
        NdRange::new(NdCursor::new(*self, Indices), NdCursor::end(*self, Indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Coord;
    use itertools::{iproduct, Itertools};

    #[test]
    fn indices_match_nested_loops() {
        let shape = Shape([2, 3, 2]);
        let expected = iproduct!(0..2, 0..3, 0..2)
            .map(|(a, b, c)| Coord([a, b, c]))
            .collect_vec();
        assert_eq!(shape.indices().collect_vec(), expected);
        assert_eq!(shape.indices().len(), 12);
    }

    #[test]
    fn reversed() {
        let shape = Shape([2, 2]);
        assert_eq!(
            shape.indices().rev().collect_vec(),
            vec![Coord([1, 1]), Coord([1, 0]), Coord([0, 1]), Coord([0, 0])]
        );
    }

    #[test]
    fn both_ends_meet() {
        let mut range = Shape([3]).indices();
        assert_eq!(range.next(), Some(Coord([0])));
        assert_eq!(range.next_back(), Some(Coord([2])));
        assert_eq!(range.len(), 1);
        assert_eq!(range.next_back(), Some(Coord([1])));
        assert_eq!(range.next(), None);
        assert_eq!(range.next_back(), None);
    }

    #[test]
    fn nth_seeks() {
        let mut range = Shape([4, 5]).indices();
        assert_eq!(range.nth(7), Some(Coord([1, 2])));
        assert_eq!(range.len(), 12);
        assert_eq!(range.nth_back(1), Some(Coord([3, 3])));
        assert_eq!(range.nth(100), None);
        assert_eq!(range.next(), None);
    }

    #[test]
    fn step_by_uses_offsets() {
        let got = Shape([3, 3]).indices().step_by(4).collect_vec();
        assert_eq!(got, vec![Coord([0, 0]), Coord([1, 1]), Coord([2, 2])]);
    }

    #[test]
    fn empty_shape_yields_nothing() {
        assert_eq!(Shape([3, 0, 2]).indices().count(), 0);
        assert_eq!(Shape([0]).indices().next_back(), None);
    }

    #[test]
    fn sub_range() {
        let shape = Shape([2, 3]);
        let begin = NdCursor::new(shape, Indices) + 2;
        let end = NdCursor::end(shape, Indices) - 1;
        assert_eq!(
            begin.range_to(end).collect_vec(),
            vec![Coord([0, 2]), Coord([1, 0]), Coord([1, 1])]
        );
    }
}
