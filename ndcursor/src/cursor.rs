use crate::range::NdRange;
use crate::space::{absolute_pos, relative_pos, Coord, Shape};
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Maps a coordinate to an element. Storage layout is entirely up to the
/// implementor; the cursor only ever hands it the current coordinate.
pub trait Accessor<const D: usize> {
    type Output;

    fn get(&self, coord: &Coord<D>) -> Self::Output;
}

impl<'a, A, const D: usize> Accessor<D> for &'a A
where
    A: Accessor<D> + ?Sized,
{
    type Output = A::Output;

    fn get(&self, coord: &Coord<D>) -> Self::Output {
        (**self).get(coord)
    }
}

/// Random-access cursor over the cells of a `Shape`, in row-major order.
///
/// The cursor owns a copy of its shape and its current coordinate, and
/// delegates dereferencing to `A`. Valid positions run from `begin` up to the
/// end sentinel `{size[0], 0, ..}`; moving further than one step past the end
/// or below the beginning is not guarded.
#[derive(Derivative, Clone)]
#[derivative(Debug(bound = ""))]
pub struct NdCursor<A, const D: usize> {
    shape: Shape<D>,
    idx: Coord<D>,
    #[derivative(Debug = "ignore")]
    accessor: A,
}

impl<A, const D: usize> NdCursor<A, D> {
    pub fn new(shape: Shape<D>, accessor: A) -> Self {
        NdCursor::at(shape, Coord::default(), accessor)
    }

    pub fn at(shape: Shape<D>, coord: Coord<D>, accessor: A) -> Self {
        NdCursor {
            shape,
            idx: coord,
            accessor,
        }
    }

    pub fn end(shape: Shape<D>, accessor: A) -> Self {
        let coord = shape.end();
        NdCursor::at(shape, coord, accessor)
    }

    pub fn shape(&self) -> &Shape<D> {
        &self.shape
    }

    pub fn coord(&self) -> &Coord<D> {
        &self.idx
    }

    pub fn idx(&self, dim: usize) -> usize {
        self.idx.0[dim]
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub fn into_accessor(self) -> A {
        self.accessor
    }

    pub fn absolute_pos(&self) -> usize {
        absolute_pos(&self.shape, &self.idx)
    }

    /// Signed distance in cells. Only meaningful between cursors over the
    /// same shape.
    pub fn distance<B>(&self, other: &NdCursor<B, D>) -> isize {
        self.absolute_pos() as isize - other.absolute_pos() as isize
    }

    /// Steps to the next cell, carrying into outer dimensions. Dimension 0
    /// never carries, so the step after the last cell lands on the end
    /// sentinel.
    pub fn inc(&mut self) -> &mut Self {
        for dim in (0..D).rev() {
            self.idx.0[dim] += 1;
            if self.idx.0[dim] != self.shape.0[dim] || dim == 0 {
                break;
            }
            self.idx.0[dim] = 0;
        }
        self
    }

    /// Steps to the previous cell, borrowing from outer dimensions.
    /// Stepping back from the beginning wraps to the last cell.
    pub fn dec(&mut self) -> &mut Self {
        for dim in (0..D).rev() {
            if self.idx.0[dim] != 0 {
                self.idx.0[dim] -= 1;
                break;
            }
            self.idx.0[dim] = self.shape.0[dim].saturating_sub(1);
        }
        self
    }

    /// `+=`. A negative delta moves backwards.
    pub fn advance(&mut self, delta: isize) -> &mut Self {
        if delta < 0 {
            self.seek_back(delta.unsigned_abs());
        } else if delta > 0 {
            self.seek_forward(delta as usize);
        }
        self
    }

    /// `-=`. Moving back further than the current position stops at the
    /// first cell rather than wrapping.
    pub fn retreat(&mut self, delta: isize) -> &mut Self {
        if delta < 0 {
            self.seek_forward(delta.unsigned_abs());
        } else if delta > 0 {
            self.seek_back(delta as usize);
        }
        self
    }

    fn seek_forward(&mut self, steps: usize) {
        if self.shape.is_empty() {
            return;
        }
        let pos = self.absolute_pos() + steps;
        relative_pos(pos, &self.shape, &mut self.idx);
    }

    fn seek_back(&mut self, steps: usize) {
        if self.shape.is_empty() {
            return;
        }
        let pos = self.absolute_pos().saturating_sub(steps);
        relative_pos(pos, &self.shape, &mut self.idx);
    }

    /// Component-wise: true if any index or any extent is smaller than the
    /// other cursor's.
    fn precedes<B>(&self, other: &NdCursor<B, D>) -> bool {
        (0..D).any(|i| self.idx.0[i] < other.idx.0[i] || self.shape.0[i] < other.shape.0[i])
    }

    fn follows<B>(&self, other: &NdCursor<B, D>) -> bool {
        (0..D).any(|i| self.idx.0[i] > other.idx.0[i] || self.shape.0[i] > other.shape.0[i])
    }

    /// Half-open iteration from this cursor up to `end`.
    pub fn range_to(self, end: NdCursor<A, D>) -> NdRange<A, D> {
        NdRange::new(self, end)
    }
}

impl<A: Clone, const D: usize> NdCursor<A, D> {
    pub fn post_inc(&mut self) -> Self {
        let old = self.clone();
        self.inc();
        old
    }

    pub fn post_dec(&mut self) -> Self {
        let old = self.clone();
        self.dec();
        old
    }
}

impl<A: Accessor<D>, const D: usize> NdCursor<A, D> {
    pub fn get(&self) -> A::Output {
        self.accessor.get(&self.idx)
    }

    /// The element `n` cells away, without moving this cursor.
    pub fn at_offset(&self, n: isize) -> A::Output {
        let mut target = Coord::default();
        let pos = if n < 0 {
            self.absolute_pos().saturating_sub(n.unsigned_abs())
        } else {
            self.absolute_pos() + n as usize
        };
        if self.shape.is_empty() {
            target = self.idx;
        } else {
            relative_pos(pos, &self.shape, &mut target);
        }
        self.accessor.get(&target)
    }
}

impl<A, B, const D: usize> PartialEq<NdCursor<B, D>> for NdCursor<A, D> {
    fn eq(&self, other: &NdCursor<B, D>) -> bool {
        self.shape == other.shape && self.idx == other.idx
    }
}

impl<A, const D: usize> Eq for NdCursor<A, D> {}

/// Ordering is component-wise and existential, not lexicographic: `a < b`
/// holds when any dimension has a smaller index or a smaller extent. Both
/// `a < b` and `a > b` can hold at once, in which case `partial_cmp` gives
/// `None`.
///
/// # Caveat
///
/// The operators and `partial_cmp` can disagree: `a < b` may be true while
/// `a.partial_cmp(&b)` is `None`. Anything driven by `partial_cmp`, such as
/// `sort_by(|a, b| a.partial_cmp(b).unwrap())` or `Iterator::max_by`, does
/// not follow `<` and may panic or leave cursors unordered. Compare
/// `absolute_pos()` when a total order is needed.
impl<A, B, const D: usize> PartialOrd<NdCursor<B, D>> for NdCursor<A, D> {
    fn partial_cmp(&self, other: &NdCursor<B, D>) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.precedes(other), self.follows(other)) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            _ => None,
        }
    }

    fn lt(&self, other: &NdCursor<B, D>) -> bool {
        self.precedes(other)
    }

    fn gt(&self, other: &NdCursor<B, D>) -> bool {
        self.follows(other)
    }

    fn le(&self, other: &NdCursor<B, D>) -> bool {
        !self.follows(other)
    }

    fn ge(&self, other: &NdCursor<B, D>) -> bool {
        !self.precedes(other)
    }
}

impl<A, const D: usize> AddAssign<isize> for NdCursor<A, D> {
    fn add_assign(&mut self, delta: isize) {
        self.advance(delta);
    }
}

impl<A, const D: usize> SubAssign<isize> for NdCursor<A, D> {
    fn sub_assign(&mut self, delta: isize) {
        self.retreat(delta);
    }
}

impl<A, const D: usize> Add<isize> for NdCursor<A, D> {
    type Output = NdCursor<A, D>;

    fn add(mut self, delta: isize) -> Self::Output {
        self.advance(delta);
        self
    }
}

impl<'a, A: Clone, const D: usize> Add<isize> for &'a NdCursor<A, D> {
    type Output = NdCursor<A, D>;

    fn add(self, delta: isize) -> Self::Output {
        self.clone() + delta
    }
}

impl<A, const D: usize> Add<NdCursor<A, D>> for isize {
    type Output = NdCursor<A, D>;

    fn add(self, cursor: NdCursor<A, D>) -> Self::Output {
        cursor + self
    }
}

impl<'a, A: Clone, const D: usize> Add<&'a NdCursor<A, D>> for isize {
    type Output = NdCursor<A, D>;

    fn add(self, cursor: &'a NdCursor<A, D>) -> Self::Output {
        cursor + self
    }
}

impl<A, const D: usize> Sub<isize> for NdCursor<A, D> {
    type Output = NdCursor<A, D>;

    fn sub(mut self, delta: isize) -> Self::Output {
        self.retreat(delta);
        self
    }
}

impl<'a, A: Clone, const D: usize> Sub<isize> for &'a NdCursor<A, D> {
    type Output = NdCursor<A, D>;

    fn sub(self, delta: isize) -> Self::Output {
        self.clone() - delta
    }
}

impl<'a, 'b, A, B, const D: usize> Sub<&'b NdCursor<B, D>> for &'a NdCursor<A, D> {
    type Output = isize;

    fn sub(self, other: &'b NdCursor<B, D>) -> isize {
        self.distance(other)
    }
}
