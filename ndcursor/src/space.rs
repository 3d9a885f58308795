use itertools::Itertools;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Extent of every dimension of a rectangular index space.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Shape<const D: usize>(pub [usize; D]);

/// One cell of a `Shape`, outermost dimension first.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Coord<const D: usize>(pub [usize; D]);

impl<const D: usize> Shape<D> {
    pub fn new(extents: [usize; D]) -> Self {
        Shape(extents)
    }

    pub fn dims(&self) -> usize {
        D
    }

    /// Number of addressable cells, i.e. the absolute position of `end()`.
    pub fn count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.0.iter().product()
    }

    /// True when there is no cell to visit: some extent is zero, or there
    /// are no dimensions at all.
    pub fn is_empty(&self) -> bool {
        D == 0 || self.0.iter().any(|&extent| extent == 0)
    }

    pub fn begin(&self) -> Coord<D> {
        Coord::default()
    }

    /// The past-the-end coordinate: `{size[0], 0, ..}`.
    ///
    /// An empty shape has no cells, so its end collapses onto `begin()`.
    pub fn end(&self) -> Coord<D> {
        let mut coord = Coord::default();
        if !self.is_empty() {
            coord.0[0] = self.0[0];
        }
        coord
    }

    pub fn position_of(&self, coord: &Coord<D>) -> usize {
        absolute_pos(self, coord)
    }

    pub fn coord_of(&self, position: usize) -> Coord<D> {
        let mut coord = Coord::default();
        relative_pos(position, self, &mut coord);
        coord
    }
}

impl<const D: usize> Coord<D> {
    pub fn new(indices: [usize; D]) -> Self {
        Coord(indices)
    }
}

impl<const D: usize> Default for Coord<D> {
    fn default() -> Self {
        Coord([0; D])
    }
}

impl<const D: usize> From<[usize; D]> for Shape<D> {
    fn from(extents: [usize; D]) -> Self {
        Shape(extents)
    }
}

impl<const D: usize> From<[usize; D]> for Coord<D> {
    fn from(indices: [usize; D]) -> Self {
        Coord(indices)
    }
}

impl<const D: usize> Index<usize> for Shape<D> {
    type Output = usize;

    fn index(&self, dim: usize) -> &usize {
        &self.0[dim]
    }
}

impl<const D: usize> Index<usize> for Coord<D> {
    type Output = usize;

    fn index(&self, dim: usize) -> &usize {
        &self.0[dim]
    }
}

impl<const D: usize> IndexMut<usize> for Coord<D> {
    fn index_mut(&mut self, dim: usize) -> &mut usize {
        &mut self.0[dim]
    }
}

impl<const D: usize> fmt::Display for Shape<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("x"))
    }
}

impl<const D: usize> fmt::Display for Coord<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

/// Row-major linear offset of `coord` within `shape`; the last dimension
/// varies fastest.
///
/// Only meaningful when every `coord[i] < shape[i]`, or for the end
/// sentinel, which maps to `shape.count()`.
pub fn absolute_pos<const D: usize>(shape: &Shape<D>, coord: &Coord<D>) -> usize {
    shape
        .0
        .iter()
        .zip(coord.0.iter())
        .fold(0, |pos, (&extent, &idx)| pos * extent + idx)
}

/// Inverse of `absolute_pos`, written into `out`.
///
/// Dimension 0 absorbs whatever quotient is left, so `shape.count()` decodes
/// to the end sentinel. Zero extents decode to index 0 without consuming any
/// of the position.
pub fn relative_pos<const D: usize>(mut abs: usize, shape: &Shape<D>, out: &mut Coord<D>) {
    if D == 0 {
        return;
    }
    for dim in (1..D).rev() {
        let extent = shape.0[dim];
        if extent == 0 {
            out.0[dim] = 0;
            continue;
        }
        out.0[dim] = abs % extent;
        abs /= extent;
    }
    out.0[0] = abs;
}
