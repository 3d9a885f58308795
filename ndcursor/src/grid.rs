use crate::cursor::{Accessor, NdCursor};
use crate::range::NdRange;
use crate::space::{absolute_pos, Coord, Shape};
use ndarray::{ArrayBase, Data, IxDyn};
use tracing::debug;

quick_error! {
    #[derive(Debug, PartialEq)]
    pub enum GridError {
        SizeMismatch(cells: usize, len: usize) {
            display("shape has {} cells but storage holds {} values", cells, len)
        }
        DimensionMismatch(expected: usize, actual: usize) {
            display("expected a {}-dimensional array, got {} dimensions", expected, actual)
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

/// Accessor built from a closure. See `from_fn`.
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

pub fn from_fn<F, T, const D: usize>(f: F) -> FromFn<F>
where
    F: Fn(&Coord<D>) -> T,
{
    FromFn(f)
}

impl<F, T, const D: usize> Accessor<D> for FromFn<F>
where
    F: Fn(&Coord<D>) -> T,
{
    type Output = T;

    fn get(&self, coord: &Coord<D>) -> T {
        (self.0)(coord)
    }
}

/// Yields the coordinate itself; handy when only the traversal matters.
#[derive(Debug, Default, Copy, Clone)]
pub struct Indices;

impl<const D: usize> Accessor<D> for Indices {
    type Output = Coord<D>;

    fn get(&self, coord: &Coord<D>) -> Coord<D> {
        *coord
    }
}

/// Row-major view over a borrowed slice.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct GridView<'a, T, const D: usize> {
    #[derivative(Debug = "ignore")]
    data: &'a [T],
    shape: Shape<D>,
}

impl<'a, T, const D: usize> Clone for GridView<'a, T, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, const D: usize> Copy for GridView<'a, T, D> {}

impl<'a, T, const D: usize> GridView<'a, T, D> {
    pub fn new(data: &'a [T], shape: Shape<D>) -> Result<Self> {
        if shape.count() != data.len() {
            return Err(GridError::SizeMismatch(shape.count(), data.len()));
        }
        debug!(shape = %shape, "wrapping grid view");
        Ok(GridView { data, shape })
    }

    pub fn shape(&self) -> Shape<D> {
        self.shape
    }

    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Bounds-checked lookup.
    pub fn at(&self, coord: &Coord<D>) -> Option<&'a T> {
        let in_bounds = coord.0.iter().zip(self.shape.0.iter()).all(|(i, n)| i < n);
        if in_bounds {
            self.data.get(absolute_pos(&self.shape, coord))
        } else {
            None
        }
    }

    pub fn cursor(&self) -> NdCursor<Self, D> {
        NdCursor::new(self.shape, *self)
    }

    pub fn end(&self) -> NdCursor<Self, D> {
        NdCursor::end(self.shape, *self)
    }

    pub fn iter(&self) -> NdRange<Self, D> {
        self.cursor().range_to(self.end())
    }
}

impl<'a, T, const D: usize> Accessor<D> for GridView<'a, T, D> {
    type Output = &'a T;

    /// Panics when `coord` lies outside the view, like slice indexing.
    fn get(&self, coord: &Coord<D>) -> &'a T {
        &self.data[absolute_pos(&self.shape, coord)]
    }
}

impl<'a, T, const D: usize> IntoIterator for GridView<'a, T, D> {
    type Item = &'a T;
    type IntoIter = NdRange<Self, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'g, T, const D: usize> IntoIterator for &'g GridView<'a, T, D> {
    type Item = &'a T;
    type IntoIter = NdRange<GridView<'a, T, D>, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S, T, const D: usize> Accessor<D> for ArrayBase<S, IxDyn>
where
    S: Data<Elem = T>,
    T: Clone,
{
    type Output = T;

    fn get(&self, coord: &Coord<D>) -> T {
        self[&coord.0[..]].clone()
    }
}

/// Cursor at the first cell of a dynamic-dimension array.
pub fn array_cursor<S, const D: usize>(
    array: &ArrayBase<S, IxDyn>,
) -> Result<NdCursor<&ArrayBase<S, IxDyn>, D>>
where
    S: Data,
{
    if array.ndim() != D {
        return Err(GridError::DimensionMismatch(D, array.ndim()));
    }
    let mut extents = [0; D];
    extents.copy_from_slice(array.shape());
    Ok(NdCursor::new(Shape(extents), array))
}
