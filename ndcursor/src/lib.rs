#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate derivative;

pub mod cursor;
pub mod grid;
pub mod range;
pub mod space;

pub use cursor::{Accessor, NdCursor};
pub use grid::{array_cursor, from_fn, FromFn, GridError, GridView, Indices};
pub use range::NdRange;
pub use space::{absolute_pos, relative_pos, Coord, Shape};
