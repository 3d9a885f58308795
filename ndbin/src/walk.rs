use crate::settings::{Order, WalkError, WalkSettings};
use ndcursor::{Coord, Shape};
use std::io::Write;
use tracing::{debug, info_span};

/// Prints every `step`th cell of a `D`-dimensional shape, one per line.
/// Returns how many cells were printed. The configured shape must have
/// exactly `D` extents.
pub fn walk<W: Write, const D: usize>(
    settings: &WalkSettings,
    out: &mut W,
) -> Result<usize, WalkError> {
    if settings.shape.len() != D {
        return Err(WalkError::DimensionMismatch(D, settings.shape.len()));
    }
    let mut extents = [0; D];
    extents.copy_from_slice(&settings.shape);
    let shape = Shape(extents);
    let _span = info_span!("walk", shape = %shape, order = ?settings.order).entered();

    let cells = shape.indices();
    let visit: Box<dyn Iterator<Item = Coord<D>>> = match settings.order {
        Order::Forward => Box::new(cells.skip(settings.start).step_by(settings.step)),
        Order::Reverse => Box::new(cells.rev().skip(settings.start).step_by(settings.step)),
    };

    let mut visited = 0;
    for coord in visit {
        if settings.positions {
            writeln!(out, "{}\t{}", coord, shape.position_of(&coord))?;
        } else {
            writeln!(out, "{}", coord)?;
        }
        visited += 1;
    }
    out.flush()?;
    debug!(visited, total = shape.count(), "walk done");
    Ok(visited)
}

/// Picks the dimensionality from the configured shape.
pub fn run<W: Write>(settings: &WalkSettings, out: &mut W) -> Result<usize, WalkError> {
    let visited = match settings.shape.len() {
        1 => walk::<_, 1>(settings, out)?,
        2 => walk::<_, 2>(settings, out)?,
        3 => walk::<_, 3>(settings, out)?,
        4 => walk::<_, 4>(settings, out)?,
        n => return Err(WalkError::Dimensions(n)),
    };
    Ok(visited)
}
