use itertools::Itertools;
use ndcursor::{from_fn, relative_pos, Coord, Indices, NdCursor, Shape};

const SHAPES_2D: [[usize; 2]; 5] = [[1, 1], [2, 2], [2, 3], [5, 1], [1, 7]];
const SHAPES_3D: [[usize; 3]; 4] = [[2, 2, 2], [1, 4, 3], [3, 1, 2], [2, 5, 3]];

fn walk_to_end<const D: usize>(shape: Shape<D>) {
    let begin = NdCursor::new(shape, Indices);
    let end = NdCursor::end(shape, Indices);
    let mut it = begin.clone();
    let mut visited = vec![];
    for _ in 0..shape.count() {
        assert!(it != end, "reached end early on {}", shape);
        visited.push(*it.coord());
        it.inc();
    }
    assert_eq!(it, end, "shape {}", shape);
    assert_eq!(&end - &begin, shape.count() as isize);

    it.dec();
    assert_eq!(Some(it.coord()), visited.last());

    // positions visited in order are exactly 0..count
    let positions = visited.iter().map(|c| shape.position_of(c)).collect_vec();
    assert_eq!(positions, (0..shape.count()).collect_vec());
}

fn round_trip<const D: usize>(shape: Shape<D>) {
    for coord in shape.indices() {
        let mut out = Coord::default();
        relative_pos(shape.position_of(&coord), &shape, &mut out);
        assert_eq!(out, coord);
    }
}

fn walk_back_to_begin<const D: usize>(shape: Shape<D>) {
    let begin = NdCursor::new(shape, Indices);
    let mut it = NdCursor::end(shape, Indices);
    for _ in 0..shape.count() {
        it.dec();
    }
    assert_eq!(it, begin);
}

#[test]
fn full_walks() {
    for &s in SHAPES_2D.iter() {
        walk_to_end(Shape(s));
        walk_back_to_begin(Shape(s));
        round_trip(Shape(s));
    }
    for &s in SHAPES_3D.iter() {
        walk_to_end(Shape(s));
        walk_back_to_begin(Shape(s));
        round_trip(Shape(s));
    }
    walk_to_end(Shape([6]));
    walk_to_end(Shape([2, 1, 3, 2]));
}

#[test]
fn offset_agrees_with_repeated_steps() {
    let shape = Shape([3, 2, 4]);
    let begin = NdCursor::new(shape, Indices);
    let mut stepped = begin.clone();
    for n in 0..=shape.count() as isize {
        assert_eq!(&begin + n, stepped, "offset {}", n);
        assert_eq!(n + &begin, stepped);
        if n < shape.count() as isize {
            stepped.inc();
        }
    }
}

#[test]
fn indexing_is_offset_then_get() {
    let shape = Shape([3, 4]);
    let it = NdCursor::at(shape, Coord([1, 1]), from_fn(|c: &Coord<2>| c[0] * 100 + c[1]));
    for n in -5..7 {
        assert_eq!(it.at_offset(n), (&it + n).get());
    }
}

#[test]
fn distance_is_antisymmetric() {
    let shape = Shape([2, 3, 2]);
    let cursors = (0..=shape.count())
        .map(|p| NdCursor::at(shape, shape.coord_of(p), Indices))
        .collect_vec();
    for (a, b) in cursors.iter().tuple_combinations() {
        assert_eq!(a - b, -(b - a));
        assert_eq!((a - b) as i64, a.absolute_pos() as i64 - b.absolute_pos() as i64);
    }
}

#[test]
fn saturating_retreat() {
    let shape = Shape([2, 3]);
    let mut it = NdCursor::at(shape, Coord([0, 2]), Indices);
    assert_eq!(it.absolute_pos(), 2);
    it -= 10;
    assert_eq!(it.absolute_pos(), 0);
    assert_eq!(it.coord(), &Coord([0, 0]));

    let back = NdCursor::at(shape, Coord([1, 1]), Indices) + -50;
    assert_eq!(back.absolute_pos(), 0);
}

#[test]
fn single_dimension_scenario() {
    let begin = NdCursor::new(Shape([3]), from_fn(|c: &Coord<1>| c[0]));
    let it = &begin + 2;
    assert_eq!(it.coord(), &Coord([2]));
    assert_eq!(it.get(), 2);
}

#[test]
fn copies_do_not_alias() {
    let mut a = NdCursor::new(Shape([4, 4]), Indices);
    let b = a.clone();
    a += 5;
    assert_eq!(b.absolute_pos(), 0);
    assert_eq!(a.absolute_pos(), 5);
}

#[test]
fn ordering_follows_component_formula() {
    // Every pair of cursors over {2,5} and {5,2} at equal absolute position.
    let (s1, s2) = (Shape([2, 5]), Shape([5, 2]));
    for p in 0..10 {
        let a = NdCursor::at(s1, s1.coord_of(p), Indices);
        let b = NdCursor::at(s2, s2.coord_of(p), Indices);
        let lt = (0..2).any(|i| a.idx(i) < b.idx(i) || s1[i] < s2[i]);
        let gt = (0..2).any(|i| a.idx(i) > b.idx(i) || s1[i] > s2[i]);
        assert_eq!(a < b, lt);
        assert_eq!(a > b, gt);
        assert_eq!(a <= b, !gt);
        assert_eq!(a >= b, !lt);
        assert!(a != b);
    }
}
