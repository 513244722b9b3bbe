use maquette::geom::point2;
use maquette::grid;
use maquette::{Side, WallSpec};

const GRID_SIZE: u32 = 200;
const TILE_SIZE: f64 = 0.5;

fn wall(start: (f64, f64), end: (f64, f64)) -> WallSpec {
    WallSpec {
        start: point2(start.0, start.1),
        end: point2(end.0, end.1),
        thickness: 0.2,
        height: 2.5,
        inner_material: "plaster".to_string(),
        outer_material: "plaster".to_string(),
        interior_side: Side::Front,
    }
}

#[test]
fn origin_maps_to_the_grid_center() {
    let (gx, gy) = grid::world_to_grid(point2(0.0, 0.0), GRID_SIZE, TILE_SIZE);
    assert_eq!((gx, gy), (100, 100));
}

#[test]
fn world_to_grid_rounds_to_the_nearest_intersection() {
    assert_eq!(
        grid::world_to_grid(point2(0.2, -0.2), GRID_SIZE, TILE_SIZE),
        (100, 100)
    );
    assert_eq!(
        grid::world_to_grid(point2(0.3, 0.0), GRID_SIZE, TILE_SIZE),
        (101, 100)
    );
    assert_eq!(
        grid::world_to_grid(point2(-0.3, 0.8), GRID_SIZE, TILE_SIZE),
        (99, 102)
    );
}

#[test]
fn grid_to_world_is_an_exact_inverse_for_forward_values() {
    for cell in [(0, 0), (100, 100), (37, 162), (200, 1)] {
        let world = grid::grid_to_world(cell, GRID_SIZE, TILE_SIZE);
        assert_eq!(grid::world_to_grid(world, GRID_SIZE, TILE_SIZE), cell);
    }
}

#[test]
fn wall_local_offset_measures_along_the_axis() {
    let w = wall((0.0, 0.0), (5.0, 0.0));
    assert_eq!(grid::wall_local_offset(&w, point2(2.5, 0.0), TILE_SIZE), 5.0);
    assert_eq!(grid::wall_local_offset(&w, point2(0.0, 0.0), TILE_SIZE), 0.0);
    // Off-axis points project onto the axis.
    assert_eq!(grid::wall_local_offset(&w, point2(2.5, 3.0), TILE_SIZE), 5.0);
}

#[test]
fn wall_local_round_trips_through_world_space() {
    let w = wall((1.0, 1.0), (4.0, 5.0));
    for offset in [0.0, 2.0, 7.5] {
        let world = grid::wall_local_to_world(&w, offset, TILE_SIZE);
        let back = grid::wall_local_offset(&w, world, TILE_SIZE);
        assert!((back - offset).abs() < 1e-9);
    }
}

#[test]
fn wall_length_is_reported_in_grid_units() {
    let w = wall((0.0, 0.0), (5.0, 0.0));
    assert_eq!(grid::wall_length_units(&w, TILE_SIZE), 10.0);

    let diagonal = wall((0.0, 0.0), (3.0, 4.0));
    assert_eq!(grid::wall_length_units(&diagonal, TILE_SIZE), 10.0);
}
