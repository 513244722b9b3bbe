//! Pure coordinate conversions between world space, the uniform placement grid, and
//! host-local frames (a wall's axis running from its start to its end point).

use maquette_scene::geom::{Point2, point2};
use maquette_scene::node::WallSpec;

/// Snaps a world-space position to the nearest tile intersection of a `grid_size` x
/// `grid_size` grid centered on the origin.
pub fn world_to_grid(world: Point2, grid_size: u32, tile_size: f64) -> (i32, i32) {
    let half_extent = f64::from(grid_size) * tile_size / 2.0;
    let gx = ((world.x + half_extent) / tile_size).round() as i32;
    let gy = ((world.y + half_extent) / tile_size).round() as i32;
    (gx, gy)
}

/// Inverse of `world_to_grid`; exact for values the forward function produces.
pub fn grid_to_world(cell: (i32, i32), grid_size: u32, tile_size: f64) -> Point2 {
    let half_extent = f64::from(grid_size) * tile_size / 2.0;
    point2(
        f64::from(cell.0) * tile_size - half_extent,
        f64::from(cell.1) * tile_size - half_extent,
    )
}

/// Projects a point in the wall's parent frame onto the wall axis, returning the distance from
/// `start` in grid units. Hosted children store this value, so resizing the host does not
/// rewrite them.
pub fn wall_local_offset(wall: &WallSpec, point: Point2, tile_size: f64) -> f64 {
    let axis = wall.axis();
    let d = point - wall.start;
    (d.x * axis.x + d.y * axis.y) / tile_size
}

/// Maps a host-local offset (grid units along the wall axis) back to the wall's parent frame.
pub fn wall_local_to_world(wall: &WallSpec, offset_units: f64, tile_size: f64) -> Point2 {
    let axis = wall.axis();
    wall.start + axis * (offset_units * tile_size)
}

/// Host length in grid units, the unit the placement validator operates in.
pub fn wall_length_units(wall: &WallSpec, tile_size: f64) -> f64 {
    wall.length() / tile_size
}
