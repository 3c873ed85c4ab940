//! Stepped tile collision.
//!
//! Every frame each kinematic actor moves along x first, then along y. Per
//! axis the displacement `velocity * dt` is added to the axis remainder; the
//! whole-pixel part (rounded half to even) is taken out and walked one pixel
//! at a time:
//!
//! 1. Find the tile under the box centre and gather the non-empty cells of
//!    the neighbours facing the direction of travel (see
//!    [`neighbor_offsets`]).
//! 2. Shift the box one pixel along the axis and keep the cells that
//!    strictly overlap the shifted box. Any hit raises `on_wall` (x axis) or
//!    `on_floor` (y axis, moving down only).
//! 3. Hand the hits to the actor's [`CollisionResponse`], even when there
//!    are none. If it answers `true` the axis stops for this frame. Otherwise
//!    the flag is cleared and the box moves one pixel.
//!
//! The octant is taken from the velocity signs at the start of the frame.
//! The y displacement reads the velocity after the x pass, which a door
//! contact may have changed. An actor that moved is relocated in the
//! [`SpatialIndex`].

use arrayvec::ArrayVec;
use bevy_ecs::component::Mutable;
use bevy_ecs::prelude::*;
use glam::{IVec2, Vec2};
use log::warn;
use smallvec::SmallVec;

use crate::components::actor::Actor;
use crate::components::boxcollider::BoxCollider;
use crate::components::kinematic::{Axis, CollisionResponse, Contact, Kinematic};
use crate::components::rigidbody::RigidBody;
use crate::geometry::Rect;
use crate::resources::quadtree::SpatialIndex;
use crate::resources::tilegrid::{TileCell, TileGrid};
use crate::resources::worldtime::WorldTime;

const TL: IVec2 = IVec2::new(-1, -1);
const TT: IVec2 = IVec2::new(0, -1);
const TR: IVec2 = IVec2::new(1, -1);
const ML: IVec2 = IVec2::new(-1, 0);
const MR: IVec2 = IVec2::new(1, 0);
const BL: IVec2 = IVec2::new(-1, 1);
const BM: IVec2 = IVec2::new(0, 1);
const BR: IVec2 = IVec2::new(1, 1);

/// Neighbour tiles probed for a travel direction (signs per axis).
pub fn neighbor_offsets(direction: IVec2) -> &'static [IVec2] {
    match (direction.x, direction.y) {
        (0, -1) => &[TL, TT, TR],
        (1, -1) => &[TL, TT, TR, MR, BR],
        (1, 0) => &[TR, MR, BR],
        (1, 1) => &[BL, BM, BR, MR, TR],
        (0, 1) => &[BL, BM, BR],
        (-1, 1) => &[TL, ML, BL, BM, BR],
        (-1, 0) => &[TL, ML, BL],
        (-1, -1) => &[BL, ML, TL, TT, TR],
        _ => &[],
    }
}

/// Non-empty candidate cells around the centre of `bounds`. Indices are
/// clamped into the grid and each cell is returned once.
pub fn sample_cells<'g>(grid: &'g TileGrid, bounds: &Rect, direction: IVec2) -> ArrayVec<&'g TileCell, 5> {
    let center = grid.local_tile_of(bounds.center_x(), bounds.center_y());
    let mut indices: ArrayVec<usize, 5> = ArrayVec::new();
    for offset in neighbor_offsets(direction) {
        let tile = center + *offset;
        if let Some(index) = grid.clamped_index(tile.x, tile.y) {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }
    indices.iter().filter_map(|i| grid.cell_at(*i)).collect()
}

fn sign(v: f32) -> i32 {
    if v < 0.0 {
        -1
    } else if v > 0.0 {
        1
    } else {
        0
    }
}

/// Add `displacement` to `remainder` and take out its whole pixels.
fn take_whole_pixels(remainder: &mut f32, displacement: f32) -> u32 {
    *remainder += displacement;
    let whole = remainder.round_ties_even();
    *remainder -= whole;
    whole.abs() as u32
}

/// Move `bounds` by one frame of `velocity`, resolving collisions against
/// `grid`. Returns whether the box moved at all.
pub fn move_and_collide<R>(
    grid: &TileGrid,
    bounds: &mut Rect,
    velocity: &mut Vec2,
    kinematic: &mut Kinematic,
    responder: &mut R,
    dt: f32,
) -> bool
where
    R: CollisionResponse + ?Sized,
{
    let direction = IVec2::new(sign(velocity.x), sign(velocity.y));
    let mut moved = false;

    if direction.x != 0 {
        let steps = take_whole_pixels(&mut kinematic.remainder.x, velocity.x * dt);
        moved |= walk_axis(grid, Axis::X, direction, steps, bounds, velocity, kinematic, responder);
    }
    if direction.y != 0 {
        let steps = take_whole_pixels(&mut kinematic.remainder.y, velocity.y * dt);
        moved |= walk_axis(grid, Axis::Y, direction, steps, bounds, velocity, kinematic, responder);
    }

    moved
}

#[allow(clippy::too_many_arguments)]
fn walk_axis<R>(
    grid: &TileGrid,
    axis: Axis,
    direction: IVec2,
    steps: u32,
    bounds: &mut Rect,
    velocity: &mut Vec2,
    kinematic: &mut Kinematic,
    responder: &mut R,
) -> bool
where
    R: CollisionResponse + ?Sized,
{
    let (dx, dy) = match axis {
        Axis::X => (direction.x as f32, 0.0),
        Axis::Y => (0.0, direction.y as f32),
    };
    let mut moved = false;

    for _ in 0..steps {
        let candidates = sample_cells(grid, bounds, direction);
        let probe = bounds.translated(dx, dy);
        let hits: SmallVec<[&TileCell; 5]> = candidates
            .iter()
            .copied()
            .filter(|cell| cell.rect().overlaps(&probe))
            .collect();

        if !hits.is_empty() {
            match axis {
                Axis::X => kinematic.on_wall = true,
                Axis::Y if direction.y > 0 => kinematic.on_floor = true,
                Axis::Y => {}
            }
        }

        let mut contact = Contact {
            axis,
            cells: &hits,
            bounds: *bounds,
            velocity: &mut *velocity,
        };
        if responder.on_collide(&mut contact) {
            break;
        }

        match axis {
            Axis::X => kinematic.on_wall = false,
            Axis::Y => kinematic.on_floor = false,
        }
        *bounds = probe;
        moved = true;
    }

    moved
}

/// Run the mover for every actor carrying the collision response `T`.
pub fn kinematic_system<T>(
    mut query: Query<(
        Entity,
        &Actor,
        &mut BoxCollider,
        &mut RigidBody,
        &mut Kinematic,
        &mut T,
    )>,
    grid: Res<TileGrid>,
    mut index: ResMut<SpatialIndex>,
    time: Res<WorldTime>,
) where
    T: Component<Mutability = Mutable> + CollisionResponse,
{
    for (entity, actor, mut collider, mut body, mut kinematic, mut responder) in query.iter_mut() {
        let moved = move_and_collide(
            &grid,
            &mut collider.bounds,
            &mut body.velocity,
            &mut kinematic,
            &mut *responder,
            time.delta,
        );
        if moved && !index.relocate(entity, collider.bounds) {
            warn!("{} #{} moved but is not in the spatial index", actor.kind, actor.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::kinematic::SolidBody;
    use crate::resources::tilegrid::TileCategory;

    /// Stops on every hit.
    struct Wall;

    impl CollisionResponse for Wall {
        fn on_collide(&mut self, contact: &mut Contact<'_>) -> bool {
            !contact.cells.is_empty()
        }
    }

    /// Never stops; counts the calls.
    struct Ghost(usize);

    impl CollisionResponse for Ghost {
        fn on_collide(&mut self, _contact: &mut Contact<'_>) -> bool {
            self.0 += 1;
            false
        }
    }

    fn grid(lines: &[&str]) -> TileGrid {
        let rows: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        TileGrid::from_rows("test", IVec2::ZERO, &rows, &[]).unwrap()
    }

    fn open_field() -> TileGrid {
        let row = ".".repeat(64);
        let rows: Vec<&str> = std::iter::repeat_n(row.as_str(), 64).collect();
        grid(&rows)
    }

    #[test]
    fn test_octant_table() {
        assert!(neighbor_offsets(IVec2::ZERO).is_empty());
        assert_eq!(neighbor_offsets(IVec2::new(1, 0)), &[TR, MR, BR]);
        assert_eq!(neighbor_offsets(IVec2::new(-1, -1)), &[BL, ML, TL, TT, TR]);
        for x in -1..=1 {
            for y in -1..=1 {
                let n = neighbor_offsets(IVec2::new(x, y)).len();
                let expected = match (x, y) {
                    (0, 0) => 0,
                    (0, _) | (_, 0) => 3,
                    _ => 5,
                };
                assert_eq!(n, expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_sampling_clamps_and_dedupes() {
        let g = grid(&["#.", "#."]);
        // Box near the left edge: the left column clamps onto column 0.
        let cells = sample_cells(&g, &Rect::new(0.0, 0.0, 6.0, 6.0), IVec2::new(-1, 0));
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.category == TileCategory::Solid));
    }

    #[test]
    fn test_remainder_is_conserved_in_open_field() {
        let g = open_field();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..20 {
            let velocity = Vec2::new(rng.f32() * 0.4 - 0.2, rng.f32() * 0.4 - 0.2);
            let mut v = velocity;
            let start = Rect::new(480.0, 480.0, 6.0, 31.0);
            let mut bounds = start;
            let mut k = Kinematic::new();
            let mut expected = Vec2::ZERO;
            for _ in 0..200 {
                let dt = 1.0 + rng.f32() * 32.0;
                expected += velocity * dt;
                move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut Ghost(0), dt);
            }
            let travelled = bounds.position() - start.position() + k.remainder;
            assert!((travelled - expected).abs().max_element() < 0.05, "{travelled} vs {expected}");
            assert!(k.remainder.abs().max_element() <= 0.5);
        }
    }

    #[test]
    fn test_zero_pixel_frames_accumulate() {
        let g = open_field();
        let mut bounds = Rect::new(100.0, 100.0, 6.0, 31.0);
        let mut v = Vec2::new(0.01, 0.0);
        let mut k = Kinematic::new();
        for _ in 0..3 {
            assert!(!move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut Ghost(0), 16.0));
        }
        assert_eq!(bounds.x, 100.0);
        assert!(move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut Ghost(0), 16.0));
        assert_eq!(bounds.x, 101.0);
    }

    #[test]
    fn test_stops_flush_against_wall() {
        let g = grid(&[
            "..........#",
            "..........#",
            "..........#",
            "..........#",
        ]);
        let wall = Rect::new(160.0, 0.0, 16.0, 64.0);
        let mut bounds = Rect::new(130.0, 16.0, 6.0, 31.0);
        let mut v = Vec2::new(0.09, 0.0);
        let mut k = Kinematic::new();
        for _ in 0..40 {
            move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut Wall, 16.0);
            assert!(!bounds.overlaps(&wall));
        }
        assert_eq!(bounds.right(), 160.0);
        assert!(k.on_wall);

        v.x = -0.09;
        move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut Wall, 16.0);
        assert!(!k.on_wall);
        assert!(bounds.right() < 160.0);
    }

    #[test]
    fn test_response_is_asked_every_step() {
        let g = open_field();
        let mut bounds = Rect::new(100.0, 100.0, 6.0, 31.0);
        let mut v = Vec2::new(0.25, 0.0);
        let mut k = Kinematic::new();
        let mut ghost = Ghost(0);
        move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut ghost, 16.0);
        assert_eq!(ghost.0, 4);
        assert_eq!(bounds.x, 104.0);
    }

    #[test]
    fn test_lands_on_floor() {
        let g = grid(&["....", "....", "....", "####"]);
        let mut bounds = Rect::new(20.0, 0.0, 6.0, 31.0);
        let mut v = Vec2::new(0.0, 0.27);
        let mut k = Kinematic::new();
        let mut body = SolidBody {
            gravity: 0.0,
            max_fall: 0.27,
        };
        for _ in 0..10 {
            move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut body, 16.0);
        }
        assert_eq!(bounds.bottom(), 48.0);
        assert!(k.on_floor);
    }

    #[test]
    fn test_thin_platform_is_one_way() {
        let g = grid(&["....", "....", "====", "...."]);
        let mut body = SolidBody {
            gravity: 0.0,
            max_fall: 0.27,
        };

        let mut bounds = Rect::new(20.0, 0.0, 6.0, 31.0);
        let mut v = Vec2::new(0.0, 0.1);
        let mut k = Kinematic::new();
        for _ in 0..20 {
            move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut body, 16.0);
        }
        assert_eq!(bounds.bottom(), 32.0);
        assert!(k.on_floor);

        // Rising through from below is never blocked.
        let mut bounds = Rect::new(20.0, 40.0, 6.0, 20.0);
        let mut v = Vec2::new(0.0, -0.1);
        let mut k = Kinematic::new();
        for _ in 0..20 {
            move_and_collide(&g, &mut bounds, &mut v, &mut k, &mut body, 16.0);
        }
        assert!(bounds.y < 32.0);
    }
}
