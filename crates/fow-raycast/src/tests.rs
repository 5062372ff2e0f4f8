//! Unit tests for fow-raycast.
//!
//! All grids are built in code with `TileGrid`.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeSet;

    use fow_core::{GridSnapshot, TileCoord, TileGrid};

    use crate::{ObstructionSnapshot, RayWalker, ViewProfile};

    /// Visible coordinates from `origin` with a fully captured snapshot.
    pub fn view_of(grid: &TileGrid, origin: TileCoord, radius: u32, budget: u32) -> BTreeSet<(i32, i32)> {
        let profile = ViewProfile::new(radius, budget, 50).unwrap();
        let snap = ObstructionSnapshot::full(grid);
        let dims = grid.dims();
        RayWalker::new(&profile, &snap)
            .visible_tiles(origin)
            .into_iter()
            .map(|t| {
                let c = dims.coord_of(t).unwrap();
                (c.x, c.y)
            })
            .collect()
    }

    /// All in-grid coordinates within Euclidean distance `radius` of `origin`.
    pub fn disk(grid: &TileGrid, origin: TileCoord, radius: u32) -> BTreeSet<(i32, i32)> {
        let dims = grid.dims();
        let r = radius as i32;
        let mut out = BTreeSet::new();
        for y in origin.y - r..=origin.y + r {
            for x in origin.x - r..=origin.x + r {
                let c = TileCoord::new(x, y);
                if dims.contains(c) && c.distance_sq(origin) <= (r * r) as i64 {
                    out.insert((x, y));
                }
            }
        }
        out
    }
}

// ── ViewProfile ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod profile {
    use std::collections::HashSet;

    use crate::profile::{boundary_deltas, capacity_for};
    use crate::{MAX_VIEW_RADIUS, ProfileSet, RAY_TOLERANCE, RaycastError, ViewProfile};

    #[test]
    fn radius_three_deltas() {
        let deltas = boundary_deltas(3);
        assert_eq!(
            deltas,
            vec![
                (0, 3), (1, 3), (2, 2),
                (3, 0), (3, 1),
                (-1, 3), (-2, 2),
                (-3, 0), (-3, 1),
                (-3, -1), (-2, -2),
                (3, -1), (2, -2),
                (0, -3), (-1, -3),
                (1, -3),
            ]
        );
    }

    #[test]
    fn deltas_are_eightfold_symmetric() {
        for r in 1..=64 {
            let set: HashSet<(i32, i32)> = boundary_deltas(r).into_iter().collect();
            for &(x, y) in &set {
                for q in [(y, x), (-x, y), (x, -y), (-x, -y), (-y, x), (y, -x), (-y, -x)] {
                    assert!(set.contains(&q), "r={r}: {q:?} missing as reflection of ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn deltas_within_tolerance_circle() {
        for r in 1..=64u32 {
            let limit = (r as f32 + RAY_TOLERANCE).powi(2);
            for (x, y) in boundary_deltas(r) {
                assert!(((x * x + y * y) as f32) <= limit, "r={r}: ({x}, {y}) outside");
            }
        }
    }

    #[test]
    fn deltas_have_no_repeats() {
        for r in 1..=64 {
            let deltas = boundary_deltas(r);
            let set: HashSet<_> = deltas.iter().collect();
            assert_eq!(set.len(), deltas.len(), "r={r}");
        }
    }

    #[test]
    fn ray_count_grows_linearly() {
        for r in [4u32, 16, 64, 256] {
            let n = boundary_deltas(r).len();
            assert!(n <= 8 * r as usize, "r={r}: {n} rays");
            assert!(n >= 4 * r as usize, "r={r}: {n} rays");
        }
    }

    /// Lattice points in the closed disk of radius `r`.
    fn lattice_count(r: u32) -> usize {
        let r = r as i64;
        (-r..=r).map(|x| 2 * (r * r - x * x).isqrt() as usize + 1).sum()
    }

    #[test]
    fn capacity_bounds_disk_for_all_supported_radii() {
        for r in 1..=MAX_VIEW_RADIUS {
            let cap = capacity_for(r, 50);
            assert!(lattice_count(r) <= cap, "r={r}: {} > {cap}", lattice_count(r));
        }
    }

    #[test]
    fn capacity_formula() {
        assert_eq!(capacity_for(3, 50), 29 + 50); // ⌈28.27⌉
        assert_eq!(capacity_for(1, 0), 4);
        let p = ViewProfile::new(10, 2, 7).unwrap();
        assert_eq!(p.capacity(), 315 + 7);
        assert_eq!(p.see_through(), 2);
    }

    #[test]
    fn rejects_bad_radii() {
        assert_eq!(ViewProfile::new(0, 0, 50), Err(RaycastError::InvalidRadius(0)));
        assert!(matches!(
            ViewProfile::new(MAX_VIEW_RADIUS + 1, 0, 50),
            Err(RaycastError::RadiusTooLarge { .. })
        ));
    }

    #[test]
    fn profile_set_dedupes_pairs() {
        let mut set = ProfileSet::new();
        let a = set.insert(5, 0, 50).unwrap();
        let b = set.insert(7, 1, 50).unwrap();
        let c = set.insert(5, 0, 50).unwrap();
        let d = set.insert(5, 1, 50).unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_ne!(a, d);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(b).unwrap().radius(), 7);
        assert!(set.insert(0, 0, 50).is_err());
        assert_eq!(set.len(), 3, "failed insert must not register anything");
    }
}

// ── DDA ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dda {
    use fow_core::TileCoord;

    use crate::{round_tile, walk_line};

    fn line(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        walk_line(from.into(), to.into(), |c| {
            out.push((c.x, c.y));
            true
        });
        out
    }

    #[test]
    fn rounding_threshold_is_point_four() {
        assert_eq!(round_tile(3.0), 3);
        assert_eq!(round_tile(0.4), 0);
        assert_eq!(round_tile(2.25), 2);
        assert_eq!(round_tile(3.41), 4);
        assert_eq!(round_tile(3.5), 4);
        assert_eq!(round_tile(0.333_333_34), 0);
        assert_eq!(round_tile(5.666_666_5), 6);
    }

    #[test]
    fn vertical_and_horizontal() {
        assert_eq!(line((2, 2), (2, 5)), vec![(2, 3), (2, 4), (2, 5)]);
        assert_eq!(line((2, 2), (2, 0)), vec![(2, 1), (2, 0)]);
        assert_eq!(line((2, 2), (5, 2)), vec![(3, 2), (4, 2), (5, 2)]);
        assert_eq!(line((2, 2), (0, 2)), vec![(1, 2), (0, 2)]);
    }

    #[test]
    fn steep_line_uses_loose_rounding() {
        // x advances 1/3 per step: 5.33 → 5, 5.67 → 6, 6.0 → 6.
        assert_eq!(line((5, 5), (6, 8)), vec![(5, 6), (6, 7), (6, 8)]);
        // Mirrored: 4.67 → 5, 4.33 → 4, 4.0 → 4.
        assert_eq!(line((5, 5), (4, 8)), vec![(5, 6), (4, 7), (4, 8)]);
    }

    #[test]
    fn shallow_line() {
        // y advances 0.5 per step; 0.5 is above the 0.4 threshold.
        assert_eq!(line((0, 0), (4, 2)), vec![(1, 1), (2, 1), (3, 2), (4, 2)]);
    }

    #[test]
    fn zero_length_visits_nothing() {
        assert!(line((3, 3), (3, 3)).is_empty());
    }

    #[test]
    fn every_octant_steps_one_tile_and_ends_on_target() {
        let origin = (20, 20);
        for dx in -9..=9 {
            for dy in -9..=9 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let target = (origin.0 + dx, origin.1 + dy);
                let path = line(origin, target);
                assert_eq!(path.len(), dx.abs().max(dy.abs()) as usize, "{dx},{dy}");
                assert_eq!(*path.last().unwrap(), target, "{dx},{dy}");

                let mut prev = origin;
                for &p in &path {
                    assert!((p.0 - prev.0).abs() <= 1 && (p.1 - prev.1).abs() <= 1, "{dx},{dy}: jump {prev:?} → {p:?}");
                    prev = p;
                }
            }
        }
    }

    #[test]
    fn visitor_stops_walk() {
        let mut seen = Vec::new();
        walk_line(TileCoord::new(0, 0), TileCoord::new(6, 0), |c| {
            seen.push(c.x);
            c.x < 3
        });
        assert_eq!(seen, vec![1, 2, 3]);
    }
}

// ── ObstructionSnapshot ───────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use fow_core::{GridSnapshot, Occupancy, TileCoord, TileGrid};

    use crate::ObstructionSnapshot;

    #[test]
    fn captures_only_requested_square() {
        let mut grid = TileGrid::new(20, 20).unwrap();
        grid.wall(TileCoord::new(5, 5));
        let mut snap = ObstructionSnapshot::new(grid.dims());
        snap.capture(&grid, TileCoord::new(5, 5), 2);

        assert_eq!(snap.captured_count(), 25);
        assert!(snap.is_captured(TileCoord::new(3, 7)));
        assert!(!snap.is_captured(TileCoord::new(8, 5)));
        assert!(snap.obstructs(TileCoord::new(5, 5)));
        assert!(!snap.obstructs(TileCoord::new(4, 5)));
    }

    #[test]
    fn overlapping_captures_count_once_and_clamp() {
        let grid = TileGrid::new(10, 10).unwrap();
        let mut snap = ObstructionSnapshot::new(grid.dims());
        snap.capture(&grid, TileCoord::new(0, 0), 2); // clamped: 3x3
        assert_eq!(snap.captured_count(), 9);
        snap.capture(&grid, TileCoord::new(1, 1), 1); // already inside
        assert_eq!(snap.captured_count(), 9);
    }

    #[test]
    fn occupancy_blocks() {
        let mut grid = TileGrid::new(4, 1).unwrap();
        grid.set_occupancy(TileCoord::new(1, 0), Occupancy::Resource);
        grid.set_occupancy(TileCoord::new(2, 0), Occupancy::Unit);
        let snap = ObstructionSnapshot::full(&grid);
        assert_eq!(snap.captured_count(), 4);
        assert!(snap.obstructs(TileCoord::new(1, 0)));
        assert!(!snap.obstructs(TileCoord::new(2, 0)));
    }

    #[test]
    fn uncaptured_tiles_read_as_obstructing() {
        let grid = TileGrid::new(10, 10).unwrap();
        let mut snap = ObstructionSnapshot::new(grid.dims());
        snap.capture(&grid, TileCoord::new(1, 1), 1);

        assert!(!snap.obstructs(TileCoord::new(2, 2)));
        assert!(!snap.is_captured(TileCoord::new(7, 7)));
        assert!(snap.obstructs(TileCoord::new(7, 7)));
    }

    #[test]
    fn reset_forgets_captures_and_allows_reuse() {
        let mut grid = TileGrid::new(10, 10).unwrap();
        grid.wall(TileCoord::new(8, 8));
        let mut snap = ObstructionSnapshot::new(grid.dims());
        snap.capture(&grid, TileCoord::new(2, 2), 1);
        assert_eq!(snap.captured_count(), 9);

        snap.reset();
        assert_eq!(snap.captured_count(), 0);
        assert!(!snap.is_captured(TileCoord::new(2, 2)));

        snap.capture(&grid, TileCoord::new(8, 8), 1);
        assert_eq!(snap.captured_count(), 9);
        assert!(!snap.is_captured(TileCoord::new(2, 2)));
        assert!(snap.obstructs(TileCoord::new(8, 8)));
        assert!(!snap.obstructs(TileCoord::new(7, 8)));
    }
}

// ── RayWalker ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod walker {
    use fow_core::{GridSnapshot, TileCoord, TileGrid, TileIndex};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::helpers::{disk, view_of};
    use crate::{ObstructionSnapshot, RayWalker, RaycastError, ViewProfile};

    #[test]
    fn open_grid_radius_three_sees_29_tiles() {
        let grid = TileGrid::new(10, 10).unwrap();
        let origin = TileCoord::new(5, 5);
        let view = view_of(&grid, origin, 3, 0);
        assert_eq!(view.len(), 29);
        assert_eq!(view, disk(&grid, origin, 3));
    }

    #[test]
    fn open_grid_has_no_holes_anywhere() {
        for r in 1..=9 {
            for (w, h) in [(10, 10), (7, 12), (16, 5), (1, 1), (3, 3)] {
                let grid = TileGrid::new(w, h).unwrap();
                for y in 0..h as i32 {
                    for x in 0..w as i32 {
                        let origin = TileCoord::new(x, y);
                        assert_eq!(
                            view_of(&grid, origin, r, 0),
                            disk(&grid, origin, r),
                            "r={r} grid={w}x{h} origin={origin}",
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn large_radius_open_grid_matches_disk() {
        let grid = TileGrid::new(100, 100).unwrap();
        for r in [15, 24, 40] {
            let origin = TileCoord::new(50, 50);
            assert_eq!(view_of(&grid, origin, r, 0), disk(&grid, origin, r), "r={r}");
        }
    }

    #[test]
    fn wall_hides_tiles_behind_it() {
        let mut grid = TileGrid::new(10, 10).unwrap();
        grid.wall(TileCoord::new(5, 7));
        let view = view_of(&grid, TileCoord::new(5, 5), 3, 0);
        assert!(view.contains(&(5, 7)), "the wall itself is seen");
        assert!(!view.contains(&(5, 8)));
        assert!(!view.contains(&(5, 9)));
        assert_eq!(view.len(), 28);
    }

    #[test]
    fn see_through_budget_along_one_ray() {
        // Single row: the only ray that matters runs along +x.
        let mut grid = TileGrid::new(12, 1).unwrap();
        for x in [2, 4, 6] {
            grid.wall(TileCoord::new(x, 0));
        }
        let xs = |budget| -> Vec<i32> {
            view_of(&grid, TileCoord::new(0, 0), 8, budget).into_iter().map(|(x, _)| x).collect()
        };
        assert_eq!(xs(0), vec![0, 1, 2]);
        assert_eq!(xs(1), vec![0, 1, 2, 3, 4]);
        assert_eq!(xs(2), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(xs(3), vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn clear_tiles_after_see_through_do_not_stop_the_ray() {
        let mut grid = TileGrid::new(10, 1).unwrap();
        grid.wall(TileCoord::new(1, 0));
        let view = view_of(&grid, TileCoord::new(0, 0), 6, 1);
        let xs: Vec<i32> = view.into_iter().map(|(x, _)| x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn wall_columns_with_budgets() {
        let mut grid = TileGrid::new(16, 16).unwrap();
        for y in 0..16 {
            grid.wall(TileCoord::new(4, y));
            grid.wall(TileCoord::new(6, y));
        }
        let origin = TileCoord::new(2, 8);
        let max_x = |budget| view_of(&grid, origin, 7, budget).iter().map(|&(x, _)| x).max().unwrap();

        assert_eq!(max_x(0), 4);
        assert_eq!(max_x(1), 6);
        assert_eq!(max_x(2), 9);

        let view = view_of(&grid, origin, 7, 1);
        assert!(view.contains(&(4, 8)) && view.contains(&(5, 8)) && view.contains(&(6, 8)));
        assert!(!view.contains(&(7, 8)));
    }

    #[test]
    fn agent_in_corner_stays_in_grid() {
        let grid = TileGrid::new(6, 6).unwrap();
        let origin = TileCoord::new(0, 0);
        let view = view_of(&grid, origin, 4, 0);
        assert_eq!(view, disk(&grid, origin, 4));
        assert!(view.iter().all(|&(x, y)| (0..6).contains(&x) && (0..6).contains(&y)));
    }

    #[test]
    fn pack_pads_with_sentinel() {
        let grid = TileGrid::new(10, 10).unwrap();
        let profile = ViewProfile::new(1, 0, 50).unwrap();
        let snap = ObstructionSnapshot::full(&grid);
        let mut slot = vec![TileIndex(0); profile.capacity()];
        let n = RayWalker::new(&profile, &snap).fill_slot(TileCoord::new(0, 0), &mut slot).unwrap();

        // Corner agent, r=1: itself plus right and down neighbours.
        assert_eq!(n, 3);
        assert_eq!(&slot[..3], &[TileIndex(0), TileIndex(1), TileIndex(10)]);
        assert!(slot[3..].iter().all(|&t| t == TileIndex::INVALID));
    }

    #[test]
    fn undersized_slot_reports_capacity_exceeded() {
        let grid = TileGrid::new(10, 10).unwrap();
        // r=1 without padding: ⌈π⌉ = 4 slots for a 5-tile plus shape.
        let profile = ViewProfile::new(1, 0, 0).unwrap();
        let snap = ObstructionSnapshot::full(&grid);
        let mut slot = vec![TileIndex::INVALID; profile.capacity()];
        let err = RayWalker::new(&profile, &snap)
            .fill_slot(TileCoord::new(5, 5), &mut slot)
            .unwrap_err();
        assert_eq!(err, RaycastError::CapacityExceeded { needed: 5, capacity: 4 });
    }

    #[test]
    fn bounded_snapshot_is_enough() {
        let mut grid = TileGrid::new(64, 64).unwrap();
        grid.wall(TileCoord::new(33, 30));
        let profile = ViewProfile::new(6, 1, 50).unwrap();
        let origin = TileCoord::new(30, 30);

        let mut bounded = ObstructionSnapshot::new(grid.dims());
        bounded.capture(&grid, origin, profile.radius());
        let full = ObstructionSnapshot::full(&grid);

        assert_eq!(
            RayWalker::new(&profile, &bounded).visible_tiles(origin),
            RayWalker::new(&profile, &full).visible_tiles(origin),
        );
        assert!(bounded.captured_count() < full.captured_count());
    }

    #[test]
    fn random_grids_respect_view_invariants() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..40 {
            let (w, h) = (rng.gen_range(1..30u32), rng.gen_range(1..30u32));
            let mut grid = TileGrid::new(w, h).unwrap();
            for y in 0..h as i32 {
                for x in 0..w as i32 {
                    if rng.gen_bool(0.2) {
                        grid.wall(TileCoord::new(x, y));
                    }
                }
            }
            let origin = TileCoord::new(rng.gen_range(0..w as i32), rng.gen_range(0..h as i32));
            let r = rng.gen_range(1..10u32);

            let mut prev = view_of(&grid, origin, r, 0);
            let circle = disk(&grid, origin, r);
            assert!(prev.contains(&(origin.x, origin.y)), "origin always visible");
            assert!(prev.is_subset(&circle));

            for budget in 1..4 {
                let next = view_of(&grid, origin, r, budget);
                assert!(prev.is_subset(&next), "a larger budget never hides tiles");
                assert!(next.is_subset(&circle));
                prev = next;
            }
        }
    }

    #[test]
    fn tiles_are_ascending() {
        let grid = TileGrid::new(30, 30).unwrap();
        let profile = ViewProfile::new(8, 0, 50).unwrap();
        let snap = ObstructionSnapshot::full(&grid);
        let tiles = RayWalker::new(&profile, &snap).visible_tiles(TileCoord::new(12, 17));
        assert!(tiles.windows(2).all(|w| w[0] < w[1]));
        assert!(tiles.len() < grid.dims().tile_count());
    }
}
