//! patrol — a dozen agents random-walking a walled grid under fog of war.
//!
//! Three kinds of agent share the map: scouts (radius 7, sees through one
//! obstruction), soldiers (radius 5) and workers (radius 3).  Every cycle
//! some agents step to a neighbouring tile, the vision system recomputes
//! the movers, and the coverage buffer is printed as ASCII:
//!
//! | Glyph | Tile                               |
//! |-------|------------------------------------|
//! | `@`   | agent                              |
//! | `#`   | visible wall                       |
//! | `R`   | visible resource                   |
//! | `B`   | visible building                   |
//! | `.`   | visible open ground                |
//! | `~`   | fogged                             |
//!
//! Set `RUST_LOG=debug` to see per-cycle engine logging.

use std::time::Instant;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use fow_core::{AgentId, GridSnapshot, Occupancy, ProfileId, Terrain, TileCoord, TileGrid};
use fow_spatial::ZoneGrid;
use fow_system::{CycleReport, VisionSystem, VisionSystemBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const WIDTH:       u32 = 48;
const HEIGHT:      u32 = 24;
const SEED:        u64 = 42;
const CYCLES:      u32 = 8;
const AGENT_COUNT: usize = 12;
const MOVE_CHANCE: f64 = 0.6;

/// (name, radius, see-through budget)
const KINDS: [(&str, u32, u32); 3] = [
    ("scout",   7, 1),
    ("soldier", 5, 0),
    ("worker",  3, 0),
];

// ── Map ───────────────────────────────────────────────────────────────────────

/// Outer wall, two inner wall runs with gaps, a resource field and a few
/// buildings.
fn build_map() -> Result<TileGrid> {
    let mut grid = TileGrid::new(WIDTH, HEIGHT)?;
    let (w, h) = (WIDTH as i32, HEIGHT as i32);

    for x in 0..w {
        grid.wall(TileCoord::new(x, 0));
        grid.wall(TileCoord::new(x, h - 1));
    }
    for y in 0..h {
        grid.wall(TileCoord::new(0, y));
        grid.wall(TileCoord::new(w - 1, y));
    }

    // Vertical run at x = 16 with a gap, horizontal run at y = 12 with two.
    for y in 1..h - 1 {
        if !(9..=11).contains(&y) {
            grid.wall(TileCoord::new(16, y));
        }
    }
    for x in 17..w - 1 {
        if !(24..=26).contains(&x) && !(38..=39).contains(&x) {
            grid.wall(TileCoord::new(x, 12));
        }
    }

    for (x, y) in [(5, 4), (6, 4), (5, 5), (6, 5), (7, 5), (6, 6)] {
        grid.set_occupancy(TileCoord::new(x, y), Occupancy::Resource);
    }
    for (x, y) in [(30, 5), (31, 5), (30, 6), (31, 6), (42, 18), (43, 18)] {
        grid.set_occupancy(TileCoord::new(x, y), Occupancy::Building);
    }
    Ok(grid)
}

fn random_open_tile(grid: &TileGrid, rng: &mut SmallRng) -> TileCoord {
    let dims = grid.dims();
    loop {
        let c = TileCoord::new(rng.gen_range(0..WIDTH as i32), rng.gen_range(0..HEIGHT as i32));
        if !grid.obstructs(dims.index_of(c)) {
            return c;
        }
    }
}

/// One random step (including diagonals) onto a non-obstructing tile, or
/// stay put.
fn step(grid: &TileGrid, from: TileCoord, rng: &mut SmallRng) -> TileCoord {
    let dims = grid.dims();
    let to = from.offset(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
    if dims.contains(to) && !grid.obstructs(dims.index_of(to)) { to } else { from }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render(grid: &TileGrid, vision: &VisionSystem<ZoneGrid>, agents: &[AgentId]) -> String {
    let dims = grid.dims();
    let positions: Vec<TileCoord> = agents
        .iter()
        .filter_map(|&a| vision.agent(a).map(|v| v.tile()))
        .collect();

    let mut out = String::with_capacity(dims.tile_count() + HEIGHT as usize);
    for y in 0..HEIGHT as i32 {
        for x in 0..WIDTH as i32 {
            let c = TileCoord::new(x, y);
            let idx = dims.index_of(c);
            let glyph = if positions.contains(&c) {
                '@'
            } else if !vision.coverage_of(idx).is_visible() {
                '~'
            } else if grid.terrain(idx) == Terrain::Wall {
                '#'
            } else {
                match grid.occupancy(idx) {
                    Occupancy::Resource => 'R',
                    Occupancy::Building => 'B',
                    _ => '.',
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn summary(cycle: u32, report: &CycleReport, vision: &VisionSystem<ZoneGrid>) -> String {
    let total = vision.dims().tile_count();
    let visible = vision.buffer().visible_count();
    format!(
        "cycle {cycle}: {} moved, {} retracted, {} merged, {} tiles flipped, {visible}/{total} visible ({:.1}%)",
        report.recomputed.len(),
        report.retracted.len(),
        report.affected.len(),
        report.changed.len(),
        100.0 * visible as f64 / total as f64,
    )
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== patrol — fog-of-war visibility ===");
    println!("Grid: {WIDTH}x{HEIGHT}  |  Agents: {AGENT_COUNT}  |  Cycles: {CYCLES}  |  Seed: {SEED}");
    println!();

    let grid = build_map()?;
    let dims = grid.dims();
    let mut rng = SmallRng::seed_from_u64(SEED);

    // 1. Vision system: one profile per agent kind, 6x3 zones.
    let mut builder = VisionSystemBuilder::new(dims, ZoneGrid::new(dims, 6, 3)?);
    for (_, radius, see_through) in KINDS {
        builder = builder.profile(radius, see_through);
    }
    let mut vision = builder.build()?;
    for (id, profile) in vision.profiles().iter() {
        let (name, _, _) = KINDS[id.index()];
        println!(
            "{name:<8} {id}: radius {}, see-through {}, {} rays, slot capacity {}",
            profile.radius(),
            profile.see_through(),
            profile.ray_deltas().len(),
            profile.capacity(),
        );
    }
    println!();

    // 2. Agents, kinds assigned round-robin.
    let mut agents: Vec<AgentId> = Vec::with_capacity(AGENT_COUNT);
    for i in 0..AGENT_COUNT {
        let profile = ProfileId((i % KINDS.len()) as u16);
        let tile = random_open_tile(&grid, &mut rng);
        agents.push(vision.register_agent(profile, tile)?);
    }

    // 3. Run.
    let t0 = Instant::now();
    for cycle in 1..=CYCLES {
        if cycle > 1 {
            for &agent in &agents {
                if !rng.gen_bool(MOVE_CHANCE) {
                    continue;
                }
                let Some(from) = vision.agent(agent).map(|a| a.tile()) else {
                    continue;
                };
                let to = step(&grid, from, &mut rng);
                if to != from {
                    vision.mark_dirty(agent, to)?;
                }
            }
        }

        // Halfway through, one scout leaves and a fresh worker arrives.
        if cycle == CYCLES / 2 {
            let leaving = agents.remove(0);
            vision.deregister_agent(leaving)?;
            let tile = random_open_tile(&grid, &mut rng);
            agents.push(vision.register_agent(ProfileId(2), tile)?);
            log::info!("{leaving} left; {} joined at {tile}", agents[agents.len() - 1]);
        }

        let report = vision.run_cycle(&grid)?;
        for (agent, err) in &report.failures {
            log::warn!("{agent}: {err}");
        }

        println!("{}", summary(cycle, &report, &vision));
        print!("{}", render(&grid, &vision, &agents));
        println!();
    }
    let elapsed = t0.elapsed();

    // 4. Final table.
    println!("Completed {} cycles in {:.3} ms", vision.cycles_run(), elapsed.as_secs_f64() * 1e3);
    println!();
    println!("{:<10} {:<8} {:<10} {:<6}", "Agent", "Kind", "Tile", "Sees");
    println!("{}", "-".repeat(36));
    for &agent in &agents {
        let Some(state) = vision.agent(agent) else {
            continue;
        };
        let (name, _, _) = KINDS[state.profile().index()];
        println!(
            "{:<10} {:<8} {:<10} {:<6}",
            agent.0,
            name,
            state.tile().to_string(),
            state.current_view().len(),
        );
    }

    Ok(())
}
