//! Walks an agent through a walled map to a goal, printing each tick.
//!
//! Run with `cargo run --example walk_demo`; set `RUST_LOG=octonav=debug`
//! to watch cache refreshes and path commits.

use octonav::{FinePathfinder, GridWorld, NavConfig, Obstacle, Point, StepSimulator, World};

use octonav::geometry::Rect;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("octonav=info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();

    let mut world = GridWorld::new(Point::from_num(0.5, 0.5));
    // A wall across the direct route with a gap to the north, plus a rotated
    // bar the tile grid cannot see.
    world.block_tiles((6, -5), (6, 3));
    world.add_obstacle(Obstacle::rotated(
        "fallen tree",
        Rect::from_corners(Point::from_num(8.0, 4.75), Point::from_num(12.0, 5.25)),
        0.125,
    ));

    let config = NavConfig::default();
    let mut sim = StepSimulator::new(&config);
    let mut nav = FinePathfinder::new(config);
    let goal = Point::from_num(14.5, 0.5);
    nav.set_goals(&mut sim, &[goal], 1.0);

    for tick in 0..2000u32 {
        if nav.arrived(&world) {
            println!(
                "tick {tick}: arrived at {:?}, {:.2} from goal",
                world.position(),
                world.position().dist(goal)
            );
            return;
        }
        match nav.next_step(&world, &mut sim) {
            Some(dir) => {
                let next = sim.walk(&world, world.position(), dir);
                world.set_position(next);
                println!("tick {tick}: {dir:?} -> {next:?}");
            }
            None => println!("tick {tick}: searching..."),
        }
    }
    println!("gave up after 2000 ticks at {:?}", world.position());
}
