mod simulation;

use clap::Parser;
use log::{info, warn};

use simulation::{Algorithm, SimWorld, SimulationClock};

#[derive(Parser)]
#[command(name = "roadsim")]
#[command(about = "Traffic routing and collision avoidance simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// Vehicles to spawn at startup
    #[arg(long, default_value = "12")]
    vehicles: usize,

    /// Spawn an extra vehicle every N ticks (0 disables)
    #[arg(long, default_value = "25")]
    spawn_every: u64,

    /// Routing algorithm: dijkstra or astar
    #[arg(long, default_value = "dijkstra")]
    algorithm: String,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Draw an ASCII map with each progress report
    #[arg(long)]
    map: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let algorithm: Algorithm = match cli.algorithm.parse() {
        Ok(algorithm) => algorithm,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(seed),
        None => SimWorld::new(),
    };
    world.create_network();

    for _ in 0..cli.vehicles {
        if let Err(err) = world.add_vehicle(algorithm) {
            warn!("failed to spawn vehicle: {:#}", err);
        }
    }

    println!("Initial state:");
    world.print_summary();
    if cli.map {
        world.draw_map();
    }
    println!();

    let mut clock = SimulationClock::new();
    clock.start();

    let report_every = (cli.ticks / 10).max(1);
    while clock.ticks() < cli.ticks {
        if !clock.step(&mut world) {
            break;
        }

        if cli.spawn_every > 0 && clock.ticks() % cli.spawn_every == 0 {
            if let Err(err) = world.add_vehicle(algorithm) {
                warn!("failed to spawn vehicle: {:#}", err);
            }
        }

        if clock.ticks() % report_every == 0 {
            println!("--- After tick {} ---", clock.ticks());
            world.print_summary();
            if cli.map {
                world.draw_map();
            }
            println!();
        }
    }
    clock.stop();

    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", clock.ticks());
    info!("Total vehicles spawned: {}", world.total_spawned());
    info!("Total trips completed: {}", world.total_reached());
    info!("Active vehicles: {}", world.vehicle_count());
    info!("Collisions prevented: {}", world.collisions_prevented());
    info!(
        "Success rate: {:.1}%",
        if world.total_spawned() > 0 {
            (world.total_reached() as f32 / world.total_spawned() as f32) * 100.0
        } else {
            0.0
        }
    );
}
