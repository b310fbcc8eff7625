//! Main simulation world that ties everything together
//!
//! Owns the road network, the active vehicle list, and the collision guard;
//! external render layers consume the public state between ticks.

use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::collision::CollisionGuard;
use super::road_graph::RoadGraph;
use super::types::{
    Algorithm, Region, VehicleId, FIELD_HEIGHT, FIELD_WIDTH, GRID_SIZE, NODE_SPACING,
    QUADTREE_CAPACITY, ROUNDABOUT_RADIUS, TRAFFIC_DECAY_CHANCE, VEHICLE_COLORS,
};
use super::vehicle::SimVehicle;

/// The main simulation world
pub struct SimWorld {
    /// Road network for routing; absent until `create_network` is called.
    pub graph: Option<RoadGraph>,

    /// Active vehicles in spawn order.
    pub vehicles: Vec<SimVehicle>,

    /// Collision mitigation pass and its intervention counter.
    guard: CollisionGuard,

    /// Next vehicle ID to assign
    next_vehicle_id: usize,

    /// Vehicles spawned over the session
    total_spawned: u64,

    /// Vehicles that completed their trip
    total_reached: u64,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: Option<StdRng>) -> Self {
        let bounds = Region::new(
            FIELD_WIDTH / 2.0,
            FIELD_HEIGHT / 2.0,
            FIELD_WIDTH / 2.0,
            FIELD_HEIGHT / 2.0,
        );
        Self {
            graph: None,
            vehicles: Vec::new(),
            guard: CollisionGuard::new(bounds, QUADTREE_CAPACITY),
            next_vehicle_id: 0,
            total_spawned: 0,
            total_reached: 0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn random_chance(&mut self, probability: f32) -> bool {
        self.random_range(0.0..1.0) < probability
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    /// Build the session road network: a grid of intersections plus
    /// roundabout sub-graphs at alternating interior crossings. Calling this
    /// again replaces the network and resets traffic.
    pub fn create_network(&mut self) {
        let mut graph = RoadGraph::new();

        let origin_x = FIELD_WIDTH / 2.0 - (GRID_SIZE as f32 - 1.0) * NODE_SPACING / 2.0;
        let origin_y = FIELD_HEIGHT / 2.0 - (GRID_SIZE as f32 - 1.0) * NODE_SPACING / 2.0;

        for i in 0..GRID_SIZE {
            for j in 0..GRID_SIZE {
                graph.add_node(
                    &grid_id(i, j),
                    origin_x + i as f32 * NODE_SPACING,
                    origin_y + j as f32 * NODE_SPACING,
                );
            }
        }

        // Bidirectional roads are modeled as two directed edges
        for i in 0..GRID_SIZE {
            for j in 0..GRID_SIZE {
                if i + 1 < GRID_SIZE {
                    graph.add_edge(&grid_id(i, j), &grid_id(i + 1, j), 1.0);
                    graph.add_edge(&grid_id(i + 1, j), &grid_id(i, j), 1.0);
                }
                if j + 1 < GRID_SIZE {
                    graph.add_edge(&grid_id(i, j), &grid_id(i, j + 1), 1.0);
                    graph.add_edge(&grid_id(i, j + 1), &grid_id(i, j), 1.0);
                }
            }
        }

        for i in (1..GRID_SIZE - 1).step_by(2) {
            for j in (1..GRID_SIZE - 1).step_by(2) {
                let center = grid_id(i, j);
                let Some((cx, cy)) = graph.node_position(&center) else {
                    continue;
                };

                let north = format!("{}-n", center);
                let east = format!("{}-e", center);
                let south = format!("{}-s", center);
                let west = format!("{}-w", center);

                graph.add_node(&north, cx, cy - ROUNDABOUT_RADIUS);
                graph.add_node(&east, cx + ROUNDABOUT_RADIUS, cy);
                graph.add_node(&south, cx, cy + ROUNDABOUT_RADIUS);
                graph.add_node(&west, cx - ROUNDABOUT_RADIUS, cy);

                // One-way ring, clockwise
                graph.add_edge(&north, &east, 1.0);
                graph.add_edge(&east, &south, 1.0);
                graph.add_edge(&south, &west, 1.0);
                graph.add_edge(&west, &north, 1.0);

                // Ramps to the four neighboring crossings
                graph.add_edge(&grid_id(i - 1, j), &west, 1.0);
                graph.add_edge(&west, &grid_id(i - 1, j), 1.0);
                graph.add_edge(&grid_id(i + 1, j), &east, 1.0);
                graph.add_edge(&east, &grid_id(i + 1, j), 1.0);
                graph.add_edge(&grid_id(i, j - 1), &north, 1.0);
                graph.add_edge(&north, &grid_id(i, j - 1), 1.0);
                graph.add_edge(&grid_id(i, j + 1), &south, 1.0);
                graph.add_edge(&south, &grid_id(i, j + 1), 1.0);
            }
        }

        info!(
            "road network created: {} intersections, {} road segments",
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = Some(graph);
    }

    /// Spawn a vehicle between two random distinct intersections.
    ///
    /// Fails when no road network exists yet; callers log and continue.
    pub fn add_vehicle(&mut self, algorithm: Algorithm) -> Result<VehicleId> {
        let node_ids: Vec<String> = self
            .graph
            .as_ref()
            .context("road network has not been created")?
            .node_ids()
            .map(str::to_string)
            .collect();
        if node_ids.len() < 2 {
            anyhow::bail!("road network needs at least two intersections");
        }

        let start = self
            .choose_random(&node_ids)
            .cloned()
            .context("road network has no intersections")?;
        let end = loop {
            let candidate = self
                .choose_random(&node_ids)
                .cloned()
                .context("road network has no intersections")?;
            if candidate != start {
                break candidate;
            }
        };

        let speed = self.random_range(1.0..2.5);
        let color = self
            .choose_random(&VEHICLE_COLORS)
            .copied()
            .unwrap_or(VEHICLE_COLORS[0]);

        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;

        let graph = self
            .graph
            .as_ref()
            .context("road network has not been created")?;
        let vehicle = SimVehicle::new(id, &start, &end, algorithm, speed, color, graph);
        if vehicle.path.is_empty() {
            debug!(
                "no route from {} to {}; vehicle {:?} will retire immediately",
                start, end, id
            );
        } else {
            debug!(
                "vehicle {:?} spawned: {} -> {} ({} nodes)",
                id,
                start,
                end,
                vehicle.path.len()
            );
        }
        self.vehicles.push(vehicle);
        self.total_spawned += 1;
        Ok(id)
    }

    /// Main simulation tick: advance vehicles, retire arrivals, run the
    /// collision pass, then occasionally decay traffic.
    pub fn tick(&mut self) {
        if let Some(graph) = &mut self.graph {
            for vehicle in &mut self.vehicles {
                vehicle.update(graph);
            }
        }

        let before = self.vehicles.len();
        self.vehicles.retain(|vehicle| !vehicle.reached);
        self.total_reached += (before - self.vehicles.len()) as u64;

        self.guard.mitigate(&mut self.vehicles);

        if self.graph.is_some() && self.random_chance(TRAFFIC_DECAY_CHANCE) {
            if let Some(graph) = &mut self.graph {
                graph.decrease_traffic();
            }
        }
    }

    /// Number of vehicles currently on the road
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Cumulative count of collision-avoidance interventions
    pub fn collisions_prevented(&self) -> u64 {
        self.guard.prevented_count()
    }

    /// Vehicles spawned over the session
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    /// Vehicles that completed their trip
    pub fn total_reached(&self) -> u64 {
        self.total_reached
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Traffic Simulation Summary ===");
        match &self.graph {
            Some(graph) => {
                let loaded = graph
                    .edge_records()
                    .filter(|(_, _, edge)| edge.traffic > 0.0)
                    .count();
                println!(
                    "Intersections: {}, Roads: {} ({} carrying traffic)",
                    graph.node_count(),
                    graph.edge_count(),
                    loaded
                );
            }
            None => println!("No road network"),
        }
        println!("Active vehicles: {}", self.vehicles.len());
        println!(
            "Trips completed: {} of {} spawned",
            self.total_reached, self.total_spawned
        );
        println!("Collisions prevented: {}", self.guard.prevented_count());
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        let Some(graph) = &self.graph else {
            println!("(no road network)");
            return;
        };

        // Find bounds of the network
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for node in graph.nodes() {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }
        if !min_x.is_finite() {
            println!("(empty road network)");
            return;
        }

        // Add padding
        min_x -= 10.0;
        max_x += 10.0;
        min_y -= 10.0;
        max_y += 10.0;

        let scale = 0.12;
        let width = ((max_x - min_x) * scale) as usize + 1;
        let height = ((max_y - min_y) * scale) as usize + 1;
        let mut cells = vec![vec![' '; width]; height];

        let to_cell = |x: f32, y: f32| -> (usize, usize) {
            let col = ((x - min_x) * scale) as usize;
            let row = ((y - min_y) * scale) as usize;
            (row.min(height - 1), col.min(width - 1))
        };

        // Draw roads
        for (from, to, edge) in graph.edge_records() {
            let (Some((x0, y0)), Some((x1, y1))) =
                (graph.node_position(from), graph.node_position(to))
            else {
                continue;
            };
            let road_char = if edge.traffic > 2.0 { '#' } else { '.' };

            let (start_row, start_col) = to_cell(x0, y0);
            let (end_row, end_col) = to_cell(x1, y1);

            // Simple line drawing (Bresenham-like)
            let dx = (end_col as i32 - start_col as i32).abs();
            let dy = (end_row as i32 - start_row as i32).abs();
            let sx = if start_col < end_col { 1 } else { -1 };
            let sy = if start_row < end_row { 1 } else { -1 };

            let mut err = dx - dy;
            let mut x = start_col as i32;
            let mut y = start_row as i32;

            loop {
                if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                    let (ux, uy) = (x as usize, y as usize);
                    if cells[uy][ux] == ' ' || cells[uy][ux] == '.' {
                        cells[uy][ux] = road_char;
                    }
                }

                if x == end_col as i32 && y == end_row as i32 {
                    break;
                }

                let e2 = 2 * err;
                if e2 > -dy {
                    err -= dy;
                    x += sx;
                }
                if e2 < dx {
                    err += dx;
                    y += sy;
                }
            }
        }

        // Draw intersections
        for node in graph.nodes() {
            let (row, col) = to_cell(node.x, node.y);
            cells[row][col] = '+';
        }

        // Draw vehicles
        for vehicle in &self.vehicles {
            let (row, col) = to_cell(vehicle.x, vehicle.y);
            if cells[row][col] != '+' {
                cells[row][col] = 'V';
            }
        }

        println!();
        println!("=== World Map ===");
        println!("Legend: + intersection, V vehicle, . road, # congested road");
        for row in &cells {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}

fn grid_id(i: usize, j: usize) -> String {
    format!("{}-{}", i, j)
}
