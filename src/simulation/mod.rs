//! Standalone traffic simulation module
//!
//! Contains the core routing and collision-avoidance logic. Everything here
//! runs headless; render layers consume the public state (graph snapshot
//! plus vehicle list) between ticks.

mod clock;
mod collision;
mod quadtree;
mod road_graph;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use clock::SimulationClock;
#[allow(unused_imports)]
pub use collision::CollisionGuard;
#[allow(unused_imports)]
pub use quadtree::{QuadTree, SpatialPoint};
#[allow(unused_imports)]
pub use road_graph::{RoadEdge, RoadGraph, RoadNode};
#[allow(unused_imports)]
pub use types::{
    Algorithm, Region, VehicleId, FIELD_HEIGHT, FIELD_WIDTH, GRID_SIZE, MIN_SPEED, NODE_SPACING,
    QUADTREE_CAPACITY, ROUNDABOUT_RADIUS, SAFETY_MARGIN, SAFE_DISTANCE, SPEED_DAMPING,
    TRAFFIC_CAP, TRAFFIC_DECAY, TRAFFIC_DECAY_CHANCE, TRAFFIC_WEIGHT, VEHICLE_COLORS,
    VEHICLE_HEIGHT, VEHICLE_WIDTH,
};
#[allow(unused_imports)]
pub use vehicle::SimVehicle;
pub use world::SimWorld;
