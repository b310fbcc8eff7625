//! Reactive collision mitigation over the spatial index
//!
//! A heuristic damping control, not hard exclusion: vehicles can still
//! overlap; the pass reduces closing speed.

use log::debug;

use super::quadtree::{QuadTree, SpatialPoint};
use super::types::{Region, MIN_SPEED, SAFETY_MARGIN, SAFE_DISTANCE, SPEED_DAMPING};
use super::vehicle::SimVehicle;

/// Per-tick collision mitigation pass with a cumulative intervention count.
pub struct CollisionGuard {
    bounds: Region,
    capacity: usize,
    prevented: u64,
}

impl CollisionGuard {
    pub fn new(bounds: Region, capacity: usize) -> Self {
        Self {
            bounds,
            capacity,
            prevented: 0,
        }
    }

    /// Cumulative count of speed interventions.
    pub fn prevented_count(&self) -> u64 {
        self.prevented
    }

    /// One mitigation pass: rebuild the index from live vehicles, then damp
    /// the speed of any vehicle with a neighbor inside the safety distance.
    /// The first close neighbor wins; remaining candidates are skipped.
    pub fn mitigate(&mut self, vehicles: &mut [SimVehicle]) {
        let mut index = QuadTree::new(self.bounds, self.capacity);
        for vehicle in vehicles.iter().filter(|v| !v.reached) {
            index.insert(SpatialPoint {
                bounds: vehicle.bounding_box(),
                x: vehicle.x,
                y: vehicle.y,
                vehicle: vehicle.id,
            });
        }

        for vehicle in vehicles.iter_mut() {
            if vehicle.reached {
                continue;
            }
            let bounds = vehicle.bounding_box();
            let range = Region::new(
                bounds.x,
                bounds.y,
                bounds.w + SAFETY_MARGIN,
                bounds.h + SAFETY_MARGIN,
            );
            for nearby in index.query(&range) {
                if nearby.vehicle == vehicle.id {
                    continue;
                }
                let dx = nearby.x - vehicle.x;
                let dy = nearby.y - vehicle.y;
                if (dx * dx + dy * dy).sqrt() < SAFE_DISTANCE {
                    vehicle.speed = (vehicle.speed * SPEED_DAMPING).max(MIN_SPEED);
                    self.prevented += 1;
                    debug!(
                        "vehicle {:?} slowed to {:.2} near vehicle {:?}",
                        vehicle.id, vehicle.speed, nearby.vehicle
                    );
                    break;
                }
            }
        }
    }
}
