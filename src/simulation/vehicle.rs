//! Vehicle movement along a planned route
//!
//! Routes are planned once at spawn and deliberately not replanned as
//! traffic shifts.

use super::road_graph::RoadGraph;
use super::types::{Algorithm, Region, VehicleId, VEHICLE_HEIGHT, VEHICLE_WIDTH};

/// A vehicle bound to a precomputed route through the road network.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub start_node: String,
    pub end_node: String,
    pub algorithm: Algorithm,
    /// Node ids from start to destination; empty when no route exists.
    pub path: Vec<String>,
    pub path_index: usize,
    pub x: f32,
    pub y: f32,
    /// Heading in radians, updated from the direction of travel.
    pub angle: f32,
    pub speed: f32,
    pub reached: bool,
    /// Render color, assigned at spawn.
    pub color: &'static str,
}

impl SimVehicle {
    pub fn new(
        id: VehicleId,
        start_node: &str,
        end_node: &str,
        algorithm: Algorithm,
        speed: f32,
        color: &'static str,
        graph: &RoadGraph,
    ) -> Self {
        let path = match algorithm {
            Algorithm::Dijkstra => graph.dijkstra(start_node, end_node),
            Algorithm::AStar => graph.a_star(start_node, end_node),
        }
        .unwrap_or_default();

        let (x, y) = graph.node_position(start_node).unwrap_or((0.0, 0.0));

        Self {
            id,
            start_node: start_node.to_string(),
            end_node: end_node.to_string(),
            algorithm,
            path,
            path_index: 0,
            x,
            y,
            angle: 0.0,
            speed,
            reached: false,
            color,
        }
    }

    /// Advances along the route by one tick.
    ///
    /// Retires the vehicle when the route is empty or fully consumed. When a
    /// node is crossed, one unit of traffic is reported on the traversed
    /// edge.
    pub fn update(&mut self, graph: &mut RoadGraph) {
        if self.reached {
            return;
        }
        if self.path.is_empty() || self.path_index >= self.path.len() - 1 {
            self.reached = true;
            return;
        }

        let Some((next_x, next_y)) = graph.node_position(&self.path[self.path_index + 1]) else {
            self.reached = true;
            return;
        };

        let dx = next_x - self.x;
        let dy = next_y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        self.angle = dy.atan2(dx);

        if distance < self.speed {
            self.x = next_x;
            self.y = next_y;
            graph.update_traffic(
                &self.path[self.path_index],
                &self.path[self.path_index + 1],
                1.0,
            );
            self.path_index += 1;
        } else {
            self.x += dx / distance * self.speed;
            self.y += dy / distance * self.speed;
        }
    }

    /// Axis-aligned extent of the vehicle's rotated footprint, used as the
    /// proximity-query shape.
    pub fn bounding_box(&self) -> Region {
        let (sin, cos) = self.angle.sin_cos();
        let half_w = VEHICLE_WIDTH / 2.0;
        let half_h = VEHICLE_HEIGHT / 2.0;

        let corners = [
            (-half_w, -half_h),
            (half_w, -half_h),
            (half_w, half_h),
            (-half_w, half_h),
        ];

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for (cx, cy) in corners {
            let px = self.x + cos * cx - sin * cy;
            let py = self.y + sin * cx + cos * cy;
            min_x = min_x.min(px);
            min_y = min_y.min(py);
            max_x = max_x.max(px);
            max_y = max_y.max(py);
        }

        Region::new(
            (min_x + max_x) / 2.0,
            (min_y + max_y) / 2.0,
            (max_x - min_x) / 2.0,
            (max_y - min_y) / 2.0,
        )
    }
}
