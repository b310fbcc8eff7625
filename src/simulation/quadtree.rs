//! Hierarchical spatial index over vehicle footprints
//!
//! Rebuilt from scratch every tick; there is no removal or relocation path.

use super::types::{Region, VehicleId};

/// A vehicle footprint stored in the index: the axis-aligned bounds used for
/// partitioning plus the vehicle's true center for exact distance checks.
#[derive(Debug, Clone, Copy)]
pub struct SpatialPoint {
    pub bounds: Region,
    pub x: f32,
    pub y: f32,
    pub vehicle: VehicleId,
}

/// A quadtree node covering a rectangular region.
///
/// Points are stored directly up to `capacity`; beyond that the region
/// splits once into four equal quadrants and further insertions are
/// delegated to whichever child contains the point.
pub struct QuadTree {
    boundary: Region,
    capacity: usize,
    points: Vec<SpatialPoint>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    pub fn new(boundary: Region, capacity: usize) -> Self {
        Self {
            boundary,
            capacity,
            points: Vec::new(),
            children: None,
        }
    }

    fn subdivide(&mut self) {
        let Region { x, y, w, h } = self.boundary;
        let (w, h) = (w / 2.0, h / 2.0);
        let quadrants = [
            Region::new(x - w, y - h, w, h),
            Region::new(x + w, y - h, w, h),
            Region::new(x - w, y + h, w, h),
            Region::new(x + w, y + h, w, h),
        ];
        self.children = Some(Box::new(
            quadrants.map(|quadrant| QuadTree::new(quadrant, self.capacity)),
        ));
    }

    /// Inserts a point, returning false when its box center lies outside
    /// this node's region.
    pub fn insert(&mut self, point: SpatialPoint) -> bool {
        if !self.boundary.contains(point.bounds.x, point.bounds.y) {
            return false;
        }
        if self.points.len() < self.capacity {
            self.points.push(point);
            return true;
        }
        if self.children.is_none() {
            self.subdivide();
        }
        match self.children.as_mut() {
            Some(children) => children.iter_mut().any(|child| child.insert(point)),
            None => false,
        }
    }

    /// Collects all stored points whose box center lies within `range`,
    /// recursing only into children whose regions overlap it.
    pub fn query(&self, range: &Region) -> Vec<SpatialPoint> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    fn query_into(&self, range: &Region, found: &mut Vec<SpatialPoint>) {
        if !self.boundary.intersects(range) {
            return;
        }
        for point in &self.points {
            if range.contains(point.bounds.x, point.bounds.y) {
                found.push(*point);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_into(range, found);
            }
        }
    }
}
