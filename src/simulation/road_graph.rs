//! Road network graph with traffic-aware shortest-path routing
//!
//! Nodes are intersections keyed by string id; edges are one-way road
//! segments whose effective cost grows with recent traffic load.

use ordered_float::OrderedFloat;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

use super::types::{TRAFFIC_CAP, TRAFFIC_DECAY, TRAFFIC_WEIGHT};

/// An intersection in the road network.
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Directed road record tracked per ordered endpoint pair.
#[derive(Debug, Clone, Copy)]
pub struct RoadEdge {
    pub weight: f32,
    pub traffic: f32,
}

/// Road network graph for pathfinding.
///
/// The petgraph structure holds nodes and adjacency; road records live in a
/// side table keyed by ordered endpoint pair. Re-adding an edge between the
/// same pair overwrites its record but appends another adjacency entry (the
/// neighbor list is append-only).
#[derive(Default)]
pub struct RoadGraph {
    /// The underlying directed graph; edge weights are base traversal costs.
    graph: DiGraph<RoadNode, f32>,

    /// Maps node ids to their indices in the graph.
    id_to_node: HashMap<String, NodeIndex>,

    /// Node indices in insertion order; search scans break ties in this order.
    node_order: Vec<NodeIndex>,

    /// Directed road records keyed by ordered endpoint pair.
    edges: HashMap<(NodeIndex, NodeIndex), RoadEdge>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an intersection. Callers must keep ids unique.
    pub fn add_node(&mut self, id: &str, x: f32, y: f32) {
        let index = self.graph.add_node(RoadNode {
            id: id.to_string(),
            x,
            y,
        });
        self.id_to_node.insert(id.to_string(), index);
        self.node_order.push(index);
    }

    /// Adds a one-way road segment. Returns false when either endpoint is
    /// unknown; the caller must check.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f32) -> bool {
        let (Some(&from_ix), Some(&to_ix)) = (self.id_to_node.get(from), self.id_to_node.get(to))
        else {
            return false;
        };
        self.graph.add_edge(from_ix, to_ix, weight);
        self.edges.insert(
            (from_ix, to_ix),
            RoadEdge {
                weight,
                traffic: 0.0,
            },
        );
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct directed road records.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_position(&self, id: &str) -> Option<(f32, f32)> {
        let index = self.id_to_node.get(id)?;
        let node = &self.graph[*index];
        Some((node.x, node.y))
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.node_order
            .iter()
            .map(move |&index| self.graph[index].id.as_str())
    }

    /// All intersections in insertion order (used for rendering).
    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.node_order.iter().map(move |&index| &self.graph[index])
    }

    /// Directed road records with their endpoint ids (used for rendering
    /// and metrics).
    pub fn edge_records(&self) -> impl Iterator<Item = (&str, &str, &RoadEdge)> {
        self.edges.iter().map(move |(&(from, to), edge)| {
            (
                self.graph[from].id.as_str(),
                self.graph[to].id.as_str(),
                edge,
            )
        })
    }

    /// Current traffic load on a directed edge.
    #[allow(dead_code)]
    pub fn traffic(&self, from: &str, to: &str) -> Option<f32> {
        let from_ix = self.id_to_node.get(from)?;
        let to_ix = self.id_to_node.get(to)?;
        self.edges.get(&(*from_ix, *to_ix)).map(|edge| edge.traffic)
    }

    /// Adds load to a directed edge, capped at the traffic ceiling. No-op
    /// when the edge is absent.
    pub fn update_traffic(&mut self, from: &str, to: &str, amount: f32) {
        let (Some(&from_ix), Some(&to_ix)) = (self.id_to_node.get(from), self.id_to_node.get(to))
        else {
            return;
        };
        if let Some(edge) = self.edges.get_mut(&(from_ix, to_ix)) {
            edge.traffic = (edge.traffic + amount).min(TRAFFIC_CAP);
        }
    }

    /// One decay pass: every loaded edge loses a fixed amount, floored at 0.
    pub fn decrease_traffic(&mut self) {
        for edge in self.edges.values_mut() {
            if edge.traffic > 0.0 {
                edge.traffic = (edge.traffic - TRAFFIC_DECAY).max(0.0);
            }
        }
    }

    fn effective_weight(&self, from: NodeIndex, to: NodeIndex, base: f32) -> f32 {
        let traffic = self
            .edges
            .get(&(from, to))
            .map(|edge| edge.traffic)
            .unwrap_or(0.0);
        base + traffic * TRAFFIC_WEIGHT
    }

    /// Total effective cost of a node sequence, or `None` when a hop has no
    /// matching edge record.
    #[allow(dead_code)]
    pub fn path_cost(&self, path: &[String]) -> Option<f32> {
        let mut cost = 0.0;
        for pair in path.windows(2) {
            let from_ix = self.id_to_node.get(&pair[0])?;
            let to_ix = self.id_to_node.get(&pair[1])?;
            let edge = self.edges.get(&(*from_ix, *to_ix))?;
            cost += edge.weight + edge.traffic * TRAFFIC_WEIGHT;
        }
        Some(cost)
    }

    /// Label-setting shortest path over effective edge weights.
    ///
    /// The minimum-distance unvisited node is found by a linear scan in node
    /// insertion order; strict less-than keeps the first minimum on ties.
    /// Returns the node ids from start to end inclusive, or `None` when the
    /// destination is unreachable.
    pub fn dijkstra(&self, start: &str, end: &str) -> Option<Vec<String>> {
        let start_ix = *self.id_to_node.get(start)?;
        let end_ix = *self.id_to_node.get(end)?;

        let mut distances: HashMap<NodeIndex, OrderedFloat<f32>> = HashMap::new();
        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut unvisited: Vec<NodeIndex> = Vec::with_capacity(self.node_order.len());
        for &index in &self.node_order {
            let initial = if index == start_ix { 0.0 } else { f32::INFINITY };
            distances.insert(index, OrderedFloat(initial));
            unvisited.push(index);
        }

        while !unvisited.is_empty() {
            let mut slot = 0;
            for (i, index) in unvisited.iter().enumerate() {
                if distances[index] < distances[&unvisited[slot]] {
                    slot = i;
                }
            }
            let current = unvisited[slot];
            let min_distance = distances[&current];

            if current == end_ix || min_distance.is_infinite() {
                break;
            }
            unvisited.remove(slot);

            for edge in self.graph.edges(current) {
                let neighbor = edge.target();
                let weight = self.effective_weight(current, neighbor, *edge.weight());
                let total = min_distance + OrderedFloat(weight);
                if total < distances[&neighbor] {
                    distances.insert(neighbor, total);
                    previous.insert(neighbor, current);
                }
            }
        }

        self.build_path(start_ix, end_ix, &previous)
    }

    /// Heuristic-guided shortest path over the same effective weights, with
    /// straight-line distance to the goal as the heuristic. The open list is
    /// scanned linearly for the lowest f-score; first-seen wins ties.
    pub fn a_star(&self, start: &str, end: &str) -> Option<Vec<String>> {
        let start_ix = *self.id_to_node.get(start)?;
        let end_ix = *self.id_to_node.get(end)?;

        let mut open: Vec<NodeIndex> = vec![start_ix];
        let mut closed: HashSet<NodeIndex> = HashSet::new();
        let mut g_score: HashMap<NodeIndex, OrderedFloat<f32>> = HashMap::new();
        let mut f_score: HashMap<NodeIndex, OrderedFloat<f32>> = HashMap::new();
        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for &index in &self.node_order {
            let initial = if index == start_ix { 0.0 } else { f32::INFINITY };
            g_score.insert(index, OrderedFloat(initial));
            f_score.insert(index, OrderedFloat(self.heuristic(index, end_ix)));
        }

        while !open.is_empty() {
            let mut slot = 0;
            for (i, index) in open.iter().enumerate() {
                if f_score[index] < f_score[&open[slot]] {
                    slot = i;
                }
            }
            let current = open[slot];

            if current == end_ix {
                return self.build_path(start_ix, end_ix, &came_from);
            }

            open.remove(slot);
            closed.insert(current);

            for edge in self.graph.edges(current) {
                let neighbor = edge.target();
                if closed.contains(&neighbor) {
                    continue;
                }
                let weight = self.effective_weight(current, neighbor, *edge.weight());
                let tentative = g_score[&current] + OrderedFloat(weight);

                if !open.contains(&neighbor) {
                    open.push(neighbor);
                } else if tentative >= g_score[&neighbor] {
                    continue;
                }

                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                f_score.insert(
                    neighbor,
                    tentative + OrderedFloat(self.heuristic(neighbor, end_ix)),
                );
            }
        }

        None
    }

    fn heuristic(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        let a = &self.graph[from];
        let b = &self.graph[to];
        ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
    }

    fn build_path(
        &self,
        start: NodeIndex,
        end: NodeIndex,
        previous: &HashMap<NodeIndex, NodeIndex>,
    ) -> Option<Vec<String>> {
        if !previous.contains_key(&end) && start != end {
            return None;
        }
        let mut indices = vec![end];
        let mut current = end;
        while let Some(&prev) = previous.get(&current) {
            indices.push(prev);
            current = prev;
        }
        indices.reverse();
        Some(
            indices
                .into_iter()
                .map(|index| self.graph[index].id.clone())
                .collect(),
        )
    }
}
