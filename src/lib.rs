//! Traffic Simulation Library
//!
//! Simulates autonomous vehicles on a weighted road graph with
//! traffic-aware shortest-path routing and quadtree-based collision
//! avoidance. Runs headless; a renderer can consume the public state
//! between ticks.

pub mod simulation;
