//! Road graph construction and shortest-path behaviour

use roadsim::simulation::{RoadGraph, SimWorld};

fn grid_graph(size: usize) -> RoadGraph {
    let mut graph = RoadGraph::new();
    for i in 0..size {
        for j in 0..size {
            graph.add_node(&format!("{}-{}", i, j), i as f32 * 100.0, j as f32 * 100.0);
        }
    }
    for i in 0..size {
        for j in 0..size {
            if i + 1 < size {
                assert!(graph.add_edge(&format!("{}-{}", i, j), &format!("{}-{}", i + 1, j), 1.0));
                assert!(graph.add_edge(&format!("{}-{}", i + 1, j), &format!("{}-{}", i, j), 1.0));
            }
            if j + 1 < size {
                assert!(graph.add_edge(&format!("{}-{}", i, j), &format!("{}-{}", i, j + 1), 1.0));
                assert!(graph.add_edge(&format!("{}-{}", i, j + 1), &format!("{}-{}", i, j), 1.0));
            }
        }
    }
    graph
}

/// Three nodes in a line with a direct but more expensive bypass:
/// a -> b -> c costs 2, a -> c costs 2.5.
fn corridor_graph() -> RoadGraph {
    let mut graph = RoadGraph::new();
    graph.add_node("a", 0.0, 0.0);
    graph.add_node("b", 1.0, 0.0);
    graph.add_node("c", 2.0, 0.0);
    assert!(graph.add_edge("a", "b", 1.0));
    assert!(graph.add_edge("b", "c", 1.0));
    assert!(graph.add_edge("a", "c", 2.5));
    graph
}

#[test]
fn add_edge_requires_both_endpoints() {
    let mut graph = RoadGraph::new();
    graph.add_node("a", 0.0, 0.0);
    assert!(!graph.add_edge("a", "missing", 1.0));
    assert!(!graph.add_edge("missing", "a", 1.0));
    assert_eq!(graph.edge_count(), 0);

    graph.add_node("b", 10.0, 0.0);
    assert!(graph.add_edge("a", "b", 1.0));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn dijkstra_crosses_grid_in_eight_hops() {
    let graph = grid_graph(5);
    let path = graph.dijkstra("0-0", "4-4").expect("grid is connected");
    assert_eq!(path.len(), 9);
    assert_eq!(path.first().map(String::as_str), Some("0-0"));
    assert_eq!(path.last().map(String::as_str), Some("4-4"));

    let cost = graph.path_cost(&path).expect("path follows existing edges");
    assert!((cost - 8.0).abs() < 1e-4, "unexpected cost {}", cost);
}

#[test]
fn algorithms_agree_on_uniform_weights() {
    let graph = grid_graph(5);
    for (start, end) in [("0-0", "4-4"), ("4-0", "0-4"), ("2-1", "3-4")] {
        let dijkstra_path = graph.dijkstra(start, end).expect("grid is connected");
        let a_star_path = graph.a_star(start, end).expect("grid is connected");
        let dijkstra_cost = graph
            .path_cost(&dijkstra_path)
            .expect("path follows existing edges");
        let a_star_cost = graph
            .path_cost(&a_star_path)
            .expect("path follows existing edges");
        assert!(
            (dijkstra_cost - a_star_cost).abs() < 1e-4,
            "costs diverge for {} -> {}: {} vs {}",
            start,
            end,
            dijkstra_cost,
            a_star_cost
        );
    }
}

#[test]
fn trivial_route_is_a_single_node() {
    let graph = corridor_graph();
    assert_eq!(graph.dijkstra("a", "a"), Some(vec!["a".to_string()]));
    assert_eq!(graph.a_star("a", "a"), Some(vec!["a".to_string()]));
}

#[test]
fn unknown_endpoints_yield_no_route() {
    let graph = grid_graph(3);
    assert!(graph.dijkstra("0-0", "9-9").is_none());
    assert!(graph.dijkstra("9-9", "0-0").is_none());
    assert!(graph.a_star("0-0", "9-9").is_none());
    assert!(graph.a_star("9-9", "0-0").is_none());
}

#[test]
fn disconnected_destination_yields_no_route() {
    let mut graph = corridor_graph();
    graph.add_node("island", 50.0, 50.0);
    assert!(graph.dijkstra("a", "island").is_none());
    assert!(graph.a_star("a", "island").is_none());
    assert!(graph.dijkstra("island", "a").is_none());
    assert!(graph.a_star("island", "a").is_none());
}

#[test]
fn traffic_accumulates_and_clamps() {
    let mut graph = corridor_graph();
    for k in 1..=12 {
        graph.update_traffic("a", "b", 1.0);
        let expected = (k as f32).min(10.0);
        let traffic = graph.traffic("a", "b").expect("edge exists");
        assert!(
            (traffic - expected).abs() < 1e-4,
            "after {} updates: {}",
            k,
            traffic
        );
    }
}

#[test]
fn decay_steps_down_and_floors_at_zero() {
    let mut graph = corridor_graph();
    graph.update_traffic("a", "b", 1.0);

    graph.decrease_traffic();
    let traffic = graph.traffic("a", "b").expect("edge exists");
    assert!((traffic - 0.9).abs() < 1e-4);

    for _ in 0..20 {
        graph.decrease_traffic();
    }
    let traffic = graph.traffic("a", "b").expect("edge exists");
    assert!(traffic >= 0.0);
    assert!(traffic.abs() < 1e-4);

    // untouched edges stay at zero
    assert_eq!(graph.traffic("b", "c"), Some(0.0));
}

#[test]
fn traffic_update_on_missing_edge_is_a_no_op() {
    let mut graph = corridor_graph();
    graph.update_traffic("c", "a", 1.0);
    assert_eq!(graph.traffic("c", "a"), None);
}

#[test]
fn congestion_diverts_newly_planned_routes() {
    let mut graph = corridor_graph();
    assert_eq!(
        graph.dijkstra("a", "c").expect("route exists"),
        vec!["a", "b", "c"]
    );
    assert_eq!(
        graph.a_star("a", "c").expect("route exists"),
        vec!["a", "b", "c"]
    );

    for _ in 0..10 {
        graph.update_traffic("a", "b", 1.0);
    }

    assert_eq!(graph.dijkstra("a", "c").expect("route exists"), vec!["a", "c"]);
    assert_eq!(graph.a_star("a", "c").expect("route exists"), vec!["a", "c"]);
}

#[test]
fn re_adding_an_edge_overwrites_its_record() {
    let mut graph = corridor_graph();
    graph.update_traffic("a", "b", 5.0);
    assert!(graph.add_edge("a", "b", 2.0));
    assert_eq!(graph.traffic("a", "b"), Some(0.0));
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn network_routes_match_across_algorithms() {
    let mut world = SimWorld::new_with_seed(7);
    world.create_network();
    let graph = world.graph.as_ref().expect("network was created");

    // 5x5 grid plus four roundabouts of four satellites each
    assert_eq!(graph.node_count(), 41);
    assert_eq!(graph.edge_count(), 128);

    let dijkstra_path = graph.dijkstra("0-0", "4-4").expect("network is connected");
    assert_eq!(dijkstra_path.len(), 9);
    let dijkstra_cost = graph
        .path_cost(&dijkstra_path)
        .expect("path follows existing edges");
    assert!((dijkstra_cost - 8.0).abs() < 1e-4);

    let a_star_path = graph.a_star("0-0", "4-4").expect("network is connected");
    let a_star_cost = graph
        .path_cost(&a_star_path)
        .expect("path follows existing edges");
    assert!((dijkstra_cost - a_star_cost).abs() < 1e-4);
}

#[test]
fn rebuilding_the_network_is_idempotent() {
    let mut world = SimWorld::new_with_seed(11);
    world.create_network();
    world.create_network();
    let graph = world.graph.as_ref().expect("network was created");
    assert_eq!(graph.node_count(), 41);
    assert_eq!(graph.edge_count(), 128);
}
