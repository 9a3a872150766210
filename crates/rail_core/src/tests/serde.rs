use super::*;
use serde_json::json;

#[test]
fn serialized_form_is_flat_nodes_plus_canonical_edges() {
    let network = network_of(&[("clear_1", "major_a"), ("clear_1", "clear_2")]);
    let value = serde_json::to_value(&network).expect("network serializes");
    assert_eq!(
        value,
        json!({
            "nodes": ["clear_1", "clear_2", "major_a"],
            "edges": [["clear_1", "clear_2"], ["clear_1", "major_a"]],
        })
    );
}

#[test]
fn each_unordered_pair_is_stored_once() {
    let network = network_of(&[("major_a", "clear_1"), ("clear_1", "major_a")]);
    let serialized = network.to_serialized();
    assert_eq!(serialized.edges, vec![(pid("clear_1"), pid("major_a"))]);
}

#[test]
fn json_round_trip_is_lossless() {
    let catalog = fixture_catalog();
    let network = network_of(&[
        ("major_a", "clear_1"),
        ("clear_1", "clear_2"),
        ("major_a", "clear_4"),
    ]);
    let text = serde_json::to_string(&network).expect("serialize");
    let restored: TrackNetwork = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(restored, network);
    assert!(restored.is_connected(&pid("clear_4"), &pid("clear_2"), &catalog));
}

#[test]
fn explicit_conversion_round_trip() {
    let network = network_of(&[("major_a", "clear_1")]);
    let restored = TrackNetwork::from_serialized(&network.to_serialized());
    assert_eq!(restored, network);
}

#[test]
fn player_track_state_round_trips_with_counters() {
    let mut state = seeded_track("p1", "g1", &[("major_a", "clear_1")]);
    state.total_build_cost = 14;
    state.turn_build_cost = 3;
    state.last_build_turn = 7;
    let text = serde_json::to_string(&state).expect("serialize");
    let restored: PlayerTrackState = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(restored.network, state.network);
    assert_eq!(restored.total_build_cost, 14);
    assert_eq!(restored.turn_build_cost, 3);
    assert_eq!(restored.last_build_turn, 7);
}

#[test]
fn deserialized_isolated_nodes_stay_reachable_members() {
    let serialized = SerializedNetwork {
        nodes: vec![pid("clear_1"), pid("clear_2")],
        edges: vec![],
    };
    let network = TrackNetwork::from_serialized(&serialized);
    assert!(network.contains(&pid("clear_1")));
    assert_eq!(network.edge_count(), 0);
}
