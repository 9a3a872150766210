use super::*;
use crate::test_fixtures::{fixture_catalog, game, network_of, pid, player, seeded_track};

mod serde;

// --- Shared test helpers ------------------------------------------------

/// Clear corridor along row 5: major_r — r1 — r2 — … — r{len}.
fn corridor_network(len: u32) -> TrackNetwork {
    let mut network = TrackNetwork::new().with_segment(&pid("major_r"), &pid("r1"));
    for col in 1..len {
        network = network.with_segment(
            &pid(&format!("r{col}")),
            &pid(&format!("r{}", col + 1)),
        );
    }
    network
}

/// Train already placed at `at` with a fresh turn's movement.
fn placed_train(class: TrainClass, at: &str) -> TrainState {
    TrainState {
        position: Some(pid(at)),
        ..TrainState::new(class)
    }
}
