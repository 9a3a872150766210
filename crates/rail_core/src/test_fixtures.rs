//! Shared test fixtures for rail_core and downstream crates.
//!
//! `fixture_catalog()` is a hand-authored map exercising every terrain, a
//! ferry pair, both water-crossing kinds, and a long clear corridor for
//! movement-budget tests.
//!
//! Layout (row, col), all on an 8-neighborhood grid:
//!
//! ```text
//! row 1:            clear_4(1,1)   major_b(1,5)   major_d(1,7)
//! row 2: major_a(2,0) clear_1 clear_2 mountain_1 alpine_1 small_city
//!        medium_city(2,6) ferry_east(2,7) water(2,8..9) ferry_west(2,10)
//!        clear_3(2,11) major_f(2,12)
//! row 3:            clear_5(3,1) clear_6(3,2) major_c(3,5) major_e(3,7)
//! row 5: major_r(5,0) r1..r11(5,1..11)
//! ```
//!
//! River crossing between clear_1–clear_2, inlet between clear_2–clear_6.

use crate::{
    CityInfo, CrossingKind, GameId, MapCatalog, Milepost, PlayerId, PlayerTrackState, PointId,
    Terrain, TrackNetwork,
};

pub fn pid(id: &str) -> PointId {
    PointId(id.to_string())
}

pub fn player(id: &str) -> PlayerId {
    PlayerId(id.to_string())
}

pub fn game(id: &str) -> GameId {
    GameId(id.to_string())
}

fn post(id: &str, row: i32, col: i32, terrain: Terrain) -> Milepost {
    Milepost {
        id: pid(id),
        row,
        col,
        terrain,
        city: None,
        ferry_to: None,
    }
}

fn city(id: &str, row: i32, col: i32, terrain: Terrain, name: &str) -> Milepost {
    Milepost {
        city: Some(CityInfo {
            name: name.to_string(),
            resources: vec![],
        }),
        ..post(id, row, col, terrain)
    }
}

fn ferry(id: &str, row: i32, col: i32, pair: &str) -> Milepost {
    Milepost {
        ferry_to: Some(pid(pair)),
        ..post(id, row, col, Terrain::FerryPort)
    }
}

pub fn fixture_catalog() -> MapCatalog {
    let mut mileposts = vec![
        city("major_a", 2, 0, Terrain::MajorCity, "Aachen"),
        post("clear_1", 2, 1, Terrain::Clear),
        post("clear_2", 2, 2, Terrain::Clear),
        post("mountain_1", 2, 3, Terrain::Mountain),
        post("alpine_1", 2, 4, Terrain::Alpine),
        city("small_city", 2, 5, Terrain::SmallCity, "Bruges"),
        city("medium_city", 2, 6, Terrain::MediumCity, "Dresden"),
        ferry("ferry_east", 2, 7, "ferry_west"),
        post("water_1", 2, 8, Terrain::Water),
        post("water_2", 2, 9, Terrain::Water),
        ferry("ferry_west", 2, 10, "ferry_east"),
        post("clear_3", 2, 11, Terrain::Clear),
        city("major_f", 2, 12, Terrain::MajorCity, "Frankfurt"),
        post("clear_4", 1, 1, Terrain::Clear),
        city("major_b", 1, 5, Terrain::MajorCity, "Berlin"),
        city("major_d", 1, 7, Terrain::MajorCity, "Dortmund"),
        post("clear_5", 3, 1, Terrain::Clear),
        post("clear_6", 3, 2, Terrain::Clear),
        city("major_c", 3, 5, Terrain::MajorCity, "Cologne"),
        city("major_e", 3, 7, Terrain::MajorCity, "Erfurt"),
        city("major_r", 5, 0, Terrain::MajorCity, "Rome"),
    ];
    for col in 1..=11 {
        mileposts.push(post(&format!("r{col}"), 5, col, Terrain::Clear));
    }
    let crossings = vec![
        (pid("clear_1"), pid("clear_2"), CrossingKind::River),
        (pid("clear_2"), pid("clear_6"), CrossingKind::Inlet),
    ];
    MapCatalog::new("fixture_v1", mileposts, crossings)
}

/// Network built from the given edge list, bypassing building rules.
pub fn network_of(edges: &[(&str, &str)]) -> TrackNetwork {
    let mut network = TrackNetwork::new();
    for (a, b) in edges {
        network = network.with_segment(&pid(a), &pid(b));
    }
    network
}

/// Pre-seeded persisted track state with zero spend counters.
pub fn seeded_track(player_id: &str, game_id: &str, edges: &[(&str, &str)]) -> PlayerTrackState {
    PlayerTrackState {
        network: network_of(edges),
        ..PlayerTrackState::new(player(player_id), game(game_id))
    }
}
