//! Full-game progression tests.
//!
//! These drive complete multi-turn replays through `GameSession` and verify
//! that game milestones are reached: routes get built within budget, trains
//! cross the map, and ferry crossings resolve over a turn boundary. They
//! catch regressions in the interplay of building, movement, and turn
//! bookkeeping that the per-crate unit tests cannot see.

use rail_core::test_fixtures::fixture_catalog;
use rail_core::{BuildOptions, PlayerId, PointId, TrackStore, TrainClass};
use rail_session::{run_replay, Action, ActionOutcome, GameSession};

fn pid(s: &str) -> PointId {
    PointId(s.to_string())
}

fn player(s: &str) -> PlayerId {
    PlayerId(s.to_string())
}

fn build(p: &str, from: &str, to: &str) -> Action {
    Action::BuildTrack {
        player: player(p),
        from: pid(from),
        to: pid(to),
    }
}

fn move_to(p: &str, to: &str) -> Action {
    Action::MoveTrain {
        player: player(p),
        to: pid(to),
    }
}

fn end_turn(p: &str) -> Action {
    Action::EndTurn { player: player(p) }
}

fn two_player_session() -> GameSession {
    GameSession::new(
        rail_core::GameId("progression".to_string()),
        fixture_catalog(),
        &[
            (player("p1"), TrainClass::Freight),
            (player("p2"), TrainClass::FastFreight),
        ],
    )
}

/// A route from Aachen through the mountains to Bruges costs
/// 1 + 3 + 2 + 5 + 3 = 14 and fits in a single default-budget turn.
#[test]
fn mountain_route_is_built_within_one_turn_budget() {
    let mut session = two_player_session();
    let actions = vec![
        build("p1", "major_a", "clear_1"),
        build("p1", "clear_1", "clear_2"),
        build("p1", "clear_2", "mountain_1"),
        build("p1", "mountain_1", "alpine_1"),
        build("p1", "alpine_1", "small_city"),
    ];
    let (outcomes, summary) = run_replay(&mut session, &actions);
    assert_eq!(summary.rejections, 0, "outcomes: {outcomes:?}");

    let state = session
        .store()
        .player_track(&player("p1"), session.game())
        .expect("track persisted");
    assert_eq!(state.turn_build_cost, 14);
    assert_eq!(state.total_build_cost, 14);
    assert!(session
        .combined_track()
        .is_connected(&pid("major_a"), &pid("small_city"), session.catalog()));
}

/// A build that overruns the turn budget is rejected, and the same build
/// succeeds on the player's next turn once the spend resets.
#[test]
fn over_budget_build_succeeds_on_the_next_turn() {
    let mut session = two_player_session()
        .with_build_options(BuildOptions { turn_budget: 8 });
    let (_, summary) = run_replay(
        &mut session,
        &[
            build("p1", "major_a", "clear_1"),
            build("p1", "clear_1", "clear_2"),
            build("p1", "clear_2", "mountain_1"),
        ],
    );
    assert_eq!(summary.rejections, 0);
    // 6 spent; the alpine segment (5) no longer fits.
    let rejected = session.apply(&build("p1", "mountain_1", "alpine_1"));
    assert!(rejected.is_rejection(), "got {rejected:?}");

    session.apply(&end_turn("p1"));
    session.apply(&end_turn("p2"));
    let retried = session.apply(&build("p1", "mountain_1", "alpine_1"));
    assert!(!retried.is_rejection(), "got {retried:?}");

    let state = session
        .store()
        .player_track(&player("p1"), session.game())
        .expect("track persisted");
    assert_eq!(state.turn_build_cost, 5);
    assert_eq!(state.total_build_cost, 11);
    assert_eq!(state.last_build_turn, 3);
}

/// End-to-end ferry crossing: Dortmund to Frankfurt over the strait. The
/// train is stopped at the near port, carried across at the next turn start,
/// and finishes the trip on half movement.
#[test]
fn train_crosses_the_ferry_over_a_turn_boundary() {
    let mut session = two_player_session();
    let (outcomes, summary) = run_replay(
        &mut session,
        &[
            build("p1", "major_d", "ferry_east"),
            build("p1", "ferry_west", "clear_3"),
            build("p1", "clear_3", "major_f"),
            move_to("p1", "major_d"),
            move_to("p1", "ferry_east"),
        ],
    );
    assert_eq!(summary.rejections, 0, "outcomes: {outcomes:?}");
    assert!(session.train(&player("p1")).expect("p1 train").ferry.is_blocked());

    // Moving again this turn is a rejection, not a panic.
    assert!(session.apply(&move_to("p1", "ferry_west")).is_rejection());

    session.apply(&end_turn("p1"));
    session.apply(&end_turn("p2"));

    let train = session.train(&player("p1")).expect("p1 train");
    assert_eq!(train.position, Some(pid("ferry_west")));
    assert_eq!(train.remaining_movement, 4);

    let (outcomes, summary) = run_replay(
        &mut session,
        &[move_to("p1", "clear_3"), move_to("p1", "major_f")],
    );
    assert_eq!(summary.rejections, 0, "outcomes: {outcomes:?}");
    let train = session.train(&player("p1")).expect("p1 train");
    assert_eq!(train.position, Some(pid("major_f")));
    assert_eq!(train.remaining_movement, 2);
}

/// Both players interleave turns; each sees a fresh budget and their trains
/// share the pooled track.
#[test]
fn interleaved_turns_share_track_and_isolate_budgets() {
    let mut session = two_player_session();
    let script = vec![
        build("p1", "major_b", "small_city"),
        end_turn("p1"),
        build("p2", "major_c", "small_city"),
        move_to("p2", "major_c"),
        move_to("p2", "small_city"),
        // p2's train continues over p1's segment.
        move_to("p2", "major_b"),
        end_turn("p2"),
    ];
    let (outcomes, summary) = run_replay(&mut session, &script);
    assert_eq!(summary.rejections, 0, "outcomes: {outcomes:?}");

    let p2_moves: Vec<&ActionOutcome> = outcomes
        .iter()
        .filter(|o| matches!(o, ActionOutcome::TrainMoved { .. }))
        .collect();
    assert_eq!(p2_moves.len(), 3);

    let p1_state = session
        .store()
        .player_track(&player("p1"), session.game())
        .expect("p1 track");
    let p2_state = session
        .store()
        .player_track(&player("p2"), session.game())
        .expect("p2 track");
    assert_eq!(p1_state.total_build_cost, 3);
    assert_eq!(p2_state.total_build_cost, 3);
    assert!(!p1_state.network.contains(&pid("major_c")));
}
