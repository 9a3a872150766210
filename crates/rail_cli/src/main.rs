use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

use rail_core::{BuildOptions, GameId, PlayerId, Terrain, TrackStore, TrainClass};
use rail_session::{run_replay, Action, ActionOutcome, GameSession, ReplaySummary};
use rail_world::{load_map, starter_map};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "rail_cli", about = "Rail game replay runner")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG when set).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded action script against a map.
    Replay {
        /// JSON script with players and actions.
        #[arg(long)]
        script: String,
        #[arg(long, default_value = "./content", conflicts_with = "builtin")]
        map_dir: String,
        /// Use the built-in starter map instead of loading one.
        #[arg(long)]
        builtin: bool,
        /// Per-player build budget per turn.
        #[arg(long)]
        turn_budget: Option<u32>,
    },
    /// Load a map directory and report what it contains.
    Validate {
        #[arg(long, default_value = "./content")]
        map_dir: String,
    },
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ScriptPlayer {
    id: PlayerId,
    class: TrainClass,
}

#[derive(Deserialize)]
struct ReplayScript {
    game: GameId,
    players: Vec<ScriptPlayer>,
    actions: Vec<Action>,
}

fn load_script(path: &str) -> Result<ReplayScript> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading script file: {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("parsing script file: {path}"))
}

fn replay(script_path: &str, map_dir: &str, builtin: bool, turn_budget: Option<u32>) -> Result<()> {
    let catalog = if builtin {
        starter_map()
    } else {
        load_map(map_dir)?
    };
    let script = load_script(script_path)?;
    anyhow::ensure!(!script.players.is_empty(), "script lists no players");

    info!(
        map = catalog.version(),
        players = script.players.len(),
        actions = script.actions.len(),
        "starting replay"
    );

    let players: Vec<(PlayerId, TrainClass)> = script
        .players
        .iter()
        .map(|p| (p.id.clone(), p.class))
        .collect();
    let mut session = GameSession::new(script.game.clone(), catalog, &players);
    if let Some(budget) = turn_budget {
        session = session.with_build_options(BuildOptions { turn_budget: budget });
    }

    println!(
        "Replaying {} actions on map {} with {} players",
        script.actions.len(),
        session.catalog().version(),
        players.len(),
    );
    println!("{}", "-".repeat(72));

    let (outcomes, summary) = run_replay(&mut session, &script.actions);
    for (index, outcome) in outcomes.iter().enumerate() {
        println!("[{index:04}] {}", describe(outcome));
    }

    println!("{}", "-".repeat(72));
    print_summary(&session, &summary);
    Ok(())
}

fn describe(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::TrackBuilt {
            player,
            from,
            to,
            spent_this_turn,
        } => format!("{player}: built {from} -> {to} (spent this turn: {spent_this_turn})"),
        ActionOutcome::TrainMoved {
            player,
            to,
            cost,
            remaining_movement,
        } => format!("{player}: moved to {to} (cost {cost}, {remaining_movement} left)"),
        ActionOutcome::TurnEnded {
            player,
            next_player,
            turn,
        } => format!("{player}: ended turn; {next_player} is up (turn {turn})"),
        ActionOutcome::BuildRejected { player, reason } => {
            format!("{player}: build REJECTED ({reason})")
        }
        ActionOutcome::MoveRejected { player, reason } => {
            format!("{player}: move REJECTED ({reason})")
        }
        ActionOutcome::OutOfTurn { player, expected } => {
            format!("{player}: acted out of turn ({expected} is up)")
        }
    }
}

fn print_summary(session: &GameSession, summary: &ReplaySummary) {
    println!(
        "Done after {} actions on turn {} ({} rejected)",
        summary.actions,
        session.turn(),
        summary.rejections,
    );
    let mut reasons: Vec<(&String, &usize)> = summary.rejection_reasons.iter().collect();
    reasons.sort();
    for (reason, count) in reasons {
        println!("  rejection: {reason} x{count}");
    }
    for state in session.store().tracks_in_game(session.game()) {
        let position = session
            .train(&state.player)
            .and_then(|t| t.position.clone())
            .map_or_else(|| "unplaced".to_string(), |p| p.to_string());
        println!(
            "  {player}: {nodes} points / {edges} segments built, \
             {total} total cost, train at {position}",
            player = state.player,
            nodes = state.network.node_count(),
            edges = state.network.edge_count(),
            total = state.total_build_cost,
        );
    }
}

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

fn validate(map_dir: &str) -> Result<()> {
    let catalog = load_map(map_dir)?;
    let mileposts = catalog.mileposts().count();
    let cities = catalog.mileposts().filter(|m| m.terrain.is_city()).count();
    let ferries = catalog
        .mileposts()
        .filter(|m| m.terrain == Terrain::FerryPort)
        .count();
    println!(
        "Map {} OK: {mileposts} mileposts, {cities} cities, {ferries} ferry ports",
        catalog.version(),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Replay {
            script,
            map_dir,
            builtin,
            turn_budget,
        } => replay(&script, &map_dir, builtin, turn_budget)?,
        Commands::Validate { map_dir } => validate(&map_dir)?,
    }
    Ok(())
}
