//! Draft Assistant CLI
//!
//! Loads players, matchups and league settings from local files, then:
//! - combos: rank every way to fill one position
//! - analyze: recommend free agents for every open position
//! - roster: my roster, or every team's
//! - poll: follow a live draft through a picks file

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use forecast_engine::{ForecastConfig, ForecastEngine};
use lineup_optimizer::{Combination, DraftAdvisor, LeagueSettings, LineupOptimizer, OptimizerConfig};
use player_registry::{Player, PlayerRegistry, Position, RegistryConfig, TeamId};
use roster_store::{
    league, DraftBoard, DraftPick, DraftPoller, FilePickFeed, PickOutcome, PollerConfig, RosterConfig,
    RosterStore,
};

#[derive(Parser)]
#[command(name = "draft-cli")]
#[command(about = "Fantasy draft assistant - weekly forecasts and lineup combinations")]
#[command(version = "0.1.0")]
struct Cli {
    /// Player data JSON
    #[arg(long, default_value = "data/players.json")]
    players: PathBuf,

    /// Matchup schedule JSON, skipped when missing
    #[arg(long, default_value = "data/matchups.json")]
    matchups: PathBuf,

    /// League settings TOML, standard settings when missing
    #[arg(long, default_value = "data/league.toml")]
    league: PathBuf,

    /// Sleeper league users JSON
    #[arg(long, requires = "rosters")]
    users: Option<PathBuf>,

    /// Sleeper league rosters JSON
    #[arg(long, requires = "users")]
    rosters: Option<PathBuf>,

    /// Count full rosters instead of keepers
    #[arg(long)]
    post_draft: bool,

    /// Draft picks JSON applied before the command runs
    #[arg(long)]
    picks: Option<PathBuf>,

    /// Put a player on my team (repeatable)
    #[arg(long = "pick", value_name = "PLAYER")]
    pick: Vec<String>,

    /// Mark a player taken by another team (repeatable)
    #[arg(long = "take", value_name = "PLAYER")]
    take: Vec<String>,

    /// Make a player a free agent (repeatable)
    #[arg(long = "clear", value_name = "PLAYER")]
    clear: Vec<String>,

    /// Oldest free agent considered
    #[arg(long)]
    max_age: Option<u32>,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every group that fills a position
    Combos {
        /// QB, RB, WR, TE or K
        #[arg(value_parser = parse_position)]
        position: Position,

        /// Players to roster at the position
        #[arg(short, long, default_value = "1")]
        draft: usize,

        /// Players started each week
        #[arg(short = 'l', long = "play", default_value = "1")]
        start: usize,

        /// Groups to print, best last
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Recommend free agents for every position still open on my roster
    Analyze,

    /// Show my roster
    Roster {
        /// Show every team, best score first
        #[arg(long)]
        all_teams: bool,
    },

    /// Follow a live draft, applying new picks as they appear
    Poll {
        /// Picks JSON kept current by an external fetcher
        feed: PathBuf,

        /// Seconds between refreshes
        #[arg(long)]
        interval: Option<u64>,

        /// Refresh once and exit
        #[arg(long)]
        once: bool,
    },
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    match s.parse::<Position>() {
        Ok(position) if Position::RANKED.contains(&position) => Ok(position),
        _ => Err(format!("unsupported position '{s}', expected one of QB, RB, WR, TE, K")),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log level for `-v` count: warn by default, debug with `-v`, trace with `-vv`
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.league)?;
    let mut optimizer_config = OptimizerConfig::from_env()?;
    if let Some(max_age) = cli.max_age {
        optimizer_config.max_age = max_age;
    }
    let optimizer = LineupOptimizer::new(optimizer_config)?;

    let store = load_store(&cli, &settings).await?;

    match cli.command {
        Commands::Combos { position, draft, start, top } => {
            let pool = store.snapshot_position(position);
            let combinations = optimizer
                .optimize(&pool, draft, start)
                .with_context(|| format!("cannot build {position} combinations"))?;
            print_combinations(&combinations, top);
        }
        Commands::Analyze => {
            let players = store.snapshot_all();
            let advisor = DraftAdvisor::new(optimizer, settings);
            let recommendations = advisor.analyze(&players)?;

            let needs = advisor.needs(&players);
            let needed: Vec<String> = needs.iter().map(|n| format!("{}: {}", n.position, n.remaining())).collect();
            println!("{} {}", "Needed:".bold(), needed.join(", "));

            let combinations: Vec<Combination> =
                recommendations.iter().flat_map(|r| r.combinations.iter().rev().cloned()).collect();
            print_combinations(&combinations, combinations.len());

            for recommendation in &recommendations {
                println!();
                println!(
                    "{}",
                    format!("Top {} {}s", recommendation.players.len(), recommendation.need.position).bold()
                );
                for player in &recommendation.players {
                    println!("{}", player_line(player));
                }
            }
        }
        Commands::Roster { all_teams } => {
            if all_teams {
                for (i, team) in store.teams().iter().enumerate() {
                    println!("{} {}", format!("#{}", i + 1).bold(), team);
                    for id in &team.players {
                        if let Ok(player) = store.player(id) {
                            println!("  {}", player_line(&player));
                        }
                    }
                    println!();
                }
            } else {
                print_roster(&store);
            }
        }
        Commands::Poll { feed, interval, once } => {
            let mut config = PollerConfig::from_env()?;
            if let Some(secs) = interval {
                if secs == 0 {
                    bail!("--interval must be at least one second");
                }
                config.refresh_interval_secs = secs;
            }
            let mut poller = DraftPoller::new(store.clone(), Arc::new(FilePickFeed::new(feed)), config);

            if once {
                for outcome in poller.refresh_once().await? {
                    print_outcome(&store, &outcome);
                }
                print_roster(&store);
                return Ok(());
            }

            let handle = poller.spawn();
            println!("Polling for draft picks, press Ctrl-C to stop");
            tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
            handle.abort();
            print_roster(&store);
        }
    }

    Ok(())
}

fn load_settings(path: &Path) -> Result<LeagueSettings> {
    if path.exists() {
        return LeagueSettings::from_file(path)
            .with_context(|| format!("failed to load league settings from {}", path.display()));
    }
    warn!("No league settings at {}, using standard settings", path.display());
    Ok(LeagueSettings::standard(TeamId::from("me")))
}

async fn load_store(cli: &Cli, settings: &LeagueSettings) -> Result<RosterStore> {
    let mut registry = PlayerRegistry::with_config(RegistryConfig::from_env()?);
    registry
        .load_from_file(&cli.players)
        .await
        .with_context(|| format!("failed to load players from {}", cli.players.display()))?;
    if registry.is_empty() {
        bail!("no players in {}", cli.players.display());
    }

    if cli.matchups.exists() {
        let report = registry
            .load_matchups_from_file(&cli.matchups)
            .await
            .with_context(|| format!("failed to load matchups from {}", cli.matchups.display()))?;
        if !report.unknown_players.is_empty() {
            warn!("{} players in the matchup file are unknown", report.unknown_players.len());
        }
    } else {
        warn!("No matchups at {}, weekly forecasts will be empty", cli.matchups.display());
    }

    let forecasts = ForecastEngine::new(ForecastConfig::from_env()?)?.apply(&mut registry);
    for (id, e) in &forecasts.failed {
        warn!("No forecast for {}: {}", id, e);
    }
    registry.assign_rankings();
    info!("Forecast {} players, {} without a schedule", forecasts.updated, forecasts.skipped);

    let store = RosterStore::from_settings(registry, settings);

    if let (Some(users), Some(rosters)) = (&cli.users, &cli.rosters) {
        let users = league::load_users(users).await.context("failed to load league users")?;
        let rosters = league::load_rosters(rosters).await.context("failed to load league rosters")?;
        let pre_draft = !cli.post_draft && RosterConfig::default().pre_draft;
        store.load_league(&users, &rosters, pre_draft);
    }

    if let Some(path) = &cli.picks {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read picks from {}", path.display()))?;
        let picks: Vec<DraftPick> = serde_json::from_str(&content).context("malformed picks file")?;
        store.apply_picks(&mut DraftBoard::new(), &picks)?;
    }

    for token in &cli.pick {
        store.pick(&store.resolve(token)?)?;
    }
    for token in &cli.take {
        store.take(&store.resolve(token)?)?;
    }
    for token in &cli.clear {
        store.clear(&store.resolve(token)?)?;
    }

    Ok(store)
}

/// One-line player description with an N/T/P availability flag
fn player_line(player: &Player) -> String {
    let flag = if player.is_taken() {
        "T".red()
    } else if player.is_picked() {
        "P".green()
    } else {
        "N".normal()
    };
    format!(
        "{} ({}{} {}, fppg: {:.2} spg: {:.2}) {}",
        player.name,
        player.position,
        player.positional_rank,
        player.nfl_team.as_deref().unwrap_or("FA"),
        player.adj_projection() / player_registry::SEASON_GAMES,
        player.projection / player_registry::SEASON_WEEKS as f64,
        flag
    )
}

/// Print the best `top` groups, best last
fn print_combinations(combinations: &[Combination], top: usize) {
    let total = combinations.len();
    let shown = top.min(total);
    for (i, combination) in combinations[total - shown..].iter().enumerate() {
        let players: Vec<String> = combination.players.iter().map(|p| player_line(p)).collect();
        println!(
            "{} {} -> {:.2}",
            format!("#{}/{}", shown - i, total).bold(),
            players.join(" - "),
            combination.average_per_week()
        );
    }
}

fn print_roster(store: &RosterStore) {
    let summary = store.summary();
    for player in &summary.players {
        println!("{}", player_line(player));
        let weeks: Vec<String> = (0..player.weeks.len()).map(|i| format!("{:.1}", player.week_fppg(i))).collect();
        println!("    {}", weeks.join("  "));
    }
    println!();
    for (team, count) in &summary.nfl_team_counts {
        println!("{} {}", if team.is_empty() { "FA" } else { team.as_str() }, count);
    }
    if let Some(age) = summary.average_age {
        println!("Avg Age: {age:.2}");
    }
}

fn print_outcome(store: &RosterStore, outcome: &PickOutcome) {
    match outcome {
        PickOutcome::Rostered { player, team } => {
            let name = store.player(player).map(|p| p.name).unwrap_or_else(|_| player.to_string());
            let team = store.team(team).map(|t| t.name).unwrap_or_else(|| team.to_string());
            println!("Drafting {} for {}", name.bold(), team);
        }
        PickOutcome::TakenByUnknown { player } => println!("Drafting {} for an unknown team", player),
        PickOutcome::Kept { player } => println!("Kept {} on their current team", player),
        PickOutcome::UnknownPlayer { player_id } => println!("Unknown player {}", player_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("wr"), Ok(Position::WR));
        assert_eq!(parse_position("FB"), Ok(Position::RB));
        assert!(parse_position("DEF").is_err());
        assert!(parse_position("LS").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["draft-cli", "--pick", "Josh Allen", "combos", "WR", "-d", "3", "-l", "2"])
            .unwrap();
        assert_eq!(cli.pick, vec!["Josh Allen".to_string()]);
        assert!(matches!(cli.command, Commands::Combos { position: Position::WR, draft: 3, start: 2, top: 20 }));

        assert!(Cli::try_parse_from(["draft-cli", "--users", "u.json", "analyze"]).is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "debug");
        assert_eq!(log_level(2), "trace");

        let cli = Cli::try_parse_from(["draft-cli", "-v", "analyze"]).unwrap();
        assert_eq!(log_level(cli.verbose), "debug");
    }

    #[test]
    fn test_player_line_flags() {
        colored::control::set_override(false);
        let mut player = Player::new("1", "Josh Allen", Position::QB, 340.0);
        player.positional_rank = 1;
        player.nfl_team = Some("BUF".to_string());
        assert_eq!(player_line(&player), "Josh Allen (QB1 BUF, fppg: 20.00 spg: 18.89) N");

        player.availability = player_registry::Availability::Taken(None);
        assert!(player_line(&player).ends_with(" T"));
    }
}
