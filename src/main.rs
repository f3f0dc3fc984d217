use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use isolation_engine::{countdown, Agent, Board, Error, GameState, MatchConfig, Move, Player, Result, SearchReport};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Isolation matches between two search agents", long_about = None)]
struct Args {
    /// JSON match configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Milliseconds each agent gets per move
    #[arg(long)]
    time_limit_ms: Option<u64>,
    #[arg(long)]
    games: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Plies played at random before the agents take over
    #[arg(long)]
    random_openings: Option<usize>,
    /// Print every game record as a JSON line
    #[arg(long, default_value_t = false)]
    json: bool,
    #[arg(long, default_value = "info")]
    log_level: log::Level,
}

impl Args {
    fn match_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        if let Some(width) = self.width { config.width = width; }
        if let Some(height) = self.height { config.height = height; }
        if let Some(limit) = self.time_limit_ms { config.time_limit_ms = limit; }
        if let Some(games) = self.games { config.games = games; }
        if let Some(n) = self.random_openings { config.random_openings = n; }
        if self.seed.is_some() { config.seed = self.seed; }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum Termination {
    Isolated,
    NoMove,
    IllegalMove,
    Timeout,
}

#[derive(Serialize, Debug)]
struct Ply {
    player: Player,
    #[serde(rename = "move")]
    mv: Move,
    random: bool,
    report: Option<SearchReport>,
}

#[derive(Serialize, Debug)]
struct GameRecord {
    game: u32,
    player_one: String,
    player_two: String,
    winner: String,
    #[serde(skip)]
    winner_seat: usize,
    termination: Termination,
    plies: Vec<Ply>,
    final_board: Board,
}

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level)?;

    if let Err(e) = run(&args) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = args.match_config()?;
    let mut agents = [Agent::from_config(&config.player_one)?, Agent::from_config(&config.player_two)?];
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        "{} vs {} on {}x{}, {} games, {}ms per move",
        agents[0].name(), agents[1].name(), config.width, config.height, config.games, config.time_limit_ms
    );

    let mut wins = [0u32; 2];
    for game in 0..config.games {
        // seats swap every game so both agents open equally often
        let first = (game % 2) as usize;
        let record = play_game(&config, &mut agents, first, game, &mut rng)?;
        wins[record.winner_seat] += 1;
        info!("game {}: {} wins ({:?}) after {} plies", game + 1, record.winner, record.termination, record.plies.len());
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    for (seat, agent) in agents.iter().enumerate() {
        info!("{}: {} won, {} lost", agent.name(), wins[seat], config.games - wins[seat]);
    }
    Ok(())
}

fn play_game(config: &MatchConfig, agents: &mut [Agent; 2], first: usize, game: u32, rng: &mut StdRng) -> Result<GameRecord> {
    let seat_of = |player: Player| match player {
        Player::One => first,
        Player::Two => 1 - first,
    };
    let mut board = Board::new(config.width, config.height)?;
    let mut plies = Vec::new();

    for _ in 0..config.random_openings {
        let Some(&mv) = board.legal_moves().choose(rng) else { break };
        plies.push(Ply { player: board.active_player(), mv, random: true, report: None });
        board = board.make_move(mv)?;
    }

    let limit = Duration::from_millis(config.time_limit_ms);
    let (loser, termination) = loop {
        let player = board.active_player();
        if board.is_game_over() {
            break (player, Termination::Isolated);
        }
        let agent = &mut agents[seat_of(player)];
        let time_left = countdown(limit);
        let choice = agent.get_move(&board, &time_left);
        let remaining = time_left();
        let report = *agent.last_report();
        debug!("{} ({}) -> {:?} {:?}", agent.name(), player, choice, report);

        let Some(mv) = choice else {
            warn!("{} returned no move with legal moves available", agent.name());
            break (player, Termination::NoMove);
        };
        if remaining < 0.0 {
            warn!("{} overran its clock by {:.2}ms", agent.name(), -remaining);
            break (player, Termination::Timeout);
        }
        match board.make_move(mv) {
            Ok(next) => board = next,
            Err(e @ Error::IllegalMove { .. }) => {
                warn!("{}: {}", agent.name(), e);
                break (player, Termination::IllegalMove);
            }
            Err(e) => return Err(e),
        }
        plies.push(Ply { player, mv, random: false, report: Some(report) });
    };
    debug!("final position:\n{}", board);

    Ok(GameRecord {
        game: game + 1,
        player_one: agents[seat_of(Player::One)].name().to_string(),
        player_two: agents[seat_of(Player::Two)].name().to_string(),
        winner: agents[seat_of(loser.opponent())].name().to_string(),
        winner_seat: seat_of(loser.opponent()),
        termination,
        plies,
        final_board: board,
    })
}
