use std::io::{self, BufRead, Write};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use minegrid_core::{Cell, Difficulty, GameObserver, GameSession, GameState, Pos, Score};

const HELP: &str =
    "commands: r ROW COL reveal | f ROW COL flag | c ROW COL chord | d LEVEL | n new | q quit";

#[derive(Parser)]
#[command(name = "minegrid", about = "Terminal minesweeper")]
struct Cli {
    /// Board preset to start with.
    #[arg(long, value_enum, default_value = "easy")]
    difficulty: Level,

    /// Seed for mine placement, drawn from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

/// Prints the transitions a graphical front-end would animate.
struct ConsoleObserver;

impl GameObserver for ConsoleObserver {
    fn score_reported(&mut self, score: Score) {
        log::debug!("score reported: {}", score);
    }

    fn game_over(&mut self, state: GameState) {
        match state {
            GameState::Won => println!("You won!"),
            GameState::Lost => println!("Boom. Game over."),
            GameState::Playing => {}
        }
    }
}

enum Command {
    Reveal(Pos),
    Flag(Pos),
    Chord(Pos),
    New,
    Level(Level),
    Help,
    Quit,
}

fn parse_pos(row: &str, col: &str) -> Result<Pos, String> {
    let row = row.parse().map_err(|_| format!("bad row {:?}", row))?;
    let col = col.parse().map_err(|_| format!("bad column {:?}", col))?;
    Ok((row, col))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["r", row, col] => Ok(Command::Reveal(parse_pos(row, col)?)),
        ["f", row, col] => Ok(Command::Flag(parse_pos(row, col)?)),
        ["c", row, col] => Ok(Command::Chord(parse_pos(row, col)?)),
        ["d", "easy"] => Ok(Command::Level(Level::Easy)),
        ["d", "medium"] => Ok(Command::Level(Level::Medium)),
        ["d", "hard"] => Ok(Command::Level(Level::Hard)),
        ["d", other] => Err(format!("unknown difficulty {:?}", other)),
        ["n"] => Ok(Command::New),
        ["h"] | ["help"] => Ok(Command::Help),
        ["q"] | ["quit"] => Ok(Command::Quit),
        [] => Err("type a command, h for help".to_string()),
        [verb, ..] => Err(format!("unrecognized command {:?}, h for help", verb)),
    }
}

fn entropy_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

fn tile_glyph(cell: Cell) -> char {
    match cell {
        Cell::Hidden => '.',
        Cell::Revealed(0) => ' ',
        Cell::Revealed(count) => (b'0' + count) as char,
        Cell::Flagged => 'F',
        Cell::Exploded => 'X',
        Cell::Mine => '*',
        Cell::FalseFlag => 'x',
    }
}

fn format_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

fn render(session: &GameSession) {
    let (rows, cols) = session.size();
    let state = match session.state() {
        GameState::Playing => "playing",
        GameState::Won => "won",
        GameState::Lost => "lost",
    };
    println!();
    println!(
        "mines {}  time {}  [{}]",
        format_counter(session.mines_left()),
        format_counter(session.elapsed_secs().min(999) as i32),
        state
    );
    print!("    ");
    for col in 0..cols {
        print!("{:>3}", col);
    }
    println!();
    for row in 0..rows {
        print!("{:>3} ", row);
        for col in 0..cols {
            print!("  {}", tile_glyph(session.cell_at((row, col))));
        }
        println!();
    }
}

fn report<T>(result: minegrid_core::Result<T>) {
    if let Err(error) = result {
        println!("error: {}", error);
    }
}

/// Catches the session up with the wall clock, one whole second at a time.
fn sync_ticks(session: &mut GameSession, clock: Option<Instant>, ticked: &mut u64) {
    if let Some(started) = clock {
        let target = started.elapsed().as_secs();
        while *ticked < target {
            session.tick();
            *ticked += 1;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(entropy_seed);
    let mut session =
        GameSession::with_observer(cli.difficulty.into(), seed, Box::new(ConsoleObserver));

    // the clock starts with the first reveal, matching the game timer
    let mut clock: Option<Instant> = None;
    let mut ticked = 0u64;
    let mut announced = false;

    println!("{}", HELP);
    render(&session);
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        sync_ticks(&mut session, clock, &mut ticked);

        match parse_command(&line) {
            Err(message) => println!("{}", message),
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::New) => {
                session.restart(entropy_seed());
                clock = None;
                ticked = 0;
                announced = false;
            }
            Ok(Command::Level(level)) => {
                session.set_difficulty(level.into(), entropy_seed());
                clock = None;
                ticked = 0;
                announced = false;
            }
            Ok(Command::Reveal(pos)) => report(session.reveal(pos)),
            Ok(Command::Flag(pos)) => report(session.toggle_flag(pos)),
            Ok(Command::Chord(pos)) => report(session.chord_reveal(pos)),
        }

        if session.started() && clock.is_none() {
            clock = Some(Instant::now());
        }

        render(&session);
        if let Some(score) = session.final_score() {
            if !announced {
                announced = true;
                println!("final score: {}", score);
                println!("n for a new game, q to quit");
            }
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
